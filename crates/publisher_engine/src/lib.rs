//! Publisher engine: content pipeline and Medium API client.
mod persist;
mod posts;
mod publish;
mod run;
mod state;
mod tags;
mod transform;
mod types;

pub use persist::{atomic_write, PersistError};
pub use posts::{discover_posts, parse_post, Metadata, ParseError, ParsedPost, POST_EXTENSION};
pub use publish::{
    ClientSettings, MediumClient, Publisher, Submission, UserInfo, MEDIUM_API_BASE,
};
pub use run::{publish_posts, RunConfig, RunError, RunSummary};
pub use state::{
    content_hash, state_key, PublishRecord, PublishState, StateError, STATE_FILENAME,
};
pub use tags::{extract_tags, MAX_TAGS, MAX_TAG_LEN};
pub use transform::{relative_post_dir, strip_block_markers, ImageRewriter, TransformError};
pub use types::{PublishError, PublishFailure, PublishStatus, UnknownPublishStatus};
