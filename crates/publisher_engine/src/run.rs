use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use publisher_logging::{publish_debug, publish_error, publish_info, publish_warn};
use thiserror::Error;

use crate::posts;
use crate::publish::{Publisher, Submission};
use crate::state::{state_key, PublishState, StateError};
use crate::tags::extract_tags;
use crate::transform::{relative_post_dir, strip_block_markers, ImageRewriter, TransformError};
use crate::types::{PublishError, PublishStatus};

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Root the state-store keys and image paths are derived against.
    pub project_root: PathBuf,
    /// Directory scanned (non-recursively) for post files.
    pub posts_dir: PathBuf,
    /// Base URL that relative image references are rewritten under.
    pub image_base_url: String,
    pub publish_status: PublishStatus,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("posts directory {path:?} is not accessible: {source}")]
    PostsDir { path: PathBuf, source: io::Error },
    #[error(transparent)]
    State(#[from] StateError),
}

/// Counts for one full run over the posts directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub discovered: usize,
    pub published: usize,
    pub skipped_unchanged: usize,
    pub skipped_no_title: usize,
    pub failed: usize,
}

enum Outcome {
    Published { remote_id: String },
    SkippedUnchanged,
    SkippedNoTitle,
    PublishFailed(PublishError),
}

#[derive(Debug, Error)]
enum PostError {
    #[error(transparent)]
    Parse(#[from] posts::ParseError),
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Publish every new or changed post under the configured directory.
///
/// Posts are processed strictly one at a time. A failure while handling one
/// post is logged and does not stop the remaining files. The state store is
/// persisted exactly once, after the last file.
pub async fn publish_posts(
    config: &RunConfig,
    state: &mut PublishState,
    publisher: &dyn Publisher,
) -> Result<RunSummary, RunError> {
    let files = posts::discover_posts(&config.posts_dir).map_err(|source| RunError::PostsDir {
        path: config.posts_dir.clone(),
        source,
    })?;
    publish_info!(
        "Found {} post file(s) in {}",
        files.len(),
        config.posts_dir.display()
    );

    let rewriter = ImageRewriter::new(&config.image_base_url);
    let mut summary = RunSummary {
        discovered: files.len(),
        ..RunSummary::default()
    };

    for path in &files {
        let key = state_key(&config.project_root, path);
        publish_debug!("Processing {key}");
        match process_post(config, state, publisher, &rewriter, path, &key).await {
            Ok(Outcome::Published { remote_id }) => {
                summary.published += 1;
                publish_info!("Published {key} as {remote_id}");
            }
            Ok(Outcome::SkippedUnchanged) => {
                summary.skipped_unchanged += 1;
                publish_info!("Skipping {key}: already published and unchanged");
            }
            Ok(Outcome::SkippedNoTitle) => {
                summary.skipped_no_title += 1;
                publish_warn!("Skipping {key}: no title in frontmatter");
            }
            Ok(Outcome::PublishFailed(err)) => {
                summary.failed += 1;
                publish_error!("Failed to publish {key}: {err}");
            }
            Err(err) => {
                summary.failed += 1;
                publish_error!("Failed to process {key}: {err}");
            }
        }
    }

    state.save()?;
    Ok(summary)
}

async fn process_post(
    config: &RunConfig,
    state: &mut PublishState,
    publisher: &dyn Publisher,
    rewriter: &ImageRewriter,
    path: &Path,
    key: &str,
) -> Result<Outcome, PostError> {
    let raw = fs::read(path).map_err(posts::ParseError::Io)?;

    if !state.should_publish(key, &raw) {
        return Ok(Outcome::SkippedUnchanged);
    }

    let parsed = posts::parse_post(&raw)?;
    let Some(title) = parsed.metadata.title().filter(|t| !t.trim().is_empty()) else {
        return Ok(Outcome::SkippedNoTitle);
    };
    let title = title.to_string();

    let post_dir = relative_post_dir(&config.project_root, path)?;
    let body = rewriter.rewrite(&parsed.body, &post_dir);
    let body = strip_block_markers(&body);
    let tags = extract_tags(&parsed.metadata);

    let submission = Submission {
        title: title.clone(),
        content: body,
        tags,
        publish_status: config.publish_status,
        // Followers are never notified, regardless of publish status.
        notify_followers: false,
    };

    match publisher.publish(&submission).await {
        Ok(remote_id) => {
            state.record(key, &raw, &remote_id, &title, &Utc::now().to_rfc3339());
            Ok(Outcome::Published { remote_id })
        }
        Err(err) => Ok(Outcome::PublishFailed(err)),
    }
}
