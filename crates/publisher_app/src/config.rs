use std::env;
use std::path::PathBuf;

use publisher_engine::PublishStatus;
use thiserror::Error;

pub const ACCESS_TOKEN_VAR: &str = "MEDIUM_ACCESS_TOKEN";
pub const AUTHOR_ID_VAR: &str = "MEDIUM_AUTHOR_ID";
pub const POSTS_DIR_VAR: &str = "POSTS_DIRECTORY";
pub const PUBLISH_STATUS_VAR: &str = "PUBLISH_STATUS";
pub const PROJECT_ROOT_VAR: &str = "PROJECT_ROOT";
pub const IMAGE_BASE_URL_VAR: &str = "IMAGE_BASE_URL";

const DEFAULT_AUTHOR_ID: &str = "your-medium-author-id";
const DEFAULT_POSTS_DIR: &str = "research/posts";
const DEFAULT_PROJECT_ROOT: &str = ".";
const DEFAULT_IMAGE_BASE_URL: &str = "https://raw.githubusercontent.com/your-user/your-blog/main";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("MEDIUM_ACCESS_TOKEN environment variable is required")]
    MissingAccessToken,
    #[error("invalid {var}: {source}")]
    InvalidPublishStatus {
        var: &'static str,
        source: publisher_engine::UnknownPublishStatus,
    },
}

/// Run configuration resolved from the environment at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub access_token: String,
    pub author_id: String,
    pub project_root: PathBuf,
    pub posts_dir: PathBuf,
    pub publish_status: PublishStatus,
    pub image_base_url: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolve settings through an arbitrary variable lookup. The seam the
    /// tests use instead of mutating process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let access_token = lookup(ACCESS_TOKEN_VAR)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingAccessToken)?;

        let author_id = lookup(AUTHOR_ID_VAR).unwrap_or_else(|| DEFAULT_AUTHOR_ID.to_string());
        let project_root =
            PathBuf::from(lookup(PROJECT_ROOT_VAR).unwrap_or_else(|| DEFAULT_PROJECT_ROOT.into()));
        let posts_dir = project_root
            .join(lookup(POSTS_DIR_VAR).unwrap_or_else(|| DEFAULT_POSTS_DIR.to_string()));

        let publish_status = match lookup(PUBLISH_STATUS_VAR) {
            Some(raw) => raw
                .parse()
                .map_err(|source| ConfigError::InvalidPublishStatus {
                    var: PUBLISH_STATUS_VAR,
                    source,
                })?,
            None => PublishStatus::default(),
        };

        let image_base_url =
            lookup(IMAGE_BASE_URL_VAR).unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string());

        Ok(Self {
            access_token,
            author_id,
            project_root,
            posts_dir,
            publish_status,
            image_base_url,
        })
    }
}
