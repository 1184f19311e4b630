use std::path::Path;

use regex::{Captures, Regex};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("post file {path} is outside the project root")]
    OutsideProjectRoot { path: String },
}

/// Rewrites relative markdown image references to absolute URLs rooted at
/// a configured base URL.
pub struct ImageRewriter {
    base_url: String,
    pattern: Regex,
}

impl ImageRewriter {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            pattern: Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("image pattern"),
        }
    }

    /// Rewrite every image reference in `body`. `post_dir` is the post
    /// file's directory relative to the project root, slash-joined.
    pub fn rewrite(&self, body: &str, post_dir: &str) -> String {
        self.pattern
            .replace_all(body, |caps: &Captures<'_>| {
                let alt = &caps[1];
                let path = &caps[2];
                if has_url_scheme(path) {
                    // Already an absolute URL.
                    caps[0].to_string()
                } else if path.starts_with('/') {
                    format!("![{alt}]({}{path})", self.base_url)
                } else if post_dir.is_empty() {
                    format!("![{alt}]({}/{path})", self.base_url)
                } else {
                    format!("![{alt}]({}/{post_dir}/{path})", self.base_url)
                }
            })
            .into_owned()
    }
}

fn has_url_scheme(path: &str) -> bool {
    Url::parse(path).is_ok()
}

/// The directory of `post_path` relative to `project_root`, slash-joined.
/// Empty for a post directly at the root.
pub fn relative_post_dir(project_root: &Path, post_path: &Path) -> Result<String, TransformError> {
    let parent = post_path.parent().unwrap_or(post_path);
    let relative = parent
        .strip_prefix(project_root)
        .map_err(|_| TransformError::OutsideProjectRoot {
            path: post_path.display().to_string(),
        })?;
    Ok(slash_join(relative))
}

fn slash_join(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    parts.join("/")
}

/// Classification of a body line relative to dialect-only block markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    BlockStart,
    BlockEnd,
    Text,
}

fn classify(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.starts_with(":::{") {
        LineKind::BlockStart
    } else if trimmed == ":::" {
        LineKind::BlockEnd
    } else {
        LineKind::Text
    }
}

/// Drops callout block marker lines from the body.
///
/// Only the marker lines themselves are removed; lines between a start and
/// end marker are kept verbatim.
pub fn strip_block_markers(body: &str) -> String {
    let lines: Vec<&str> = body
        .split('\n')
        .filter(|line| classify(line) == LineKind::Text)
        .collect();
    lines.join("\n")
}
