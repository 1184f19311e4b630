use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// File extension of publishable post files.
pub const POST_EXTENSION: &str = "qmd";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("file is not valid utf-8 text")]
    NotText,
    #[error("frontmatter block is never closed")]
    UnterminatedFrontmatter,
    #[error("malformed frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),
}

/// Key/value metadata parsed from a post's frontmatter block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata(Mapping);

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(&Value::String(key.to_string()))
    }

    /// The `title` value, when present and a string.
    pub fn title(&self) -> Option<&str> {
        match self.get("title") {
            Some(Value::String(title)) => Some(title.as_str()),
            _ => None,
        }
    }
}

/// A post split into its metadata header and free-form body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPost {
    pub metadata: Metadata,
    pub body: String,
}

/// List the publishable post files directly inside `dir`, in sorted order.
///
/// The scan is non-recursive; subdirectories are ignored.
pub fn discover_posts(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().is_some_and(|ext| ext == POST_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parse raw post bytes into (metadata, body).
pub fn parse_post(raw: &[u8]) -> Result<ParsedPost, ParseError> {
    let text = std::str::from_utf8(raw).map_err(|_| ParseError::NotText)?;
    let (metadata, body) = split_frontmatter(text)?;
    Ok(ParsedPost {
        metadata,
        body: body.trim().to_string(),
    })
}

/// Split a leading `---` delimited frontmatter block from the body.
///
/// A document without a leading delimiter line has empty metadata and the
/// whole text as body.
fn split_frontmatter(text: &str) -> Result<(Metadata, &str), ParseError> {
    let Some(after_open) = strip_opening_delimiter(text) else {
        return Ok((Metadata::default(), text));
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if is_delimiter_line(line) {
            let block = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return Ok((parse_metadata_block(block)?, body));
        }
        offset += line.len();
    }
    Err(ParseError::UnterminatedFrontmatter)
}

fn strip_opening_delimiter(text: &str) -> Option<&str> {
    let first_line_end = text.find('\n')?;
    if text[..first_line_end].trim_end() == "---" {
        Some(&text[first_line_end + 1..])
    } else {
        None
    }
}

fn is_delimiter_line(line: &str) -> bool {
    line.trim_end() == "---"
}

fn parse_metadata_block(block: &str) -> Result<Metadata, ParseError> {
    if block.trim().is_empty() {
        return Ok(Metadata::default());
    }
    let mapping: Mapping = serde_yaml::from_str(block)?;
    Ok(Metadata(mapping))
}
