use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use pretty_assertions::assert_eq;
use publisher_engine::{
    publish_posts, state_key, PublishError, PublishFailure, PublishState, PublishStatus,
    Publisher, RunConfig, RunError, Submission, STATE_FILENAME,
};
use tempfile::TempDir;

/// Publisher double that records every submission.
struct RecordingPublisher {
    calls: Mutex<Vec<Submission>>,
    fail: bool,
}

impl RecordingPublisher {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    fn calls(&self) -> Vec<Submission> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, submission: &Submission) -> Result<String, PublishError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(submission.clone());
        if self.fail {
            Err(PublishError::new(PublishFailure::HttpStatus(500), "boom"))
        } else {
            Ok(format!("remote-{}", calls.len()))
        }
    }
}

fn init_logging() {
    publisher_logging::initialize_for_tests();
}

fn workspace() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let posts_dir = temp.path().join("posts");
    fs::create_dir(&posts_dir).unwrap();
    (temp, posts_dir)
}

fn config(root: &Path, posts_dir: &Path) -> RunConfig {
    RunConfig {
        project_root: root.to_path_buf(),
        posts_dir: posts_dir.to_path_buf(),
        image_base_url: "https://raw.example/repo".to_string(),
        publish_status: PublishStatus::Draft,
    }
}

fn load_state(root: &Path) -> PublishState {
    PublishState::load(&root.join(STATE_FILENAME)).unwrap()
}

const POST_A: &str = "---\ntitle: Post A\ntags: [rust]\n---\n\nBody of A with ![fig](fig.png).\n";
const POST_B: &str = "---\ntitle: Post B\n---\n\nBody of B.\n";

#[tokio::test]
async fn publishes_new_posts_and_skips_recorded_ones() {
    init_logging();
    let (temp, posts_dir) = workspace();
    fs::write(posts_dir.join("a.qmd"), POST_A).unwrap();
    fs::write(posts_dir.join("b.qmd"), POST_B).unwrap();

    let mut state = load_state(temp.path());
    let key_b = state_key(temp.path(), &posts_dir.join("b.qmd"));
    state.record(
        &key_b,
        POST_B.as_bytes(),
        "existing-id",
        "Post B",
        "2026-01-01T00:00:00Z",
    );

    let publisher = RecordingPublisher::new();
    let summary = publish_posts(&config(temp.path(), &posts_dir), &mut state, &publisher)
        .await
        .unwrap();

    assert_eq!(summary.discovered, 2);
    assert_eq!(summary.published, 1);
    assert_eq!(summary.skipped_unchanged, 1);
    assert_eq!(summary.failed, 0);

    // Only A went over the wire, with its image rewritten.
    let calls = publisher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].title, "Post A");
    assert_eq!(calls[0].tags, vec!["rust"]);
    assert!(calls[0]
        .content
        .contains("![fig](https://raw.example/repo/posts/fig.png)"));
    assert!(!calls[0].notify_followers);

    // B's record is untouched; A gained one.
    assert_eq!(state.get(&key_b).unwrap().remote_id, "existing-id");
    let key_a = state_key(temp.path(), &posts_dir.join("a.qmd"));
    let record_a = state.get(&key_a).unwrap();
    assert_eq!(record_a.remote_id, "remote-1");
    assert_eq!(record_a.title, "Post A");

    // The store was persisted.
    let reloaded = load_state(temp.path());
    assert_eq!(reloaded.len(), 2);
}

#[tokio::test]
async fn unchanged_posts_cause_no_network_calls() {
    init_logging();
    let (temp, posts_dir) = workspace();
    fs::write(posts_dir.join("b.qmd"), POST_B).unwrap();

    let mut state = load_state(temp.path());
    let key_b = state_key(temp.path(), &posts_dir.join("b.qmd"));
    state.record(
        &key_b,
        POST_B.as_bytes(),
        "existing-id",
        "Post B",
        "2026-01-01T00:00:00Z",
    );

    let publisher = RecordingPublisher::new();
    let summary = publish_posts(&config(temp.path(), &posts_dir), &mut state, &publisher)
        .await
        .unwrap();

    assert_eq!(summary.published, 0);
    assert!(publisher.calls().is_empty());
}

#[tokio::test]
async fn changed_posts_are_republished() {
    init_logging();
    let (temp, posts_dir) = workspace();
    let edited = POST_B.replace("Body of B.", "Body of B, edited.");
    fs::write(posts_dir.join("b.qmd"), &edited).unwrap();

    let mut state = load_state(temp.path());
    let key_b = state_key(temp.path(), &posts_dir.join("b.qmd"));
    state.record(
        &key_b,
        POST_B.as_bytes(),
        "existing-id",
        "Post B",
        "2026-01-01T00:00:00Z",
    );

    let publisher = RecordingPublisher::new();
    let summary = publish_posts(&config(temp.path(), &posts_dir), &mut state, &publisher)
        .await
        .unwrap();

    assert_eq!(summary.published, 1);
    assert_eq!(state.get(&key_b).unwrap().remote_id, "remote-1");
}

#[tokio::test]
async fn posts_without_a_title_are_skipped_and_not_recorded() {
    init_logging();
    let (temp, posts_dir) = workspace();
    fs::write(posts_dir.join("untitled.qmd"), "---\ntags: [x]\n---\nBody.\n").unwrap();
    fs::write(posts_dir.join("blank.qmd"), "---\ntitle: '  '\n---\nBody.\n").unwrap();

    let mut state = load_state(temp.path());
    let publisher = RecordingPublisher::new();
    let summary = publish_posts(&config(temp.path(), &posts_dir), &mut state, &publisher)
        .await
        .unwrap();

    assert_eq!(summary.skipped_no_title, 2);
    assert_eq!(summary.published, 0);
    assert!(publisher.calls().is_empty());
    assert!(state.is_empty());
}

#[tokio::test]
async fn a_failed_publish_leaves_the_store_untouched() {
    init_logging();
    let (temp, posts_dir) = workspace();
    fs::write(posts_dir.join("a.qmd"), POST_A).unwrap();

    let mut state = load_state(temp.path());
    let publisher = RecordingPublisher::failing();
    let summary = publish_posts(&config(temp.path(), &posts_dir), &mut state, &publisher)
        .await
        .unwrap();

    assert_eq!(summary.published, 0);
    assert_eq!(summary.failed, 1);
    assert_eq!(publisher.calls().len(), 1);
    assert!(state.is_empty());
}

#[tokio::test]
async fn a_parse_failure_does_not_stop_the_remaining_files() {
    init_logging();
    let (temp, posts_dir) = workspace();
    // Sorts before the valid file, so the failure happens first.
    fs::write(posts_dir.join("bad.qmd"), [0xff, 0xfe, 0x00]).unwrap();
    fs::write(posts_dir.join("good.qmd"), POST_A).unwrap();

    let mut state = load_state(temp.path());
    let publisher = RecordingPublisher::new();
    let summary = publish_posts(&config(temp.path(), &posts_dir), &mut state, &publisher)
        .await
        .unwrap();

    assert_eq!(summary.discovered, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.published, 1);
    assert_eq!(state.len(), 1);
}

#[tokio::test]
async fn a_missing_posts_directory_is_fatal() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nowhere");

    let mut state = load_state(temp.path());
    let publisher = RecordingPublisher::new();
    let err = publish_posts(&config(temp.path(), &missing), &mut state, &publisher)
        .await
        .unwrap_err();

    assert!(matches!(err, RunError::PostsDir { .. }));
}
