//! `medium-publish`: publish new or changed posts to the Medium API.

mod config;

use std::process::ExitCode;

use publisher_engine::{
    publish_posts, ClientSettings, MediumClient, PublishState, RunConfig, MEDIUM_API_BASE,
    STATE_FILENAME,
};
use publisher_logging::{publish_error, publish_info};

fn main() -> ExitCode {
    publisher_logging::initialize_terminal();

    let settings = match config::Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            publish_error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    publish_info!("Starting Medium publisher");
    publish_info!("Posts directory: {}", settings.posts_dir.display());
    publish_info!("Publish status: {}", settings.publish_status);
    publish_info!("Author ID: {}", settings.author_id);

    let state_path = settings.project_root.join(STATE_FILENAME);
    let mut state = match PublishState::load(&state_path) {
        Ok(state) => state,
        Err(err) => {
            publish_error!("Failed to load publish state: {err}");
            return ExitCode::FAILURE;
        }
    };

    let client = MediumClient::new(
        MEDIUM_API_BASE,
        &settings.access_token,
        &settings.author_id,
        ClientSettings::default(),
    );
    let run_config = RunConfig {
        project_root: settings.project_root.clone(),
        posts_dir: settings.posts_dir.clone(),
        image_base_url: settings.image_base_url.clone(),
        publish_status: settings.publish_status,
    };

    // Processing is strictly sequential; the runtime exists only because
    // the HTTP client is async.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            publish_error!("Failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(publish_posts(&run_config, &mut state, &client)) {
        Ok(summary) => {
            if summary.published > 0 {
                publish_info!("Successfully published {} post(s)", summary.published);
            } else {
                publish_info!("No new posts to publish");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            publish_error!("Fatal error: {err}");
            ExitCode::FAILURE
        }
    }
}
