//! `medium-whoami`: print the authenticated account's details.
//!
//! Reads `MEDIUM_ACCESS_TOKEN` and queries the user-info endpoint; the
//! reported id is the value to export as `MEDIUM_AUTHOR_ID`.

use std::env;
use std::process::ExitCode;

use publisher_engine::{ClientSettings, MediumClient, MEDIUM_API_BASE};
use publisher_logging::publish_error;

fn main() -> ExitCode {
    publisher_logging::initialize_terminal();

    let Some(access_token) = env::var("MEDIUM_ACCESS_TOKEN")
        .ok()
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
    else {
        publish_error!("MEDIUM_ACCESS_TOKEN environment variable is required");
        publish_error!("Get your token from your Medium settings, then export it");
        return ExitCode::FAILURE;
    };

    // The author id is not needed for the user-info endpoint.
    let client = MediumClient::new(MEDIUM_API_BASE, &access_token, "", ClientSettings::default());

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

    match runtime.block_on(client.user_info()) {
        Ok(user) => {
            println!("User ID:  {}", user.id);
            println!("Username: {}", user.username);
            println!("Name:     {}", user.name);
            println!("URL:      {}", user.url);
            println!();
            println!("Export this before publishing:");
            println!("  MEDIUM_AUTHOR_ID={}", user.id);
            ExitCode::SUCCESS
        }
        Err(err) => {
            publish_error!("Failed to get user information: {err}");
            ExitCode::FAILURE
        }
    }
}
