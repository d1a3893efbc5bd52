//! One-shot upload of the slash command definitions.

use std::process::ExitCode;

use coordinate_bot::config::Config;
use coordinate_bot::discord::api;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    if let Err(e) = coordinate_bot::logging::init() {
        eprintln!("{}", e.tree());
        return ExitCode::FAILURE;
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            e.print_tree();
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(locale = %config.locale, "Registering commands");

    let client = reqwest::Client::new();
    let registered =
        api::register_slash_commands(&client, &config.token, &config.application_id, config.locale)
            .await;
    match registered {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command registration failed:\n{}", e.tree());
            ExitCode::FAILURE
        }
    }
}
