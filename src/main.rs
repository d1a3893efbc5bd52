use std::sync::Arc;

use tokio::time::Duration;

use coordinate_bot::commands::{CommandContext, Dispatcher};
use coordinate_bot::config::Config;
use coordinate_bot::discord::{self, api::DiscordApi};
use coordinate_bot::error::Result;
use coordinate_bot::state;
use coordinate_bot::store::LocationStore;

async fn run_bot(dispatcher: &Dispatcher) -> Result<()> {
    let session = state::session().await;

    let gateway_url = match session.resume_gateway_url {
        Some(url) if session.session_id.is_some() => discord::api::gateway_connect_url(&url)?,
        _ => {
            let token = state::token().await;
            let client = state::client().await;
            discord::api::get_gateway_url(&client, &token).await?
        }
    };

    discord::gateway::run_gateway(gateway_url, dispatcher).await
}

async fn register_commands(config: &Config) {
    let client = state::client().await;
    let registered = discord::api::register_slash_commands(
        &client,
        &config.token,
        &config.application_id,
        config.locale,
    )
    .await;
    if let Err(e) = registered {
        tracing::error!("Failed to register commands:\n{}", e.tree());
    }

    // Give the command registry a moment before the gateway session starts
    tokio::time::sleep(Duration::from_secs(2)).await;
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    coordinate_bot::logging::init()?;

    let config = Config::from_env().inspect_err(|e| e.print_tree())?;
    tracing::info!(
        locale = %config.locale,
        store = %config.store_path.display(),
        "Coordinate bot starting"
    );

    state::init_bot_state(&config).await;

    if config.register_on_start {
        register_commands(&config).await;
    }

    let (store, status) = LocationStore::open(&config.store_path);
    tracing::info!(?status, "Initial store load");

    let api = Arc::new(DiscordApi::from_state().await);
    let dispatcher = Dispatcher::new(CommandContext::new(
        api,
        store,
        config.locale,
        config.confirm_timeout,
    ));

    let mut attempt = 0;

    loop {
        attempt += 1;

        match run_bot(&dispatcher).await {
            Ok(_) => {
                attempt = 0;
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            Err(e) => {
                e.print_tree();

                let wait_time = match attempt {
                    1..=2 => 30,
                    3..=4 => 60,
                    5..=6 => 120,
                    _ => 300,
                };

                tracing::warn!(attempt, wait_time, "Reconnecting to gateway");
                tokio::time::sleep(Duration::from_secs(wait_time)).await;
            }
        }
    }
}
