use async_trait::async_trait;
use reqwest::{Client, Response};
use std::sync::Arc;

use crate::error::{BotError, Result};
use crate::locale::Locale;
use crate::state::{self, RateLimiter};
use crate::types::discord::*;

const API_BASE: &str = "https://discord.com/api/v10";

/// The reply surface a command handler talks to.
#[async_trait]
pub trait InteractionApi: Send + Sync {
    /// Answer an interaction (reply, update, autocomplete result, ack).
    async fn respond(&self, interaction: &Interaction, response: InteractionResponse) -> Result<()>;

    /// Edit the first response sent for the interaction with this token.
    async fn edit_original(&self, interaction_token: &str, edit: MessageEdit) -> Result<()>;

    /// Send an extra message after the initial response.
    async fn followup(&self, interaction_token: &str, message: FollowupMessage) -> Result<()>;
}

/// [`InteractionApi`] backed by the Discord REST API.
pub struct DiscordApi {
    client: Client,
    token: String,
    application_id: String,
    limiter: Arc<RateLimiter>,
}

impl DiscordApi {
    pub async fn from_state() -> Self {
        Self {
            client: state::client().await,
            token: state::token().await,
            application_id: state::application_id().await,
            limiter: state::rate_limiter().await,
        }
    }
}

#[async_trait]
impl InteractionApi for DiscordApi {
    async fn respond(&self, interaction: &Interaction, response: InteractionResponse) -> Result<()> {
        self.limiter.acquire().await;

        let response = self
            .client
            .post(format!(
                "{}/interactions/{}/{}/callback",
                API_BASE, interaction.id, interaction.token
            ))
            .header("Authorization", format!("Bot {}", self.token))
            .json(&response)
            .send()
            .await?;

        ensure_success("POST /interactions/{id}/{token}/callback", response).await?;
        Ok(())
    }

    async fn edit_original(&self, interaction_token: &str, edit: MessageEdit) -> Result<()> {
        self.limiter.acquire().await;

        let response = self
            .client
            .patch(format!(
                "{}/webhooks/{}/{}/messages/@original",
                API_BASE, self.application_id, interaction_token
            ))
            .json(&edit)
            .send()
            .await?;

        ensure_success("PATCH /webhooks/{app}/{token}/messages/@original", response).await?;
        Ok(())
    }

    async fn followup(&self, interaction_token: &str, message: FollowupMessage) -> Result<()> {
        self.limiter.acquire().await;

        let response = self
            .client
            .post(format!(
                "{}/webhooks/{}/{}",
                API_BASE, self.application_id, interaction_token
            ))
            .json(&message)
            .send()
            .await?;

        ensure_success("POST /webhooks/{app}/{token}", response).await?;
        Ok(())
    }
}

pub async fn get_gateway_url(client: &Client, token: &str) -> Result<String> {
    let response = client
        .get(format!("{}/gateway", API_BASE))
        .header("Authorization", format!("Bot {}", token))
        .send()
        .await?;

    let response = ensure_success("GET /gateway", response).await?;
    let gateway: GatewayResponse = response.json().await?;
    gateway_connect_url(&gateway.url)
}

/// Append the version and encoding query the gateway expects.
pub fn gateway_connect_url(base: &str) -> Result<String> {
    let mut url = url::Url::parse(base)?;
    if url.path().is_empty() {
        url.set_path("/");
    }
    url.query_pairs_mut()
        .clear()
        .append_pair("v", "10")
        .append_pair("encoding", "json");
    Ok(url.into())
}

/// Overwrite the application's global command set with [`all_commands`].
///
/// [`all_commands`]: crate::commands::all_commands
pub async fn register_slash_commands(
    client: &Client,
    token: &str,
    app_id: &str,
    locale: Locale,
) -> Result<()> {
    let commands = crate::commands::all_commands(locale);

    let response = client
        .put(format!("{}/applications/{}/commands", API_BASE, app_id))
        .header("Authorization", format!("Bot {}", token))
        .json(&commands)
        .send()
        .await?;

    ensure_success("PUT /applications/{id}/commands", response).await?;

    tracing::info!(app_id, count = commands.len(), %locale, "Slash commands registered");
    Ok(())
}

async fn ensure_success(route: &str, response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();

    if let Ok(discord_err) = serde_json::from_str::<DiscordErrorResponse>(&error_text) {
        return Err(BotError::new("discord_api_error").push_str(format!("{}: {}", route, discord_err)));
    }

    Err(BotError::new("http_error").push_str(format!("{}: {} - {}", route, status, error_text)))
}
