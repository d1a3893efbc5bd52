use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use tokio::time::Instant;

use crate::config::Config;

static BOT_STATE: OnceCell<Arc<BotStateInner>> = OnceCell::const_new();

/// Rate limiter using token bucket algorithm
pub struct RateLimiter {
    tokens: Mutex<f64>,
    max_tokens: f64,
    refill_rate: f64, // tokens per second
    last_refill: Mutex<Instant>,
}

impl RateLimiter {
    pub fn new(requests_per_second: f64) -> Self {
        Self {
            tokens: Mutex::new(requests_per_second),
            max_tokens: requests_per_second,
            refill_rate: requests_per_second,
            last_refill: Mutex::new(Instant::now()),
        }
    }

    pub async fn acquire(&self) {
        loop {
            // Refill tokens based on elapsed time
            let now = Instant::now();
            let mut last_refill = self.last_refill.lock().await;
            let elapsed = now.duration_since(*last_refill).as_secs_f64();

            let mut tokens = self.tokens.lock().await;
            *tokens = (*tokens + elapsed * self.refill_rate).min(self.max_tokens);
            *last_refill = now;

            if *tokens >= 1.0 {
                *tokens -= 1.0;
                return;
            }

            // Not enough tokens, wait for refill
            drop(tokens);
            drop(last_refill);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }
}

/// Gateway session data needed to RESUME after a dropped connection.
#[derive(Debug, Default, Clone)]
pub struct GatewaySession {
    pub session_id: Option<String>,
    pub sequence: Option<u64>,
    pub resume_gateway_url: Option<String>,
}

pub(crate) struct BotStateInner {
    token: String,
    application_id: String,
    client: Client,
    session: Mutex<GatewaySession>,
    rate_limiter: Arc<RateLimiter>,
}

pub(crate) async fn bot_state() -> Arc<BotStateInner> {
    BOT_STATE
        .get()
        .expect("BotState not initialized. Call init_bot_state() first.")
        .clone()
}

pub async fn init_bot_state(config: &Config) {
    BOT_STATE
        .get_or_init(|| async {
            Arc::new(BotStateInner {
                token: config.token.clone(),
                application_id: config.application_id.clone(),
                client: Client::new(),
                session: Mutex::new(GatewaySession::default()),
                rate_limiter: Arc::new(RateLimiter::new(config.rate_limit)),
            })
        })
        .await;
}

pub async fn update_sequence(seq: Option<u64>) {
    if let Some(s) = seq {
        let state = bot_state().await;
        state.session.lock().await.sequence = Some(s);
    }
}

pub async fn get_sequence() -> Option<u64> {
    let state = bot_state().await;
    state.session.lock().await.sequence
}

pub async fn session() -> GatewaySession {
    let state = bot_state().await;
    state.session.lock().await.clone()
}

pub async fn set_session(session_id: String, resume_gateway_url: Option<String>) {
    let state = bot_state().await;
    let mut session = state.session.lock().await;
    session.session_id = Some(session_id);
    session.resume_gateway_url = resume_gateway_url;
}

pub async fn clear_session() {
    let state = bot_state().await;
    *state.session.lock().await = GatewaySession::default();
}

pub async fn token() -> String {
    bot_state().await.token.clone()
}

pub async fn application_id() -> String {
    bot_state().await.application_id.clone()
}

pub async fn client() -> Client {
    bot_state().await.client.clone()
}

/// Get the rate limiter for Discord API requests
pub async fn rate_limiter() -> Arc<RateLimiter> {
    bot_state().await.rate_limiter.clone()
}
