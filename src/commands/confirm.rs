//! Confirm/cancel button round-trip for destructive commands.
//!
//! A prompt is opened for one user and carries a random nonce in its button
//! ids. The first press of either button by that user within the timeout
//! resolves it; anything later finds no pending entry.

use std::time::Duration;

use dashmap::DashMap;
use strum::{AsRefStr, EnumString};
use tokio::sync::oneshot;

use crate::types::discord::{ActionRow, Button, ButtonStyle, Interaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
pub enum Choice {
    #[strum(serialize = "confirm_delete")]
    Confirm,
    #[strum(serialize = "cancel_delete")]
    Cancel,
}

/// How a confirmation prompt ended. The component interaction is handed back
/// so the caller can update the message through it.
#[derive(Debug)]
pub enum ConfirmOutcome {
    Confirmed(Interaction),
    Cancelled(Interaction),
    TimedOut,
}

struct Pending {
    user_id: String,
    tx: oneshot::Sender<(Choice, Interaction)>,
}

/// Open prompts keyed by nonce.
#[derive(Default)]
pub struct ComponentCollector {
    pending: DashMap<String, Pending>,
}

impl ComponentCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start waiting for a press from `user_id`.
    pub fn open(&self, user_id: &str) -> ConfirmationPrompt {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let (tx, rx) = oneshot::channel();
        self.pending.insert(
            nonce.clone(),
            Pending {
                user_id: user_id.to_string(),
                tx,
            },
        );
        ConfirmationPrompt { nonce, rx }
    }

    /// Route a component interaction to its prompt. Returns false when the
    /// press belongs to no open prompt or comes from a different user.
    pub fn deliver(&self, press: &Interaction) -> bool {
        let Some((choice, nonce)) = press.custom_id().and_then(parse_custom_id) else {
            return false;
        };
        let Some(user_id) = press.invoker_id() else {
            return false;
        };

        match self.pending.remove_if(nonce, |_, p| p.user_id == user_id) {
            Some((_, pending)) => pending.tx.send((choice, press.clone())).is_ok(),
            None => {
                if self.pending.contains_key(nonce) {
                    tracing::debug!(user_id, "Ignoring confirmation press from another user");
                }
                false
            }
        }
    }

    pub fn is_open(&self, nonce: &str) -> bool {
        self.pending.contains_key(nonce)
    }

    fn close(&self, nonce: &str) {
        self.pending.remove(nonce);
    }
}

/// A single-shot wait for one user's confirm or cancel press.
pub struct ConfirmationPrompt {
    nonce: String,
    rx: oneshot::Receiver<(Choice, Interaction)>,
}

impl ConfirmationPrompt {
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn custom_id(&self, choice: Choice) -> String {
        format!("{}:{}", choice.as_ref(), self.nonce)
    }

    /// Cancel (secondary) then confirm (danger).
    pub fn buttons(&self, confirm_label: &str, cancel_label: &str) -> Vec<ActionRow> {
        vec![ActionRow::new(vec![
            Button::new(ButtonStyle::Secondary, cancel_label, self.custom_id(Choice::Cancel)),
            Button::new(ButtonStyle::Danger, confirm_label, self.custom_id(Choice::Confirm)),
        ])]
    }

    /// Drop the prompt without waiting, e.g. when it could not be shown.
    pub fn abandon(self, collector: &ComponentCollector) {
        collector.close(&self.nonce);
    }

    pub async fn wait(mut self, collector: &ComponentCollector, timeout: Duration) -> ConfirmOutcome {
        let received = match tokio::time::timeout(timeout, &mut self.rx).await {
            Ok(result) => result.ok(),
            Err(_) => {
                collector.close(&self.nonce);
                // a press may have landed between the deadline and close()
                self.rx.try_recv().ok()
            }
        };

        match received {
            Some((Choice::Confirm, press)) => ConfirmOutcome::Confirmed(press),
            Some((Choice::Cancel, press)) => ConfirmOutcome::Cancelled(press),
            None => ConfirmOutcome::TimedOut,
        }
    }
}

fn parse_custom_id(custom_id: &str) -> Option<(Choice, &str)> {
    let (choice, nonce) = custom_id.split_once(':')?;
    Some((choice.parse().ok()?, nonce))
}
