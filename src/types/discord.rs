use serde::{Deserialize, Serialize};
use serde_json::Value;

// Discord Gateway opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Dispatch = 0,
    Heartbeat = 1,
    Identify = 2,
    Resume = 6,
    Reconnect = 7,
    InvalidSession = 9,
    Hello = 10,
    HeartbeatAck = 11,
    Unknown,
}

impl Opcode {
    pub fn from_u8(op: u8) -> Self {
        match op {
            0 => Self::Dispatch,
            1 => Self::Heartbeat,
            2 => Self::Identify,
            6 => Self::Resume,
            7 => Self::Reconnect,
            9 => Self::InvalidSession,
            10 => Self::Hello,
            11 => Self::HeartbeatAck,
            _ => Self::Unknown,
        }
    }
}

// Discord Gateway event types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Ready,
    Resumed,
    InteractionCreate,
    Unknown,
}

impl EventType {
    pub fn from_name(s: &str) -> Self {
        match s {
            "READY" => Self::Ready,
            "RESUMED" => Self::Resumed,
            "INTERACTION_CREATE" => Self::InteractionCreate,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GatewayResponse {
    pub url: String,
}

// Discord event from WebSocket
#[derive(Debug, Deserialize)]
pub struct DiscordEvent {
    pub op: u8,
    pub d: Option<Value>,
    pub s: Option<u64>,
    pub t: Option<String>,
}

impl DiscordEvent {
    pub fn opcode(&self) -> Opcode {
        Opcode::from_u8(self.op)
    }

    pub fn event_type(&self) -> EventType {
        self.t
            .as_deref()
            .map(EventType::from_name)
            .unwrap_or(EventType::Unknown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    ApplicationCommand,
    MessageComponent,
    Autocomplete,
    Other(u8),
}

impl InteractionKind {
    pub fn from_u8(kind: u8) -> Self {
        match kind {
            2 => Self::ApplicationCommand,
            3 => Self::MessageComponent,
            4 => Self::Autocomplete,
            other => Self::Other(other),
        }
    }
}

// Interaction from Discord
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    pub id: String,
    #[serde(rename = "type")]
    pub interaction_type: u8,
    pub data: Option<InteractionData>,
    pub token: String,
    /// Present for interactions inside a guild.
    #[serde(default)]
    pub member: Option<Member>,
    /// Present for interactions in DMs.
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub options: Vec<InteractionOption>,
    #[serde(default)]
    pub custom_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionOption {
    pub name: String,
    #[serde(rename = "type")]
    pub option_type: u8,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub focused: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub user: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
}

impl Interaction {
    pub fn kind(&self) -> InteractionKind {
        InteractionKind::from_u8(self.interaction_type)
    }

    pub fn command_name(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.name.as_str())
    }

    pub fn custom_id(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.custom_id.as_deref())
    }

    /// The user who triggered the interaction, in a guild or a DM.
    pub fn invoker(&self) -> Option<&User> {
        self.member
            .as_ref()
            .and_then(|m| m.user.as_ref())
            .or(self.user.as_ref())
    }

    pub fn invoker_id(&self) -> Option<&str> {
        self.invoker().map(|u| u.id.as_str())
    }

    fn option(&self, name: &str) -> Option<&InteractionOption> {
        self.data.as_ref()?.options.iter().find(|o| o.name == name)
    }

    /// A string option, `None` when absent or blank.
    pub fn string_option(&self, name: &str) -> Option<&str> {
        self.option(name)?
            .value
            .as_ref()?
            .as_str()
            .filter(|s| !s.is_empty())
    }

    /// An integer option. Numeric strings are accepted too, which is how
    /// partially typed values show up in autocomplete payloads.
    pub fn integer_option(&self, name: &str) -> Option<i64> {
        match self.option(name)?.value.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Text the user has typed so far into the focused autocomplete option.
    pub fn focused_value(&self) -> &str {
        self.data
            .as_ref()
            .and_then(|d| d.options.iter().find(|o| o.focused))
            .and_then(|o| o.value.as_ref())
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

// Interaction callback types
pub const CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;
pub const DEFERRED_UPDATE_MESSAGE: u8 = 6;
pub const UPDATE_MESSAGE: u8 = 7;
pub const APPLICATION_COMMAND_AUTOCOMPLETE_RESULT: u8 = 8;

pub const EPHEMERAL: u64 = 1 << 6;

/// Discord caps autocomplete results at 25 choices.
pub const MAX_AUTOCOMPLETE_CHOICES: usize = 25;
/// Discord caps message content at 2000 characters.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

// Interaction response to Discord
#[derive(Debug, Clone, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub response_type: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<InteractionResponseData>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InteractionResponseData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ActionRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<AutocompleteChoice>>,
}

impl InteractionResponse {
    /// A new message visible to the whole channel.
    pub fn message(content: impl Into<String>) -> Self {
        Self {
            response_type: CHANNEL_MESSAGE_WITH_SOURCE,
            data: Some(InteractionResponseData {
                content: Some(content.into()),
                ..Default::default()
            }),
        }
    }

    /// A new message visible only to the invoking user.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self::message(content).with_flags(EPHEMERAL)
    }

    /// Replace the content of the message a component belongs to and drop
    /// its components.
    pub fn update(content: impl Into<String>) -> Self {
        Self {
            response_type: UPDATE_MESSAGE,
            data: Some(InteractionResponseData {
                content: Some(content.into()),
                components: Some(Vec::new()),
                ..Default::default()
            }),
        }
    }

    /// Acknowledge a component press without changing anything.
    pub fn deferred_update() -> Self {
        Self {
            response_type: DEFERRED_UPDATE_MESSAGE,
            data: None,
        }
    }

    pub fn autocomplete(choices: Vec<AutocompleteChoice>) -> Self {
        Self {
            response_type: APPLICATION_COMMAND_AUTOCOMPLETE_RESULT,
            data: Some(InteractionResponseData {
                choices: Some(choices),
                ..Default::default()
            }),
        }
    }

    pub fn with_flags(mut self, flags: u64) -> Self {
        if let Some(data) = self.data.as_mut() {
            data.flags = Some(data.flags.unwrap_or(0) | flags);
        }
        self
    }

    pub fn with_components(mut self, rows: Vec<ActionRow>) -> Self {
        if let Some(data) = self.data.as_mut() {
            data.components = Some(rows);
        }
        self
    }

    pub fn content(&self) -> Option<&str> {
        self.data.as_ref()?.content.as_deref()
    }

    pub fn is_ephemeral(&self) -> bool {
        self.data
            .as_ref()
            .and_then(|d| d.flags)
            .is_some_and(|f| f & EPHEMERAL != 0)
    }
}

/// Body of `PATCH /webhooks/{application}/{token}/messages/@original`.
#[derive(Debug, Clone, Serialize)]
pub struct MessageEdit {
    pub content: String,
    pub components: Vec<ActionRow>,
}

impl MessageEdit {
    /// Replace the content and remove every component.
    pub fn final_notice(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            components: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowupMessage {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutocompleteChoice {
    pub name: String,
    pub value: String,
}

impl AutocompleteChoice {
    pub fn same(text: &str) -> Self {
        Self {
            name: text.to_string(),
            value: text.to_string(),
        }
    }
}

const ACTION_ROW: u8 = 1;
const BUTTON: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Secondary = 2,
    Danger = 4,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionRow {
    #[serde(rename = "type")]
    pub component_type: u8,
    pub components: Vec<Button>,
}

impl ActionRow {
    pub fn new(components: Vec<Button>) -> Self {
        Self {
            component_type: ACTION_ROW,
            components,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Button {
    #[serde(rename = "type")]
    pub component_type: u8,
    pub style: u8,
    pub label: String,
    pub custom_id: String,
}

impl Button {
    pub fn new(style: ButtonStyle, label: impl Into<String>, custom_id: impl Into<String>) -> Self {
        Self {
            component_type: BUTTON,
            style: style as u8,
            label: label.into(),
            custom_id: custom_id.into(),
        }
    }
}

// Application command registration
pub const CHAT_INPUT: u8 = 1;
pub const OPTION_STRING: u8 = 3;
pub const OPTION_INTEGER: u8 = 4;

#[derive(Debug, Clone, Serialize)]
pub struct SlashCommand {
    pub name: String,
    #[serde(rename = "type")]
    pub command_type: u8,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandOption {
    #[serde(rename = "type")]
    pub option_type: u8,
    pub name: String,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub autocomplete: bool,
}

// Discord API error response
#[derive(Debug, Deserialize)]
pub struct DiscordErrorResponse {
    pub message: String,
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default)]
    pub retry_after: Option<f64>,
    #[serde(default)]
    pub global: Option<bool>,
    #[serde(default)]
    pub errors: Option<Value>,
}

impl std::fmt::Display for DiscordErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.unwrap_or(0), self.message)?;

        if let Some(retry) = self.retry_after {
            write!(f, " (retry after {:.3}s)", retry)?;
        }

        if self.global == Some(true) {
            write!(f, " [GLOBAL]")?;
        }

        if let Some(errors) = &self.errors {
            write!(
                f,
                "\nDetails: {}",
                serde_json::to_string_pretty(errors).unwrap_or_default()
            )?;
        }

        Ok(())
    }
}
