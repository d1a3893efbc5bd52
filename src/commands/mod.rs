mod add;
mod autocomplete;
pub mod confirm;
mod delete;
mod list;
mod search;

use std::sync::Arc;
use std::time::Duration;

use strum::{EnumIter, IntoEnumIterator};
use tokio::sync::Mutex;

use crate::discord::api::InteractionApi;
use crate::error::Result;
use crate::locale::Locale;
use crate::store::LocationStore;
use crate::types::discord::*;
use confirm::ComponentCollector;

/// Everything a command handler needs for one interaction.
pub struct CommandContext {
    pub api: Arc<dyn InteractionApi>,
    pub store: Mutex<LocationStore>,
    pub collector: ComponentCollector,
    pub locale: Locale,
    pub confirm_timeout: Duration,
}

impl CommandContext {
    pub fn new(
        api: Arc<dyn InteractionApi>,
        store: LocationStore,
        locale: Locale,
        confirm_timeout: Duration,
    ) -> Self {
        Self {
            api,
            store: Mutex::new(store),
            collector: ComponentCollector::new(),
            locale,
            confirm_timeout,
        }
    }

    async fn reply(&self, interaction: &Interaction, response: InteractionResponse) -> Result<()> {
        self.api.respond(interaction, response).await
    }
}

/// Trait for Discord slash commands
pub trait Command {
    /// Get command definition for registration
    fn definition(locale: Locale) -> SlashCommand;

    /// Handle command execution
    fn handle(
        ctx: &CommandContext,
        interaction: Interaction,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum CommandKind {
    Search,
    Add,
    List,
    Delete,
}

impl CommandKind {
    pub fn name(self, locale: Locale) -> &'static str {
        let lex = locale.lexicon();
        match self {
            CommandKind::Search => lex.search_name,
            CommandKind::Add => lex.add_name,
            CommandKind::List => lex.list_name,
            CommandKind::Delete => lex.delete_name,
        }
    }

    pub fn from_name(locale: Locale, name: &str) -> Option<Self> {
        Self::iter().find(|kind| kind.name(locale) == name)
    }

    pub fn definition(self, locale: Locale) -> SlashCommand {
        match self {
            CommandKind::Search => search::Search::definition(locale),
            CommandKind::Add => add::Add::definition(locale),
            CommandKind::List => list::List::definition(locale),
            CommandKind::Delete => delete::Delete::definition(locale),
        }
    }
}

/// Get all registered commands for Discord API registration
pub fn all_commands(locale: Locale) -> Vec<SlashCommand> {
    CommandKind::iter().map(|kind| kind.definition(locale)).collect()
}

fn string_option(name: &str, description: &str, autocomplete: bool) -> CommandOption {
    CommandOption {
        option_type: OPTION_STRING,
        name: name.to_string(),
        description: description.to_string(),
        required: true,
        autocomplete,
    }
}

fn integer_option(name: &str, description: &str) -> CommandOption {
    CommandOption {
        option_type: OPTION_INTEGER,
        name: name.to_string(),
        description: description.to_string(),
        required: true,
        autocomplete: false,
    }
}

/// Routes interactions to command handlers. Cheap to clone; clones share
/// the store and the open confirmation prompts.
#[derive(Clone)]
pub struct Dispatcher {
    ctx: Arc<CommandContext>,
}

impl Dispatcher {
    pub fn new(ctx: CommandContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    pub fn context(&self) -> &CommandContext {
        &self.ctx
    }

    /// Route interaction to appropriate command handler
    pub async fn handle_interaction(&self, interaction: Interaction) -> Result<()> {
        let ctx = &*self.ctx;

        match interaction.kind() {
            InteractionKind::Autocomplete => {
                let kind = interaction
                    .command_name()
                    .and_then(|name| CommandKind::from_name(ctx.locale, name));
                match kind {
                    Some(CommandKind::Search | CommandKind::Delete) => {
                        autocomplete::handle(ctx, interaction).await
                    }
                    _ => Ok(()),
                }
            }
            InteractionKind::ApplicationCommand => {
                let Some(name) = interaction.command_name() else {
                    return Ok(());
                };
                tracing::debug!(command = name, user = ?interaction.invoker_id(), "Slash command");

                match CommandKind::from_name(ctx.locale, name) {
                    Some(CommandKind::Search) => search::Search::handle(ctx, interaction).await,
                    Some(CommandKind::Add) => add::Add::handle(ctx, interaction).await,
                    Some(CommandKind::List) => list::List::handle(ctx, interaction).await,
                    Some(CommandKind::Delete) => delete::Delete::handle(ctx, interaction).await,
                    None => Ok(()), // Unknown command, ignore
                }
            }
            InteractionKind::MessageComponent => {
                if ctx.collector.deliver(&interaction) {
                    return Ok(());
                }
                // stale or foreign press; acknowledge so the client does not show an error
                ctx.reply(&interaction, InteractionResponse::deferred_update()).await
            }
            _ => Ok(()),
        }
    }
}
