use crate::commands::CommandContext;
use crate::error::Result;
use crate::types::discord::*;

/// Suggest stored place names containing what the user has typed so far.
pub async fn handle(ctx: &CommandContext, interaction: Interaction) -> Result<()> {
    let fragment = interaction.focused_value();

    let choices: Vec<AutocompleteChoice> = {
        let mut store = ctx.store.lock().await;
        store.reload();
        store
            .matching(fragment, MAX_AUTOCOMPLETE_CHOICES)
            .into_iter()
            .map(AutocompleteChoice::same)
            .collect()
    };

    ctx.reply(&interaction, InteractionResponse::autocomplete(choices)).await
}
