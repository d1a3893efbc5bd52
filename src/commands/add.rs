use crate::commands::{Command, CommandContext, integer_option, string_option};
use crate::error::Result;
use crate::locale::Locale;
use crate::store::Coordinate;
use crate::types::discord::*;

pub struct Add;

const X: &str = "x";
const Y: &str = "y";
const Z: &str = "z";

impl Command for Add {
    fn definition(locale: Locale) -> SlashCommand {
        let lex = locale.lexicon();
        SlashCommand {
            name: lex.add_name.to_string(),
            command_type: CHAT_INPUT,
            description: lex.add_description.to_string(),
            options: vec![
                string_option(lex.place_option, lex.place_add_description, false),
                integer_option(X, lex.x_description),
                integer_option(Y, lex.y_description),
                integer_option(Z, lex.z_description),
            ],
        }
    }

    async fn handle(ctx: &CommandContext, interaction: Interaction) -> Result<()> {
        let lex = ctx.locale.lexicon();

        let parsed = interaction.string_option(lex.place_option).zip(coordinate(&interaction));
        let Some((place, coordinate)) = parsed else {
            return ctx
                .reply(&interaction, InteractionResponse::message(lex.invalid_add_options))
                .await;
        };
        let coordinate = coordinate.to_string();

        let saved = {
            let mut store = ctx.store.lock().await;
            store.reload();
            store.insert(place, coordinate.clone())
        };

        let response = match saved {
            Ok(previous) => {
                tracing::info!(place, %coordinate, overwritten = previous.is_some(), "Location added");
                InteractionResponse::message(ctx.locale.added(place, &coordinate))
            }
            Err(e) => {
                tracing::error!(place, "Failed to save location:\n{}", e.tree());
                InteractionResponse::ephemeral(lex.save_failed)
            }
        };

        ctx.reply(&interaction, response).await
    }
}

fn coordinate(interaction: &Interaction) -> Option<Coordinate> {
    Some(Coordinate {
        x: interaction.integer_option(X)?,
        y: interaction.integer_option(Y)?,
        z: interaction.integer_option(Z)?,
    })
}
