use crate::commands::{Command, CommandContext};
use crate::error::Result;
use crate::locale::Locale;
use crate::types::discord::*;

pub struct List;

impl Command for List {
    fn definition(locale: Locale) -> SlashCommand {
        let lex = locale.lexicon();
        SlashCommand {
            name: lex.list_name.to_string(),
            command_type: CHAT_INPUT,
            description: lex.list_description.to_string(),
            options: Vec::new(),
        }
    }

    async fn handle(ctx: &CommandContext, interaction: Interaction) -> Result<()> {
        let lex = ctx.locale.lexicon();

        let lines: Vec<String> = {
            let mut store = ctx.store.lock().await;
            store.reload();
            store
                .iter()
                .map(|(place, coordinate)| ctx.locale.list_line(place, coordinate))
                .collect()
        };

        if lines.is_empty() {
            return ctx.reply(&interaction, InteractionResponse::message(lex.list_empty)).await;
        }

        let text = format!("{}\n\n{}", lex.list_heading, lines.join("\n"));
        let mut chunks = split_message(&text, MAX_MESSAGE_LENGTH).into_iter();

        if let Some(first) = chunks.next() {
            ctx.reply(&interaction, InteractionResponse::message(first)).await?;
        }
        for chunk in chunks {
            ctx.api
                .followup(&interaction.token, FollowupMessage { content: chunk })
                .await?;
        }

        Ok(())
    }
}

/// Split `text` into pieces of at most `limit` characters, breaking on line
/// boundaries. A single line longer than `limit` is cut at the limit.
fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let needed = if current.is_empty() { line_len } else { line_len + 1 };

        if current_len + needed > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > limit {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(limit) {
                if !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                }
                current = piece.iter().collect();
                current_len = piece.len();
            }
            continue;
        }

        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
