use crate::commands::{Command, CommandContext, string_option};
use crate::error::Result;
use crate::locale::Locale;
use crate::types::discord::*;

pub struct Search;

impl Command for Search {
    fn definition(locale: Locale) -> SlashCommand {
        let lex = locale.lexicon();
        SlashCommand {
            name: lex.search_name.to_string(),
            command_type: CHAT_INPUT,
            description: lex.search_description.to_string(),
            options: vec![string_option(lex.place_option, lex.place_search_description, true)],
        }
    }

    async fn handle(ctx: &CommandContext, interaction: Interaction) -> Result<()> {
        let lex = ctx.locale.lexicon();

        let Some(place) = interaction.string_option(lex.place_option) else {
            return ctx.reply(&interaction, InteractionResponse::message(lex.missing_place)).await;
        };

        let reply = {
            let mut store = ctx.store.lock().await;
            store.reload();
            match store.get(place) {
                Some(coordinate) => ctx.locale.found(place, coordinate),
                None => lex.not_registered.to_string(),
            }
        };

        ctx.reply(&interaction, InteractionResponse::message(reply)).await
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testing::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_search_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        fs::write(&path, r#"{"Spawn": "x=0, y=64, z=0"}"#).unwrap();
        let (dispatcher, mut rx) = dispatcher(&path, Duration::from_secs(1));

        dispatcher.handle_interaction(command("座標検索", place("Spawn"))).await.unwrap();

        let response = next_response(&mut rx).await;
        assert_eq!(response.content(), Some("📍 **Spawn** の座標: x=0, y=64, z=0"));
        assert!(!response.is_ephemeral());
    }

    #[tokio::test]
    async fn test_search_unknown_place_does_not_touch_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        let original = "{\n  \"Spawn\": \"x=0, y=64, z=0\"\n}";
        fs::write(&path, original).unwrap();
        let (dispatcher, mut rx) = dispatcher(&path, Duration::from_secs(1));

        // exact, case-sensitive match only
        for name in ["spawn", "Spaw", "Nether"] {
            dispatcher.handle_interaction(command("座標検索", place(name))).await.unwrap();
            let response = next_response(&mut rx).await;
            assert_eq!(response.content(), Some("⚠️ その場所の情報は登録されていません。"));
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[tokio::test]
    async fn test_search_without_place_prompts() {
        let dir = tempdir().unwrap();
        let (dispatcher, mut rx) = dispatcher(&dir.path().join("locations.json"), Duration::from_secs(1));

        dispatcher.handle_interaction(command("座標検索", place(""))).await.unwrap();

        let response = next_response(&mut rx).await;
        assert_eq!(response.content(), Some("⚠️ 場所を指定してください。"));
    }

    #[tokio::test]
    async fn test_search_sees_external_edit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        let (dispatcher, mut rx) = dispatcher(&path, Duration::from_secs(1));

        fs::write(&path, r#"{"Base": "x=1, y=2, z=3"}"#).unwrap();
        dispatcher.handle_interaction(command("座標検索", place("Base"))).await.unwrap();

        let response = next_response(&mut rx).await;
        assert_eq!(response.content(), Some("📍 **Base** の座標: x=1, y=2, z=3"));
    }
}
