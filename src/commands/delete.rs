use crate::commands::confirm::ConfirmOutcome;
use crate::commands::{Command, CommandContext, string_option};
use crate::error::{BotError, Result};
use crate::locale::Locale;
use crate::types::discord::*;

pub struct Delete;

impl Command for Delete {
    fn definition(locale: Locale) -> SlashCommand {
        let lex = locale.lexicon();
        SlashCommand {
            name: lex.delete_name.to_string(),
            command_type: CHAT_INPUT,
            description: lex.delete_description.to_string(),
            options: vec![string_option(lex.place_option, lex.place_delete_description, true)],
        }
    }

    async fn handle(ctx: &CommandContext, interaction: Interaction) -> Result<()> {
        let lex = ctx.locale.lexicon();

        let Some(place) = interaction.string_option(lex.place_option) else {
            return ctx
                .reply(&interaction, InteractionResponse::ephemeral(lex.missing_delete_place))
                .await;
        };

        let registered = {
            let mut store = ctx.store.lock().await;
            store.reload();
            store.contains(place)
        };
        if !registered {
            return ctx
                .reply(&interaction, InteractionResponse::ephemeral(ctx.locale.place_not_registered(place)))
                .await;
        }

        let user_id = interaction
            .invoker_id()
            .ok_or_else(|| BotError::new("interaction_without_user"))?;

        let prompt = ctx.collector.open(user_id);
        let question = InteractionResponse::ephemeral(ctx.locale.confirm_delete(place))
            .with_components(prompt.buttons(lex.confirm_label, lex.cancel_label));

        if let Err(e) = ctx.reply(&interaction, question).await {
            prompt.abandon(&ctx.collector);
            return Err(e);
        }

        match prompt.wait(&ctx.collector, ctx.confirm_timeout).await {
            ConfirmOutcome::Confirmed(press) => {
                let removed = {
                    let mut store = ctx.store.lock().await;
                    store.reload();
                    store.remove(place)
                };

                let notice = match removed {
                    Ok(Some(_)) => {
                        tracing::info!(place, user_id, "Location deleted");
                        ctx.locale.deleted(place)
                    }
                    // removed by someone else while we were waiting
                    Ok(None) => ctx.locale.place_not_registered(place),
                    Err(e) => {
                        tracing::error!(place, "Failed to save after delete:\n{}", e.tree());
                        lex.save_failed.to_string()
                    }
                };

                ctx.reply(&press, InteractionResponse::update(notice)).await
            }
            ConfirmOutcome::Cancelled(press) => {
                ctx.reply(&press, InteractionResponse::update(lex.delete_cancelled)).await
            }
            ConfirmOutcome::TimedOut => {
                tracing::debug!(place, user_id, "Delete confirmation timed out");
                ctx.api
                    .edit_original(&interaction.token, MessageEdit::final_notice(lex.delete_timed_out))
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::Dispatcher;
    use crate::commands::testing::*;
    use crate::types::discord::*;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::tempdir;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::task::JoinHandle;

    const TWO_PLACES: &str = "{\n  \"Spawn\": \"x=0, y=64, z=0\",\n  \"Base\": \"x=10, y=70, z=-5\"\n}";

    fn setup(path: &Path, timeout: Duration) -> (Dispatcher, UnboundedReceiver<Call>) {
        fs::write(path, TWO_PLACES).unwrap();
        dispatcher(path, timeout)
    }

    /// Start a delete and return the running handler plus the button ids
    /// from the confirmation prompt (cancel, confirm).
    async fn request_delete(
        dispatcher: &Dispatcher,
        rx: &mut UnboundedReceiver<Call>,
        name: &str,
    ) -> (JoinHandle<()>, String, String) {
        let handler = {
            let dispatcher = dispatcher.clone();
            let interaction = command("座標削除", place(name));
            tokio::spawn(async move { dispatcher.handle_interaction(interaction).await.unwrap() })
        };

        let prompt = next_response(rx).await;
        assert!(prompt.is_ephemeral());
        assert_eq!(prompt.content(), Some(format!("本当に **{}** の情報を削除しますか？", name).as_str()));

        let rows = prompt.data.unwrap().components.unwrap();
        let buttons = &rows[0].components;
        assert_eq!(buttons[0].style, ButtonStyle::Secondary as u8);
        assert_eq!(buttons[1].style, ButtonStyle::Danger as u8);
        (handler, buttons[0].custom_id.clone(), buttons[1].custom_id.clone())
    }

    #[tokio::test]
    async fn test_delete_unknown_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        let (dispatcher, mut rx) = setup(&path, Duration::from_secs(5));

        dispatcher.handle_interaction(command("座標削除", place("Nether"))).await.unwrap();

        let response = next_response(&mut rx).await;
        assert!(response.is_ephemeral());
        assert_eq!(response.content(), Some("⚠️ **Nether** は登録されていません。"));
        assert_eq!(fs::read_to_string(&path).unwrap(), TWO_PLACES);
    }

    #[tokio::test]
    async fn test_delete_confirmed_removes_only_that_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        let (dispatcher, mut rx) = setup(&path, Duration::from_secs(5));

        let (handler, _, confirm_id) = request_delete(&dispatcher, &mut rx, "Spawn").await;
        dispatcher.handle_interaction(press(&confirm_id, "42")).await.unwrap();
        handler.await.unwrap();

        let update = next_response(&mut rx).await;
        assert_eq!(update.response_type, UPDATE_MESSAGE);
        assert_eq!(update.content(), Some("🗑️ **Spawn** の情報を削除しました。"));
        assert_eq!(update.data.unwrap().components.map(|c| c.len()), Some(0));

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\n  \"Base\": \"x=10, y=70, z=-5\"\n}"
        );
    }

    #[tokio::test]
    async fn test_delete_cancelled_leaves_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        let (dispatcher, mut rx) = setup(&path, Duration::from_secs(5));

        let (handler, cancel_id, _) = request_delete(&dispatcher, &mut rx, "Spawn").await;
        dispatcher.handle_interaction(press(&cancel_id, "42")).await.unwrap();
        handler.await.unwrap();

        let update = next_response(&mut rx).await;
        assert_eq!(update.response_type, UPDATE_MESSAGE);
        assert_eq!(update.content(), Some("🗑️ 削除をキャンセルしました。"));
        assert_eq!(fs::read_to_string(&path).unwrap(), TWO_PLACES);
    }

    #[tokio::test]
    async fn test_delete_timeout_edits_original() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        let (dispatcher, mut rx) = setup(&path, Duration::from_millis(50));

        let (handler, _, confirm_id) = request_delete(&dispatcher, &mut rx, "Base").await;
        handler.await.unwrap();

        match rx.recv().await {
            Some(Call::EditOriginal(edit)) => {
                assert_eq!(edit.content, "⌛ 確認がタイムアウトしたため、削除をキャンセルしました。");
                assert!(edit.components.is_empty());
            }
            other => panic!("expected an edit, got {:?}", other),
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), TWO_PLACES);

        // the buttons are dead now
        dispatcher.handle_interaction(press(&confirm_id, "42")).await.unwrap();
        assert_eq!(next_response(&mut rx).await.response_type, DEFERRED_UPDATE_MESSAGE);
        assert_eq!(fs::read_to_string(&path).unwrap(), TWO_PLACES);
    }

    #[tokio::test]
    async fn test_delete_ignores_other_users() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        let (dispatcher, mut rx) = setup(&path, Duration::from_secs(5));

        let (handler, cancel_id, confirm_id) = request_delete(&dispatcher, &mut rx, "Spawn").await;

        dispatcher.handle_interaction(press(&confirm_id, "7")).await.unwrap();
        assert_eq!(next_response(&mut rx).await.response_type, DEFERRED_UPDATE_MESSAGE);
        assert_eq!(fs::read_to_string(&path).unwrap(), TWO_PLACES);

        dispatcher.handle_interaction(press(&cancel_id, "42")).await.unwrap();
        handler.await.unwrap();
        assert_eq!(next_response(&mut rx).await.content(), Some("🗑️ 削除をキャンセルしました。"));
    }

    #[tokio::test]
    async fn test_delete_without_place_prompts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        let (dispatcher, mut rx) = setup(&path, Duration::from_secs(5));

        dispatcher.handle_interaction(command("座標削除", serde_json::json!([]))).await.unwrap();

        let response = next_response(&mut rx).await;
        assert!(response.is_ephemeral());
        assert_eq!(response.content(), Some("⚠️ 削除する場所を指定してください。"));
    }

    #[tokio::test]
    async fn test_add_during_wait_survives_delete() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        let (dispatcher, mut rx) = setup(&path, Duration::from_secs(5));

        let (handler, _, confirm_id) = request_delete(&dispatcher, &mut rx, "Spawn").await;

        dispatcher
            .handle_interaction(command("座標追加", add_options("Farm", 1, 2, 3)))
            .await
            .unwrap();
        assert_eq!(
            next_response(&mut rx).await.content(),
            Some("✅ **Farm** を **x=1, y=2, z=3** で登録しました！")
        );

        dispatcher.handle_interaction(press(&confirm_id, "42")).await.unwrap();
        handler.await.unwrap();

        let update = next_response(&mut rx).await;
        assert_eq!(update.response_type, UPDATE_MESSAGE);
        assert_eq!(update.content(), Some("🗑️ **Spawn** の情報を削除しました。"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\n  \"Base\": \"x=10, y=70, z=-5\",\n  \"Farm\": \"x=1, y=2, z=3\"\n}"
        );
    }

    #[tokio::test]
    async fn test_place_removed_during_wait() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        let (dispatcher, mut rx) = setup(&path, Duration::from_secs(5));

        let (handler, _, confirm_id) = request_delete(&dispatcher, &mut rx, "Spawn").await;

        // another process rewrote the file while the prompt was open
        let rewritten = "{\n  \"Base\": \"x=10, y=70, z=-5\"\n}";
        fs::write(&path, rewritten).unwrap();

        dispatcher.handle_interaction(press(&confirm_id, "42")).await.unwrap();
        handler.await.unwrap();

        let update = next_response(&mut rx).await;
        assert_eq!(update.response_type, UPDATE_MESSAGE);
        assert_eq!(update.content(), Some("⚠️ **Spawn** は登録されていません。"));
        assert_eq!(fs::read_to_string(&path).unwrap(), rewritten);
    }

    #[tokio::test]
    async fn test_confirmed_delete_save_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        let (dispatcher, mut rx) = setup(&path, Duration::from_secs(5));

        let (handler, _, confirm_id) = request_delete(&dispatcher, &mut rx, "Spawn").await;

        // the file stays readable but the temp file cannot be written
        fs::create_dir(dir.path().join("locations.json.tmp")).unwrap();

        dispatcher.handle_interaction(press(&confirm_id, "42")).await.unwrap();
        handler.await.unwrap();

        let update = next_response(&mut rx).await;
        assert_eq!(update.response_type, UPDATE_MESSAGE);
        assert_eq!(
            update.content(),
            Some("❌ 座標データを保存できませんでした。変更は取り消されました。")
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), TWO_PLACES);
        assert!(dispatcher.context().store.lock().await.get("Spawn").is_some());
    }
}
