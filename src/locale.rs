//! Command names, option names and reply texts for each supported locale.
//!
//! Discord matches commands and options by name, so the names registered
//! by the registrar and the names the dispatcher routes on both come from
//! the same [`Lexicon`].

use strum::{AsRefStr, Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Locale {
    #[default]
    #[strum(serialize = "ja")]
    Japanese,
    #[strum(serialize = "en")]
    English,
}

/// Fixed strings for one locale.
#[derive(Debug)]
pub struct Lexicon {
    pub search_name: &'static str,
    pub search_description: &'static str,
    pub add_name: &'static str,
    pub add_description: &'static str,
    pub list_name: &'static str,
    pub list_description: &'static str,
    pub delete_name: &'static str,
    pub delete_description: &'static str,

    pub place_option: &'static str,
    pub place_search_description: &'static str,
    pub place_add_description: &'static str,
    pub place_delete_description: &'static str,
    pub x_description: &'static str,
    pub y_description: &'static str,
    pub z_description: &'static str,

    pub missing_place: &'static str,
    pub missing_delete_place: &'static str,
    pub not_registered: &'static str,
    pub invalid_add_options: &'static str,
    pub list_empty: &'static str,
    pub list_heading: &'static str,
    pub confirm_label: &'static str,
    pub cancel_label: &'static str,
    pub delete_cancelled: &'static str,
    pub delete_timed_out: &'static str,
    pub save_failed: &'static str,
}

static JAPANESE: Lexicon = Lexicon {
    search_name: "座標検索",
    search_description: "登録されている座標を検索します",
    add_name: "座標追加",
    add_description: "新しい場所の座標を追加します",
    list_name: "座標一覧",
    list_description: "すべての登録済み座標を一覧で表示します",
    delete_name: "座標削除",
    delete_description: "登録されている座標を削除します",

    place_option: "場所",
    place_search_description: "調べたい場所の名前",
    place_add_description: "追加したい場所の名前",
    place_delete_description: "削除したい場所の名前",
    x_description: "X座標",
    y_description: "Y座標",
    z_description: "Z座標",

    missing_place: "⚠️ 場所を指定してください。",
    missing_delete_place: "⚠️ 削除する場所を指定してください。",
    not_registered: "⚠️ その場所の情報は登録されていません。",
    invalid_add_options: "⚠️ すべてのオプションを正しく指定してください。",
    list_empty: "📭 登録されている座標はありません。",
    list_heading: "🗺️ 登録済みの座標一覧:",
    confirm_label: "はい、削除する",
    cancel_label: "いいえ",
    delete_cancelled: "🗑️ 削除をキャンセルしました。",
    delete_timed_out: "⌛ 確認がタイムアウトしたため、削除をキャンセルしました。",
    save_failed: "❌ 座標データを保存できませんでした。変更は取り消されました。",
};

static ENGLISH: Lexicon = Lexicon {
    search_name: "search",
    search_description: "Look up a registered coordinate",
    add_name: "add",
    add_description: "Register the coordinate of a new place",
    list_name: "list",
    list_description: "Show every registered coordinate",
    delete_name: "delete",
    delete_description: "Delete a registered coordinate",

    place_option: "place",
    place_search_description: "Name of the place to look up",
    place_add_description: "Name of the place to add",
    place_delete_description: "Name of the place to delete",
    x_description: "X coordinate",
    y_description: "Y coordinate",
    z_description: "Z coordinate",

    missing_place: "⚠️ Please specify a place.",
    missing_delete_place: "⚠️ Please specify the place to delete.",
    not_registered: "⚠️ That place is not registered.",
    invalid_add_options: "⚠️ Please specify all options correctly.",
    list_empty: "📭 No coordinates are registered.",
    list_heading: "🗺️ Registered coordinates:",
    confirm_label: "Yes, delete",
    cancel_label: "No",
    delete_cancelled: "🗑️ Deletion cancelled.",
    delete_timed_out: "⌛ Confirmation timed out, deletion cancelled.",
    save_failed: "❌ Could not save the coordinates. The change was rolled back.",
};

impl Locale {
    pub fn lexicon(self) -> &'static Lexicon {
        match self {
            Locale::Japanese => &JAPANESE,
            Locale::English => &ENGLISH,
        }
    }

    pub fn found(self, place: &str, coordinate: &str) -> String {
        match self {
            Locale::Japanese => format!("📍 **{}** の座標: {}", place, coordinate),
            Locale::English => format!("📍 Coordinates of **{}**: {}", place, coordinate),
        }
    }

    pub fn added(self, place: &str, coordinate: &str) -> String {
        match self {
            Locale::Japanese => format!("✅ **{}** を **{}** で登録しました！", place, coordinate),
            Locale::English => format!("✅ Registered **{}** at **{}**!", place, coordinate),
        }
    }

    pub fn list_line(self, place: &str, coordinate: &str) -> String {
        format!("📍 **{}** → {}", place, coordinate)
    }

    pub fn confirm_delete(self, place: &str) -> String {
        match self {
            Locale::Japanese => format!("本当に **{}** の情報を削除しますか？", place),
            Locale::English => format!("Really delete **{}**?", place),
        }
    }

    pub fn deleted(self, place: &str) -> String {
        match self {
            Locale::Japanese => format!("🗑️ **{}** の情報を削除しました。", place),
            Locale::English => format!("🗑️ Deleted **{}**.", place),
        }
    }

    pub fn place_not_registered(self, place: &str) -> String {
        match self {
            Locale::Japanese => format!("⚠️ **{}** は登録されていません。", place),
            Locale::English => format!("⚠️ **{}** is not registered.", place),
        }
    }
}
