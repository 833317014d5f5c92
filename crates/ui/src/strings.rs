use ollaix_core::{I18n, LocaleError};

/// Every user-facing string the TUI shows, resolved once at startup
///
/// Resolution fails on the first missing key, so a broken locale table is
/// reported before the terminal is taken over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiStrings {
    pub title: String,
    pub close: String,
    pub initial_title: String,
    pub initial_subtitle: String,
    pub role_user: String,
    pub role_assistant: String,
    pub loading: String,
    pub thinking_loading: String,
    pub thinking_title: String,
    pub edit_title: String,
    pub edit_send: String,
    pub edit_cancel: String,
    pub copy: String,
    pub copied: String,
    pub edit: String,
    pub like: String,
    pub dislike: String,
    pub cancelled: String,
    pub error: String,
    pub placeholder: String,
    pub send: String,
    pub stop: String,
    pub newline: String,
    pub model: String,
    pub models_loading: String,
    pub hint_scroll: String,
    pub hint_bottom: String,
    pub hint_select: String,
    pub hint_new: String,
    pub hint_quit: String,
    pub created_by: String,
    pub update_title: String,
    pub update_message: String,
    pub update_reload: String,
}

impl UiStrings {
    pub fn resolve(i18n: &I18n) -> Result<Self, LocaleError> {
        let t = |key: &str| i18n.t(key).map(str::to_string);

        Ok(Self {
            title: t("header.title")?,
            close: t("dialog.close")?,
            initial_title: t("initial.message.title")?,
            initial_subtitle: t("initial.message.subtitle")?,
            role_user: t("chat.role.user")?,
            role_assistant: t("chat.role.assistant")?,
            loading: t("chat.message.loading")?,
            thinking_loading: t("chat.message.thinking.loading.title")?,
            thinking_title: t("chat.message.thinking.title")?,
            edit_title: t("chat.message.edit.title")?,
            edit_send: t("chat.message.edit.send")?,
            edit_cancel: t("chat.message.edit.cancel")?,
            copy: t("chat.message.copy")?,
            copied: t("chat.message.copied")?,
            edit: t("chat.message.edit")?,
            like: t("chat.message.like")?,
            dislike: t("chat.message.dislike")?,
            cancelled: t("chat.cancelled")?,
            error: t("chat.error")?,
            placeholder: t("chatform.placeholder")?,
            send: t("chatform.send")?,
            stop: t("chatform.stop")?,
            newline: t("chatform.newline")?,
            model: t("chatform.model")?,
            models_loading: t("chatform.models.loading")?,
            hint_scroll: t("hint.scroll")?,
            hint_bottom: t("hint.bottom")?,
            hint_select: t("hint.select")?,
            hint_new: t("hint.new")?,
            hint_quit: t("hint.quit")?,
            created_by: t("footer.created_by")?,
            update_title: t("promt.title")?,
            update_message: t("promt.offline.update")?,
            update_reload: t("promt.offline.reload")?,
        })
    }
}
