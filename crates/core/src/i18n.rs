//! Locale resource table.
//!
//! Every user-facing string resolves through a flat key -> string table per
//! locale. A missing key is a configuration error; there is no fallback to
//! another locale at lookup time.

use crate::error::LocaleError;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Supported UI locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    pub const VALUES: &[Locale] = &[Locale::En, Locale::Fr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Locale {
    type Err = LocaleError;

    /// Accepts bare tags and region-qualified tags (`fr-FR`, `en_US.UTF-8`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s.split(['-', '_', '.']).next().unwrap_or_default().to_lowercase();
        match primary.as_str() {
            "en" => Ok(Locale::En),
            "fr" => Ok(Locale::Fr),
            _ => Err(LocaleError::UnsupportedLocale(s.to_string())),
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("header.title", "Ollaix"),
    ("dialog.close", "Close"),
    ("initial.message.title", "How can I help you today?"),
    ("initial.message.subtitle", "Select a model and ask your question below."),
    ("chat.role.user", "You"),
    ("chat.role.assistant", "Assistant"),
    ("chat.message.loading", "Generating"),
    ("chat.message.thinking.loading.title", "Thinking..."),
    ("chat.message.thinking.title", "Show reasoning"),
    ("chat.message.edit.title", "Editing message"),
    ("chat.message.edit.send", "Send"),
    ("chat.message.edit.cancel", "Cancel"),
    ("chat.message.copy", "copy"),
    ("chat.message.copied", "Copied to clipboard"),
    ("chat.message.edit", "edit"),
    ("chat.message.like", "like"),
    ("chat.message.dislike", "dislike"),
    ("chat.cancelled", "Generation stopped."),
    ("chat.error", "Oops! An error occurred:"),
    ("chatform.placeholder", "Type your question"),
    ("chatform.send", "send"),
    ("chatform.stop", "stop"),
    ("chatform.newline", "newline"),
    ("chatform.model", "model"),
    ("chatform.models.loading", "Loading models..."),
    ("hint.scroll", "scroll"),
    ("hint.bottom", "bottom"),
    ("hint.select", "select"),
    ("hint.new", "new chat"),
    ("hint.quit", "quit"),
    ("footer.created_by", "Created by"),
    ("promt.title", "Update Available"),
    ("promt.offline.update", "New content available, click on reload button to update."),
    ("promt.offline.reload", "Reload"),
];

const FR: &[(&str, &str)] = &[
    ("header.title", "Ollaix"),
    ("dialog.close", "Fermer"),
    ("initial.message.title", "Comment puis-je vous aider aujourd'hui ?"),
    ("initial.message.subtitle", "Sélectionnez un modèle et posez votre question ci-dessous."),
    ("chat.role.user", "Vous"),
    ("chat.role.assistant", "Assistant"),
    ("chat.message.loading", "Génération"),
    ("chat.message.thinking.loading.title", "Réflexion en cours..."),
    ("chat.message.thinking.title", "Afficher le raisonnement"),
    ("chat.message.edit.title", "Modification du message"),
    ("chat.message.edit.send", "Envoyer"),
    ("chat.message.edit.cancel", "Annuler"),
    ("chat.message.copy", "copier"),
    ("chat.message.copied", "Copié dans le presse-papiers"),
    ("chat.message.edit", "modifier"),
    ("chat.message.like", "j'aime"),
    ("chat.message.dislike", "je n'aime pas"),
    ("chat.cancelled", "Génération interrompue."),
    ("chat.error", "Oups ! Une erreur est survenue :"),
    ("chatform.placeholder", "Saisissez votre question"),
    ("chatform.send", "envoyer"),
    ("chatform.stop", "arrêter"),
    ("chatform.newline", "nouvelle ligne"),
    ("chatform.model", "modèle"),
    ("chatform.models.loading", "Chargement des modèles..."),
    ("hint.scroll", "défiler"),
    ("hint.bottom", "bas"),
    ("hint.select", "sélectionner"),
    ("hint.new", "nouvelle discussion"),
    ("hint.quit", "quitter"),
    ("footer.created_by", "Créé par"),
    ("promt.title", "Mise à jour disponible"),
    (
        "promt.offline.update",
        "Nouveau contenu disponible, cliquez sur le bouton de rechargement pour mettre à jour.",
    ),
    ("promt.offline.reload", "Recharger"),
];

/// Flat key -> string tables for every supported locale
#[derive(Debug, Clone, Default)]
pub struct LocaleTable {
    tables: HashMap<Locale, HashMap<String, String>>,
}

impl LocaleTable {
    /// Tables shipped with the application
    pub fn builtin() -> Self {
        let mut table = Self::default();
        table.insert_all(Locale::En, EN.iter().copied());
        table.insert_all(Locale::Fr, FR.iter().copied());
        table
    }

    /// Add or override entries for a locale
    pub fn insert_all<'a>(&mut self, locale: Locale, entries: impl IntoIterator<Item = (&'a str, &'a str)>) {
        let table = self.tables.entry(locale).or_default();
        for (key, value) in entries {
            table.insert(key.to_string(), value.to_string());
        }
    }

    pub fn get(&self, locale: Locale, key: &str) -> Result<&str, LocaleError> {
        self.tables
            .get(&locale)
            .and_then(|table| table.get(key))
            .map(String::as_str)
            .ok_or_else(|| LocaleError::missing_key(locale.as_str(), key))
    }

    /// Every locale must define exactly the same key set
    pub fn validate(&self) -> Result<(), LocaleError> {
        let all_keys: BTreeSet<&str> =
            self.tables.values().flat_map(|table| table.keys().map(String::as_str)).collect();

        for locale in Locale::VALUES {
            let table = self.tables.get(locale);
            for key in &all_keys {
                if table.is_none_or(|t| !t.contains_key(*key)) {
                    return Err(LocaleError::missing_key(locale.as_str(), *key));
                }
            }
        }
        Ok(())
    }
}

/// Translator bound to one locale
#[derive(Debug, Clone)]
pub struct I18n {
    locale: Locale,
    table: Arc<LocaleTable>,
}

impl I18n {
    /// Translator over the built-in tables, validated up front
    pub fn new(locale: Locale) -> Result<Self, LocaleError> {
        Self::with_table(locale, LocaleTable::builtin())
    }

    pub fn with_table(locale: Locale, table: LocaleTable) -> Result<Self, LocaleError> {
        table.validate()?;
        Ok(Self { locale, table: Arc::new(table) })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Look up a key; a missing key is an error, never a fallback
    pub fn t(&self, key: &str) -> Result<&str, LocaleError> {
        self.table.get(self.locale, key)
    }
}
