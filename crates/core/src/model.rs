use serde::{Deserialize, Serialize};

/// Backend family serving a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Ollama,
    Google,
    /// Local placeholder backend for development
    Dummy,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Ollama => "ollama",
            Provider::Google => "google",
            Provider::Dummy => "dummy",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A selectable model as listed by the chat controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub provider: Provider,
}

impl Model {
    pub fn new(id: impl Into<String>, name: impl Into<String>, provider: Provider) -> Self {
        Self { id: id.into(), name: name.into(), description: String::new(), provider }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Resolve the initially selected model
///
/// Returns the configured default when it is listed, otherwise the first
/// available model, otherwise `None`.
pub fn resolve_default_model<'a>(models: &'a [Model], configured: Option<&str>) -> Option<&'a Model> {
    configured
        .and_then(|id| models.iter().find(|m| m.id == id))
        .or_else(|| models.first())
}
