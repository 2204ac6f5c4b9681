//! Backend model registry
//!
//! Each task module runs in a model context. The context decides which
//! backend model identifiers the user may pick from; the registry keeps
//! one current selection per context.

use crate::error::{Result, StudioError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier selected when a context is created
pub const DEFAULT_MODEL: &str = "qwen";

/// A selectable backend model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelEntry {
    /// Identifier sent to the backend as `selectedModel`
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
}

const GENERAL_MODELS: &[ModelEntry] = &[
    ModelEntry {
        id: "qwen",
        name: "Qwen",
    },
    ModelEntry {
        id: "hunyuan",
        name: "Hunyuan",
    },
    ModelEntry {
        id: "deepseek",
        name: "Deepseek",
    },
];

const ASSET_MODELS: &[ModelEntry] = &[
    ModelEntry {
        id: "qwen",
        name: "Qwen",
    },
    ModelEntry {
        id: "lightai",
        name: "LightAI",
    },
    ModelEntry {
        id: "gemini",
        name: "Gemini",
    },
];

/// Partition of the available model identifiers
///
/// Planning and development share the general context; asset generation
/// has its own list. An identifier may appear in both lists, but the
/// selections are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelContext {
    /// Planning and development modules
    General,
    /// Asset generation module
    Assets,
}

impl ModelContext {
    /// All contexts, in display order
    pub const ALL: [ModelContext; 2] = [ModelContext::General, ModelContext::Assets];
}

impl fmt::Display for ModelContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General => write!(f, "general"),
            Self::Assets => write!(f, "assets"),
        }
    }
}

/// Returns the fixed, ordered list of models valid for `context`
///
/// # Examples
///
/// ```
/// use studiochat::models::{available_models, ModelContext};
///
/// let ids: Vec<&str> = available_models(ModelContext::Assets)
///     .iter()
///     .map(|m| m.id)
///     .collect();
/// assert_eq!(ids, vec!["qwen", "lightai", "gemini"]);
/// ```
pub fn available_models(context: ModelContext) -> &'static [ModelEntry] {
    match context {
        ModelContext::General => GENERAL_MODELS,
        ModelContext::Assets => ASSET_MODELS,
    }
}

/// Returns true if `id` is selectable in `context`
pub fn is_available(context: ModelContext, id: &str) -> bool {
    available_models(context).iter().any(|m| m.id == id)
}

/// Per-session model selection
///
/// Holds the current selection for every context. Selections are
/// session-scoped; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRegistry {
    general: &'static str,
    assets: &'static str,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self {
            general: DEFAULT_MODEL,
            assets: DEFAULT_MODEL,
        }
    }
}

impl ModelRegistry {
    /// Creates a registry with `default_model` selected in every context
    ///
    /// # Errors
    ///
    /// Returns `StudioError::InvalidModel` if the identifier is not valid in
    /// some context.
    pub fn with_default(default_model: &str) -> Result<Self> {
        let mut registry = Self::default();
        for context in ModelContext::ALL {
            registry.select(context, default_model)?;
        }
        Ok(registry)
    }

    /// Returns the models available in `context`
    pub fn available_models(&self, context: ModelContext) -> &'static [ModelEntry] {
        available_models(context)
    }

    /// Records `id` as the selection for `context`
    ///
    /// # Errors
    ///
    /// Returns `StudioError::InvalidModel` if `id` is not in the context's
    /// list. The current selection is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use studiochat::models::{ModelContext, ModelRegistry};
    ///
    /// let mut registry = ModelRegistry::default();
    /// assert_eq!(registry.select(ModelContext::General, "deepseek").unwrap(), "deepseek");
    /// assert!(registry.select(ModelContext::General, "gemini").is_err());
    /// assert_eq!(registry.selected(ModelContext::General), "deepseek");
    /// ```
    pub fn select(&mut self, context: ModelContext, id: &str) -> Result<&'static str> {
        let entry = available_models(context)
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| StudioError::InvalidModel {
                context,
                model: id.to_string(),
            })?;

        let slot = match context {
            ModelContext::General => &mut self.general,
            ModelContext::Assets => &mut self.assets,
        };
        *slot = entry.id;

        tracing::debug!(%context, model = entry.id, "Model selected");
        Ok(entry.id)
    }

    /// Returns the current selection for `context`
    pub fn selected(&self, context: ModelContext) -> &'static str {
        match context {
            ModelContext::General => self.general,
            ModelContext::Assets => self.assets,
        }
    }

    /// Returns the full entry for the current selection in `context`
    pub fn selected_entry(&self, context: ModelContext) -> ModelEntry {
        let id = self.selected(context);
        available_models(context)
            .iter()
            .copied()
            .find(|m| m.id == id)
            .unwrap_or(ModelEntry { id, name: id })
    }
}
