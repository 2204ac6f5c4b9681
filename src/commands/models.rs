//! Model listing commands for studiochat
//!
//! Shows the fixed per-context model lists as a table or as JSON.

use crate::backend::TaskKind;
use crate::config::Config;
use crate::error::{Result, StudioError};
use crate::models::{available_models, ModelContext, ModelEntry};
use prettytable::{row, Table};
use serde::Serialize;

/// Models of one context, as printed by `studiochat models --json`
#[derive(Debug, Clone, Serialize)]
pub struct ContextListing {
    /// Model context
    pub context: ModelContext,
    /// Modules that select from this context
    pub modules: Vec<TaskKind>,
    /// Identifier selected when a session starts
    pub default: String,
    /// Models in display order
    pub models: Vec<ModelEntry>,
}

/// Builds the listing for `module`'s context, or for every context
pub fn model_listings(config: &Config, module: Option<TaskKind>) -> Vec<ContextListing> {
    let contexts: Vec<ModelContext> = match module {
        Some(task) => vec![task.model_context()],
        None => ModelContext::ALL.to_vec(),
    };

    contexts
        .into_iter()
        .map(|context| ContextListing {
            context,
            modules: TaskKind::ALL
                .into_iter()
                .filter(|t| t.model_context() == context)
                .collect(),
            default: config.session.default_model.clone(),
            models: available_models(context).to_vec(),
        })
        .collect()
}

/// List the selectable models
///
/// # Arguments
///
/// * `config` - Configuration holding the default model
/// * `module` - Optional module filter; if None, every context is listed
/// * `json` - Print JSON instead of a table
///
/// # Errors
///
/// Returns `StudioError::Serialization` if JSON output fails
///
/// # Examples
///
/// ```no_run
/// use studiochat::config::Config;
/// use studiochat::commands::models::list_models;
///
/// list_models(&Config::default(), None, false).unwrap();
/// ```
pub fn list_models(config: &Config, module: Option<TaskKind>, json: bool) -> Result<()> {
    let listings = model_listings(config, module);
    tracing::debug!(?module, json, "Listing models");

    if json {
        let output = serde_json::to_string_pretty(&listings).map_err(StudioError::Serialization)?;
        println!("{}", output);
        return Ok(());
    }

    for listing in &listings {
        let modules = listing
            .modules
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("\nModels for the {} context ({}):\n", listing.context, modules);
        print_models_table(&listing.models, &listing.default);
    }
    println!();

    Ok(())
}

/// Print `models` as a table, marking `selected`
pub fn print_models_table(models: &[ModelEntry], selected: &str) {
    let mut table = Table::new();
    table.add_row(row!["Model ID", "Name", "Selected"]);

    for model in models {
        let mark = if model.id == selected { "*" } else { "" };
        table.add_row(row![model.id, model.name, mark]);
    }

    table.printstd();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listings_cover_every_context() {
        let listings = model_listings(&Config::default(), None);
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].context, ModelContext::General);
        assert_eq!(
            listings[0].modules,
            vec![TaskKind::Planning, TaskKind::Development]
        );
        assert_eq!(listings[1].modules, vec![TaskKind::Assets]);
    }

    #[test]
    fn test_listing_filtered_by_module() {
        let listings = model_listings(&Config::default(), Some(TaskKind::Assets));
        assert_eq!(listings.len(), 1);
        let ids: Vec<&str> = listings[0].models.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["qwen", "lightai", "gemini"]);
    }

    #[test]
    fn test_listing_json_shape() {
        let listings = model_listings(&Config::default(), Some(TaskKind::Planning));
        let value = serde_json::to_value(&listings).unwrap();
        assert_eq!(value[0]["context"], "general");
        assert_eq!(value[0]["default"], "qwen");
        assert_eq!(value[0]["models"][1]["id"], "hunyuan");
        assert_eq!(value[0]["modules"][1], "development");
    }

    #[test]
    fn test_list_models_returns_ok() {
        assert!(list_models(&Config::default(), None, true).is_ok());
        assert!(list_models(&Config::default(), Some(TaskKind::Development), false).is_ok());
    }
}
