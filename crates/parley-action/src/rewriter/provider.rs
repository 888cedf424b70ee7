//! Rewriter configuration provider.
//!
//! Builds the ordered rewriter set for a language/service pair from named
//! rewrite tables.

use std::collections::BTreeMap;
use std::sync::Arc;

use parley_core::config::{RewriteRuleConfig, RewritesConfig};
use parley_core::types::ServiceRef;

use crate::rewriter::table::{TableRewriter, LAUNCH_COMMAND};
use crate::rewriter::Rewriter;

/// Supplies rewriters whenever the active language/service pair changes.
pub trait RewriterProvider: Send + Sync {
    /// Rewriters for the requested tables, in request order.
    fn rewriters(
        &self,
        language: &str,
        service: &ServiceRef,
        tables: &[String],
    ) -> Vec<Arc<dyn Rewriter>>;
}

/// Provider backed by table definitions from `ParleyConfig`.
pub struct ConfiguredRewriterProvider {
    definitions: BTreeMap<String, Vec<RewriteRuleConfig>>,
}

impl ConfiguredRewriterProvider {
    /// Use the configured definitions, or the built-in tables when none are
    /// configured.
    pub fn new(config: &RewritesConfig) -> Self {
        if config.definitions.is_empty() {
            return Self::builtin();
        }
        Self {
            definitions: config.definitions.clone(),
        }
    }

    /// Provider with the built-in `Base` and `Commands` tables.
    pub fn builtin() -> Self {
        Self {
            definitions: builtin_definitions(),
        }
    }

    /// Names of the tables this provider knows about.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }
}

impl RewriterProvider for ConfiguredRewriterProvider {
    fn rewriters(
        &self,
        language: &str,
        service: &ServiceRef,
        tables: &[String],
    ) -> Vec<Arc<dyn Rewriter>> {
        let mut rewriters: Vec<Arc<dyn Rewriter>> = Vec::with_capacity(tables.len());
        for name in tables {
            let Some(rows) = self.definitions.get(name) else {
                tracing::debug!(table = %name, "Rewrite table not defined, skipping");
                continue;
            };
            let rewriter = TableRewriter::from_config(name.clone(), rows, language, service.clone());
            tracing::debug!(
                table = %name,
                language = %language,
                service = %service,
                rules = rewriter.len(),
                "Built rewriter"
            );
            rewriters.push(Arc::new(rewriter));
        }
        rewriters
    }
}

fn replace(utterance: &str, replacement: &str) -> RewriteRuleConfig {
    RewriteRuleConfig {
        utterance: utterance.to_string(),
        replacement: replacement.to_string(),
        command: None,
        args: vec![],
        locale: None,
        service: None,
    }
}

fn launch(utterance: &str, template: &str) -> RewriteRuleConfig {
    RewriteRuleConfig {
        command: Some(LAUNCH_COMMAND.to_string()),
        args: vec![template.to_string()],
        ..replace(utterance, "")
    }
}

/// Built-in tables used when the configuration defines none.
pub fn builtin_definitions() -> BTreeMap<String, Vec<RewriteRuleConfig>> {
    let base = vec![replace(r"^\s+|\s+$", ""), replace(r"\s+", " ")];

    let commands = vec![
        launch(
            r"(?i)^open (https?://\S+)$",
            r#"{"action": "android.intent.action.VIEW", "data": "$1"}"#,
        ),
        launch(
            r"(?i)^remind me to (.+)$",
            r#"{"action": "parley.action.NOTIFY", "extras": {"message": "$1"}}"#,
        ),
        launch(
            r"(?i)^set an alarm for (\d{1,2}):(\d{2})$",
            r#"{"action": "android.intent.action.SET_ALARM", "extras": {"hour": "$1", "minutes": "$2"}}"#,
        ),
    ];

    BTreeMap::from([
        ("Base".to_string(), base),
        ("Commands".to_string(), commands),
    ])
}
