//! Regex rule-table rewriters.
//!
//! Each table row pairs an utterance pattern with either a text replacement
//! or a command. Rows tagged with the `activity` command carry an encoded
//! action template in their first argument; capture references (`$1`,
//! `${name}`) are expanded from the utterance match.

use std::borrow::Cow;

use parley_core::config::RewriteRuleConfig;
use parley_core::types::ServiceRef;
use regex::Regex;

use crate::error::ActionError;
use crate::rewriter::{EncodedAction, Rewriter};

/// Command id for rules that launch an action.
pub const LAUNCH_COMMAND: &str = "activity";

/// A single compiled table row.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
    command: Option<String>,
    args: Vec<String>,
    locale: Option<Regex>,
    service: Option<Regex>,
}

impl RewriteRule {
    /// Compile a rule from its configuration row.
    pub fn from_config(row: &RewriteRuleConfig) -> Result<Self, ActionError> {
        Ok(Self {
            pattern: compile(&row.utterance)?,
            replacement: row.replacement.clone(),
            command: row.command.clone(),
            args: row.args.clone(),
            locale: row.locale.as_deref().map(compile).transpose()?,
            service: row.service.as_deref().map(compile).transpose()?,
        })
    }

    /// Whether the rule's locale and service filters accept this pair.
    pub fn applies_to(&self, language: &str, service: &ServiceRef) -> bool {
        self.locale.as_ref().map_or(true, |re| re.is_match(language))
            && self
                .service
                .as_ref()
                .map_or(true, |re| re.is_match(service.as_str()))
    }

    pub fn is_launch(&self) -> bool {
        self.command.as_deref() == Some(LAUNCH_COMMAND)
    }

    /// Expand the action template against the utterance, if it matches.
    fn encode(&self, utterance: &str) -> Option<String> {
        let caps = self.pattern.captures(utterance)?;
        let template = self.args.first().map(String::as_str).unwrap_or("");
        let mut encoded = String::new();
        caps.expand(template, &mut encoded);
        Some(encoded)
    }
}

fn compile(pattern: &str) -> Result<Regex, ActionError> {
    Regex::new(pattern).map_err(|e| ActionError::InvalidRule {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Rewriter backed by one rule table, specialised to a language/service pair.
pub struct TableRewriter {
    id: String,
    language: String,
    service: ServiceRef,
    rules: Vec<RewriteRule>,
}

impl TableRewriter {
    /// Build a rewriter, keeping only the rules whose filters accept
    /// `language` and `service`.
    pub fn new(
        id: impl Into<String>,
        language: impl Into<String>,
        service: ServiceRef,
        rules: Vec<RewriteRule>,
    ) -> Self {
        let language = language.into();
        let rules = rules
            .into_iter()
            .filter(|r| r.applies_to(&language, &service))
            .collect();
        Self {
            id: id.into(),
            language,
            service,
            rules,
        }
    }

    /// Build a rewriter from configuration rows. Rows that fail to compile
    /// are skipped with a warning.
    pub fn from_config(
        id: impl Into<String>,
        rows: &[RewriteRuleConfig],
        language: impl Into<String>,
        service: ServiceRef,
    ) -> Self {
        let id = id.into();
        let mut rules = Vec::with_capacity(rows.len());
        for row in rows {
            match RewriteRule::from_config(row) {
                Ok(rule) => rules.push(rule),
                Err(e) => tracing::warn!(table = %id, error = %e, "Skipping rewrite rule"),
            }
        }
        Self::new(id, language, service, rules)
    }

    /// Number of rules active for this language/service pair.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Rewriter for TableRewriter {
    fn id(&self) -> &str {
        &self.id
    }

    fn language(&self) -> &str {
        &self.language
    }

    fn service(&self) -> &ServiceRef {
        &self.service
    }

    fn apply(&self, utterance: &str) -> Option<EncodedAction> {
        self.rules
            .iter()
            .filter(|r| r.is_launch())
            .find_map(|r| r.encode(utterance))
            .map(|payload| EncodedAction {
                rewriter_id: self.id.clone(),
                payload,
            })
    }

    fn rewrite<'a>(&self, utterance: &'a str) -> Cow<'a, str> {
        let mut text = Cow::Borrowed(utterance);
        for rule in self.rules.iter().filter(|r| r.command.is_none()) {
            let replaced = match rule.pattern.replace_all(&text, rule.replacement.as_str()) {
                Cow::Owned(s) => Some(s),
                Cow::Borrowed(_) => None,
            };
            if let Some(s) = replaced {
                text = Cow::Owned(s);
            }
        }
        text
    }
}
