//! engine::rule_index
//!
//! Which compilation rule governs which object.
//!
//! The pipeline's rule set is a sequence of (pattern, rule definition)
//! pairs; the first pattern matching an identifier wins. The engine only
//! needs the definition's source text: `RulesModified` checksums it to
//! detect that an object's rule changed between runs.

use crate::core::pattern::Pattern;
use crate::core::types::Identifier;

/// An ordered pattern-to-rule-definition mapping.
///
/// # Example
///
/// ```
/// use stonework::engine::rule_index::RuleIndex;
/// use stonework::core::pattern::Pattern;
/// use stonework::core::types::Identifier;
///
/// let index = RuleIndex::new()
///     .with_rule(Pattern::from_glob("/**/*.md").unwrap(), "filter :markdown")
///     .with_rule(Pattern::from_glob("/**/*").unwrap(), "passthrough");
///
/// let id = Identifier::new("/about.md").unwrap();
/// assert_eq!(index.rule_for(&id), Some("filter :markdown"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleIndex {
    rules: Vec<(Pattern, String)>,
}

impl RuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule; earlier rules take precedence.
    pub fn with_rule(mut self, pattern: Pattern, definition: impl Into<String>) -> Self {
        self.rules.push((pattern, definition.into()));
        self
    }

    /// The definition of the first rule whose pattern matches.
    pub fn rule_for(&self, identifier: &Identifier) -> Option<&str> {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.matches(identifier))
            .map(|(_, definition)| definition.as_str())
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the index holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
