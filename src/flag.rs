use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::rule::Rule;

/// A feature flag definition.
///
/// `version` is supplied by the caller and kept as-is; nothing in this crate
/// increments or compares it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureFlag {
    pub key: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub version: i64,
}

impl FeatureFlag {
    /// A disabled flag with no rules at version 0.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    /// Checks the key and then every rule in order, returning the first failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key.is_empty() {
            return Err(ValidationError::EmptyKey);
        }
        self.rules.iter().try_for_each(Rule::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_flag() {
        let flag = FeatureFlag::new("test-feature")
            .with_enabled(true)
            .with_rule(Rule::percentage(50))
            .with_version(1);
        assert_eq!(flag.validate(), Ok(()));
    }

    #[test]
    fn empty_key() {
        let flag = FeatureFlag::new("").with_enabled(true).with_version(1);
        assert_eq!(flag.validate(), Err(ValidationError::EmptyKey));
    }

    #[test]
    fn empty_key_reported_before_rules() {
        let flag = FeatureFlag::new("").with_rule(Rule::percentage(150));
        assert_eq!(flag.validate(), Err(ValidationError::EmptyKey));
    }

    #[test]
    fn no_rules_is_valid() {
        assert_eq!(FeatureFlag::new("test").validate(), Ok(()));
    }

    #[test]
    fn first_invalid_rule_wins() {
        let flag = FeatureFlag::new("test")
            .with_rule(Rule::percentage(10))
            .with_rule(Rule::user_ids(Vec::<String>::new()))
            .with_rule(Rule::percentage(150));
        assert_eq!(flag.validate(), Err(ValidationError::EmptyUserIds));
    }
}
