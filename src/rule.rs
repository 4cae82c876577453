use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Stable discriminator of a rule variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Percentage,
    UserId,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Percentage => "percentage",
            RuleKind::UserId => "user_id",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capabilities every targeting rule variant provides.
///
/// A new variant is a new type implementing this trait plus an arm in
/// [`Evaluator`]; validation never lives outside the variant itself.
pub trait RuleEvaluator {
    fn kind(&self) -> RuleKind;
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Percentage rollout. Valid for `0..=100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentageRule {
    pub percentage: i32,
}

impl RuleEvaluator for PercentageRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Percentage
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if !(0..=100).contains(&self.percentage) {
            return Err(ValidationError::PercentageOutOfRange(self.percentage));
        }
        Ok(())
    }
}

/// Explicit allowlist of user ids. The ids themselves are opaque here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserIdRule {
    pub user_ids: Vec<String>,
}

impl RuleEvaluator for UserIdRule {
    fn kind(&self) -> RuleKind {
        RuleKind::UserId
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.user_ids.is_empty() {
            return Err(ValidationError::EmptyUserIds);
        }
        Ok(())
    }
}

/// The closed set of rule variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Evaluator {
    Percentage(PercentageRule),
    UserId(UserIdRule),
}

impl Evaluator {
    fn inner(&self) -> &dyn RuleEvaluator {
        match self {
            Evaluator::Percentage(rule) => rule,
            Evaluator::UserId(rule) => rule,
        }
    }
}

impl RuleEvaluator for Evaluator {
    fn kind(&self) -> RuleKind {
        self.inner().kind()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.inner().validate()
    }
}

impl From<PercentageRule> for Evaluator {
    fn from(rule: PercentageRule) -> Self {
        Evaluator::Percentage(rule)
    }
}

impl From<UserIdRule> for Evaluator {
    fn from(rule: UserIdRule) -> Self {
        Evaluator::UserId(rule)
    }
}

/// A single targeting rule attached to a flag.
///
/// The evaluator is optional so that a rule decoded from an incomplete source
/// can still be represented; such a rule never validates.
///
/// The JSON form is the evaluator itself, tagged by kind. Reading it always
/// requires a known `type` and a well-formed payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Rule {
    #[serde(flatten)]
    pub evaluator: Option<Evaluator>,
}

impl<'de> Deserialize<'de> for Rule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Evaluator::deserialize(deserializer).map(Rule::new)
    }
}

impl Rule {
    pub fn new(evaluator: impl Into<Evaluator>) -> Self {
        Self {
            evaluator: Some(evaluator.into()),
        }
    }

    pub fn percentage(percentage: i32) -> Self {
        Self::new(PercentageRule { percentage })
    }

    pub fn user_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(UserIdRule {
            user_ids: ids.into_iter().map(Into::into).collect(),
        })
    }

    /// Kind of the held evaluator, if any.
    pub fn kind(&self) -> Option<RuleKind> {
        self.evaluator.as_ref().map(RuleEvaluator::kind)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.evaluator {
            Some(evaluator) => evaluator.validate(),
            None => Err(ValidationError::MissingEvaluator),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_bounds() {
        for ok in [0, 1, 50, 99, 100] {
            assert_eq!(PercentageRule { percentage: ok }.validate(), Ok(()));
        }
        assert_eq!(
            PercentageRule { percentage: -1 }.validate(),
            Err(ValidationError::PercentageOutOfRange(-1))
        );
        assert_eq!(
            PercentageRule { percentage: 101 }.validate(),
            Err(ValidationError::PercentageOutOfRange(101))
        );
        assert!(PercentageRule { percentage: i32::MIN }.validate().is_err());
        assert!(PercentageRule { percentage: i32::MAX }.validate().is_err());
    }

    #[test]
    fn user_ids_must_not_be_empty() {
        assert_eq!(
            UserIdRule::default().validate(),
            Err(ValidationError::EmptyUserIds)
        );
        let rule = UserIdRule {
            user_ids: vec!["user1".into(), "user2".into()],
        };
        assert_eq!(rule.validate(), Ok(()));

        // contents are not checked at this layer
        let rule = UserIdRule {
            user_ids: vec![String::new()],
        };
        assert_eq!(rule.validate(), Ok(()));
    }

    #[test]
    fn kinds() {
        assert_eq!(PercentageRule { percentage: 50 }.kind(), RuleKind::Percentage);
        assert_eq!(UserIdRule::default().kind(), RuleKind::UserId);
        assert_eq!(RuleKind::Percentage.to_string(), "percentage");
        assert_eq!(RuleKind::UserId.to_string(), "user_id");
        assert_eq!(Rule::percentage(5).kind(), Some(RuleKind::Percentage));
        assert_eq!(Rule::user_ids(["a"]).kind(), Some(RuleKind::UserId));
        assert_eq!(Rule::default().kind(), None);
    }

    #[test]
    fn rule_delegates_to_evaluator() {
        assert_eq!(Rule::percentage(50).validate(), Ok(()));
        assert_eq!(Rule::user_ids(["user1"]).validate(), Ok(()));
        assert_eq!(
            Rule::percentage(150).validate(),
            Err(ValidationError::PercentageOutOfRange(150))
        );
        assert_eq!(
            Rule::user_ids(Vec::<String>::new()).validate(),
            Err(ValidationError::EmptyUserIds)
        );
    }

    #[test]
    fn rule_without_evaluator_is_invalid() {
        assert_eq!(
            Rule { evaluator: None }.validate(),
            Err(ValidationError::MissingEvaluator)
        );
    }
}
