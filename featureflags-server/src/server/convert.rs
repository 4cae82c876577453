//! Translation between the wire schema and the domain model.
//!
//! Both directions enumerate the known rule variants and fail on anything
//! else rather than dropping a rule.

use featureflags::{Evaluator, FeatureFlag, PercentageRule, Rule, UserIdRule};
use thiserror::Error;

use super::proto;
use super::proto::rule::Rule as WireRule;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("unknown rule type")]
    UnknownRuleType,

    #[error("rule evaluator cannot be absent")]
    MissingEvaluator,
}

impl TryFrom<proto::Rule> for Rule {
    type Error = ConvertError;

    fn try_from(rule: proto::Rule) -> Result<Self, Self::Error> {
        let evaluator = match rule.rule.ok_or(ConvertError::UnknownRuleType)? {
            WireRule::Percentage(p) => Evaluator::Percentage(PercentageRule {
                percentage: p.percentage,
            }),
            WireRule::UserId(u) => Evaluator::UserId(UserIdRule {
                user_ids: u.user_ids,
            }),
        };
        Ok(Rule::new(evaluator))
    }
}

impl TryFrom<proto::FeatureFlag> for FeatureFlag {
    type Error = ConvertError;

    fn try_from(flag: proto::FeatureFlag) -> Result<Self, Self::Error> {
        let rules = flag
            .rules
            .into_iter()
            .map(Rule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FeatureFlag {
            key: flag.key,
            enabled: flag.enabled,
            rules,
            version: flag.version,
        })
    }
}

impl TryFrom<&Rule> for proto::Rule {
    type Error = ConvertError;

    fn try_from(rule: &Rule) -> Result<Self, Self::Error> {
        let wire = match rule.evaluator.as_ref().ok_or(ConvertError::MissingEvaluator)? {
            Evaluator::Percentage(p) => WireRule::Percentage(proto::PercentageRule {
                percentage: p.percentage,
            }),
            Evaluator::UserId(u) => WireRule::UserId(proto::UserIdRule {
                user_ids: u.user_ids.clone(),
            }),
        };
        Ok(proto::Rule { rule: Some(wire) })
    }
}

impl TryFrom<&FeatureFlag> for proto::FeatureFlag {
    type Error = ConvertError;

    fn try_from(flag: &FeatureFlag) -> Result<Self, Self::Error> {
        let rules = flag
            .rules
            .iter()
            .map(proto::Rule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(proto::FeatureFlag {
            key: flag.key.clone(),
            enabled: flag.enabled,
            rules,
            version: flag.version,
        })
    }
}
