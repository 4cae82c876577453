//! Feature flag definitions and their validation.
//!
//! A [`FeatureFlag`] carries a key, an on/off toggle, an ordered list of
//! targeting [`Rule`]s and a caller-supplied version. Each rule holds one
//! [`Evaluator`] variant; every variant reports its [`RuleKind`] and
//! validates itself through the [`RuleEvaluator`] trait.
//!
//! ```
//! use featureflags::{FeatureFlag, Rule};
//!
//! let flag = FeatureFlag::new("checkout-v2")
//!     .with_enabled(true)
//!     .with_rule(Rule::percentage(25))
//!     .with_version(1);
//! assert!(flag.validate().is_ok());
//!
//! let bad = FeatureFlag::new("x").with_rule(Rule::percentage(150));
//! assert!(bad.validate().is_err());
//! ```

pub mod error;
pub mod flag;
pub mod rule;

pub use error::ValidationError;
pub use flag::FeatureFlag;
pub use rule::{Evaluator, PercentageRule, Rule, RuleEvaluator, RuleKind, UserIdRule};
