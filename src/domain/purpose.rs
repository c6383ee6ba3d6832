use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{chain::AddressRules, validation::ValidationError};

/// What a stake deposit is for. Each purpose carries its own holder rule and
/// minimum stake.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Purpose {
    #[strum(to_string = "validator", serialize = "stake_for_validator")]
    StakeForValidator,
    #[strum(to_string = "guardian", serialize = "stake_for_guardian")]
    StakeForGuardian,
}

/// Guardian node supplied from outside the form. Its summary replaces the
/// holder input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianNodeDelegate {
    pub node_summary: String,
}

impl Purpose {
    /// Check a holder against this purpose's rule.
    ///
    /// Validator stakes check the typed holder as an address. Guardian stakes
    /// check the holder summary, which may come from a delegate.
    pub fn holder_is_valid(&self, rules: &dyn AddressRules, holder: &str, summary: &str) -> bool {
        match self {
            Purpose::StakeForValidator => rules.is_address(holder),
            Purpose::StakeForGuardian => rules.is_holder_summary(summary),
        }
    }

    pub fn holder_error(&self) -> ValidationError {
        match self {
            Purpose::StakeForValidator => ValidationError::InvalidHolderAddress,
            Purpose::StakeForGuardian => ValidationError::InvalidHolderSummary,
        }
    }

    pub fn holder_title(&self) -> &'static str {
        match self {
            Purpose::StakeForValidator => "Validator Node Holder (Address)",
            Purpose::StakeForGuardian => "Guardian Node Holder (Summary)",
        }
    }

    pub fn holder_placeholder(&self) -> &'static str {
        match self {
            Purpose::StakeForValidator => "Enter validator node address",
            Purpose::StakeForGuardian => "Enter guardian node summary",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    struct Rules;

    impl AddressRules for Rules {
        fn is_address(&self, text: &str) -> bool {
            text == "addr"
        }

        fn is_holder_summary(&self, text: &str) -> bool {
            text == "summary"
        }
    }

    #[test]
    fn test_purpose_from_cli_names() {
        assert_eq!(Purpose::from_str("validator").unwrap(), Purpose::StakeForValidator);
        assert_eq!(Purpose::from_str("guardian").unwrap(), Purpose::StakeForGuardian);
        assert_eq!(
            Purpose::from_str("stake_for_guardian").unwrap(),
            Purpose::StakeForGuardian
        );
    }

    #[test]
    fn test_holder_rule_per_purpose() {
        let validator = Purpose::StakeForValidator;
        assert!(validator.holder_is_valid(&Rules, "addr", "summary-ignored"));
        assert!(!validator.holder_is_valid(&Rules, "summary", "summary"));

        let guardian = Purpose::StakeForGuardian;
        assert!(guardian.holder_is_valid(&Rules, "", "summary"));
        assert!(!guardian.holder_is_valid(&Rules, "addr", "addr"));
    }
}
