use splitbook_domain::{RoundingMode, SettlementContext};
use std::{env, path::PathBuf};

pub const CURRENCY_SCALE_VAR: &str = "SPLITBOOK_CURRENCY_SCALE";
pub const ROUNDING_VAR: &str = "SPLITBOOK_ROUNDING";
pub const WINNING_NUMBERS_VAR: &str = "SPLITBOOK_WINNING_NUMBERS";

const MAX_CURRENCY_SCALE: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number between 0 and {max}, got '{value}'")]
    InvalidScale {
        var: &'static str,
        value: String,
        max: u32,
    },
    #[error("{var} must be 'half-up' or 'half-even', got '{value}'")]
    InvalidRounding { var: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub settlement: SettlementContext,
    pub winning_numbers_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value_of = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let scale = match value_of(CURRENCY_SCALE_VAR) {
            None => 0,
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|scale| *scale <= MAX_CURRENCY_SCALE)
                .ok_or(ConfigError::InvalidScale {
                    var: CURRENCY_SCALE_VAR,
                    value,
                    max: MAX_CURRENCY_SCALE,
                })?,
        };

        let rounding_mode = match value_of(ROUNDING_VAR) {
            None => RoundingMode::default(),
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "half-up" | "half_up" => RoundingMode::HalfUp,
                "half-even" | "half_even" | "bankers" => RoundingMode::HalfEven,
                _ => {
                    return Err(ConfigError::InvalidRounding {
                        var: ROUNDING_VAR,
                        value,
                    });
                }
            },
        };

        let winning_numbers_path = value_of(WINNING_NUMBERS_VAR).map(PathBuf::from);

        Ok(Self {
            settlement: SettlementContext {
                scale,
                rounding_mode,
            },
            winning_numbers_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_whole_dollars_half_up() {
        assert_eq!(AppConfig::from_lookup(lookup(&[])), Ok(AppConfig::default()));
    }

    #[rstest]
    #[case::cents(&[(CURRENCY_SCALE_VAR, "2")], 2, RoundingMode::HalfUp)]
    #[case::bankers(&[(ROUNDING_VAR, "Half-Even")], 0, RoundingMode::HalfEven)]
    #[case::blank_means_default(&[(CURRENCY_SCALE_VAR, "  "), (ROUNDING_VAR, "")], 0, RoundingMode::HalfUp)]
    fn reads_settlement_context(
        #[case] vars: &[(&str, &str)],
        #[case] scale: u32,
        #[case] rounding_mode: RoundingMode,
    ) {
        let config = AppConfig::from_lookup(lookup(vars)).expect("valid config");
        assert_eq!(
            config.settlement,
            SettlementContext {
                scale,
                rounding_mode
            }
        );
    }

    #[rstest]
    #[case::negative_scale(CURRENCY_SCALE_VAR, "-1")]
    #[case::huge_scale(CURRENCY_SCALE_VAR, "9")]
    #[case::unknown_rounding(ROUNDING_VAR, "truncate")]
    fn rejects_bad_values(#[case] var: &str, #[case] value: &str) {
        assert!(AppConfig::from_lookup(lookup(&[(var, value)])).is_err());
    }

    #[test]
    fn reads_winning_numbers_path() {
        let config = AppConfig::from_lookup(lookup(&[(WINNING_NUMBERS_VAR, "draws.json")]))
            .expect("valid config");
        assert_eq!(config.winning_numbers_path, Some(PathBuf::from("draws.json")));
    }
}
