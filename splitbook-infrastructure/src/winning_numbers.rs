use splitbook_application::{FeedError, WinningNumbersFeed};
use splitbook_domain::{InvoicePeriod, NumberSource, WinningNumbers};
use std::{collections::HashMap, fs, path::Path};

#[derive(Debug, thiserror::Error)]
pub enum WinningNumbersLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("winning numbers are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{period}: '{number}' is not a {expected}-digit number")]
    InvalidNumber {
        period: InvoicePeriod,
        number: String,
        expected: usize,
    },
    #[error("{0} is listed more than once")]
    DuplicatePeriod(InvoicePeriod),
}

/// Published draws read from a JSON array of `WinningNumbers`.
#[derive(Debug, Clone, Default)]
pub struct JsonWinningNumbersFeed {
    draws: HashMap<InvoicePeriod, WinningNumbers>,
}

impl JsonWinningNumbersFeed {
    pub fn from_draws(
        draws: impl IntoIterator<Item = WinningNumbers>,
    ) -> Result<Self, WinningNumbersLoadError> {
        let mut by_period = HashMap::new();
        for draw in draws {
            validate(&draw)?;
            let period = draw.period;
            if by_period.insert(period, draw).is_some() {
                return Err(WinningNumbersLoadError::DuplicatePeriod(period));
            }
        }
        Ok(Self { draws: by_period })
    }

    pub fn from_json(json: &str) -> Result<Self, WinningNumbersLoadError> {
        let draws: Vec<WinningNumbers> = serde_json::from_str(json)?;
        Self::from_draws(draws)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, WinningNumbersLoadError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| WinningNumbersLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let feed = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            periods = feed.draws.len(),
            "Winning numbers loaded"
        );
        Ok(feed)
    }

    pub fn periods(&self) -> Vec<InvoicePeriod> {
        let mut periods: Vec<InvoicePeriod> = self.draws.keys().copied().collect();
        periods.sort_unstable();
        periods
    }
}

impl WinningNumbersFeed for JsonWinningNumbersFeed {
    fn winning_numbers(
        &self,
        period: InvoicePeriod,
    ) -> Result<Option<WinningNumbers>, FeedError> {
        Ok(self.draws.get(&period).cloned())
    }
}

fn validate(draw: &WinningNumbers) -> Result<(), WinningNumbersLoadError> {
    let sources = [
        (NumberSource::Special, 8),
        (NumberSource::Grand, 8),
        (NumberSource::First, 8),
        (NumberSource::AdditionalSixth, 3),
    ];
    for (source, expected) in sources {
        for number in draw.numbers(source) {
            let number = number.trim();
            if number.len() != expected || !number.bytes().all(|b| b.is_ascii_digit()) {
                return Err(WinningNumbersLoadError::InvalidNumber {
                    period: draw.period,
                    number: number.to_string(),
                    expected,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const DRAWS: &str = r#"[
        {
            "period": { "year": 2025, "first_month": 3 },
            "special_prize": "87654321",
            "grand_prize": "12345678",
            "first_prizes": ["11112222", "33334444", "55556666"],
            "additional_sixth_prizes": ["909"]
        },
        {
            "period": { "year": 2025, "first_month": 1 },
            "grand_prize": "00001111"
        }
    ]"#;

    fn period(first_month: u32) -> InvoicePeriod {
        InvoicePeriod::new(2025, first_month).expect("odd month")
    }

    #[test]
    fn serves_published_periods() {
        let feed = JsonWinningNumbersFeed::from_json(DRAWS).expect("valid draws");

        assert_eq!(feed.periods(), vec![period(1), period(3)]);
        let march = feed
            .winning_numbers(period(3))
            .expect("feed")
            .expect("published");
        assert_eq!(march.first_prizes.len(), 3);
        assert_eq!(feed.winning_numbers(period(5)), Ok(None));
    }

    #[rstest]
    #[case::short_grand(r#"[{"period": {"year": 2025, "first_month": 1}, "grand_prize": "1234"}]"#)]
    #[case::letters(r#"[{"period": {"year": 2025, "first_month": 1}, "first_prizes": ["1234567A"]}]"#)]
    #[case::long_sixth(r#"[{"period": {"year": 2025, "first_month": 1}, "additional_sixth_prizes": ["0909"]}]"#)]
    fn rejects_malformed_numbers(#[case] json: &str) {
        assert!(matches!(
            JsonWinningNumbersFeed::from_json(json),
            Err(WinningNumbersLoadError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_periods() {
        let json = r#"[
            {"period": {"year": 2025, "first_month": 1}},
            {"period": {"year": 2025, "first_month": 1}}
        ]"#;
        assert!(matches!(
            JsonWinningNumbersFeed::from_json(json),
            Err(WinningNumbersLoadError::DuplicatePeriod(_))
        ));
    }
}
