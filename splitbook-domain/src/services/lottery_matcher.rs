use crate::invoice::{InvoiceNumber, PrizeTable, PrizeTier, WinningNumbers};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrizeMatch {
    pub tier: PrizeTier,
    pub matched_number: String,
    pub suffix_len: usize,
}

/// Checks invoice numbers against one period's winning numbers using a
/// suffix-match rule table.
pub struct LotteryMatcher {
    table: PrizeTable,
}

impl LotteryMatcher {
    pub fn new(table: PrizeTable) -> Self {
        Self { table }
    }

    pub fn official() -> Self {
        Self::new(PrizeTable::official())
    }

    /// Highest tier whose rule matches; `None` when nothing matches.
    pub fn match_invoice(
        &self,
        invoice: &InvoiceNumber,
        winning: &WinningNumbers,
    ) -> Option<PrizeMatch> {
        let digits = invoice.digits();
        let mut best: Option<PrizeMatch> = None;

        for rule in &self.table.rules {
            if best.as_ref().is_some_and(|found| found.tier <= rule.tier) {
                continue;
            }
            let Some(invoice_suffix) = suffix(digits, rule.suffix_len) else {
                continue;
            };
            let hit = winning
                .numbers(rule.source)
                .iter()
                .map(|number| number.trim())
                .find(|number| suffix(number, rule.suffix_len) == Some(invoice_suffix));
            if let Some(number) = hit {
                best = Some(PrizeMatch {
                    tier: rule.tier,
                    matched_number: number.to_string(),
                    suffix_len: rule.suffix_len,
                });
            }
        }

        best
    }
}

impl Default for LotteryMatcher {
    fn default() -> Self {
        Self::official()
    }
}

fn suffix(number: &str, len: usize) -> Option<&str> {
    if len == 0 || number.len() < len || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.get(number.len() - len..)
}

/// Prize tier for `invoice` under the official rules.
pub fn match_lottery(invoice: &InvoiceNumber, winning: &WinningNumbers) -> Option<PrizeTier> {
    LotteryMatcher::official()
        .match_invoice(invoice, winning)
        .map(|found| found.tier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{InvoicePeriod, NumberSource, PrizeRule};
    use rstest::{fixture, rstest};

    #[fixture]
    fn winning() -> WinningNumbers {
        WinningNumbers::new(InvoicePeriod::new(2025, 3).expect("odd month"))
            .with_special_prize("87654321")
            .with_grand_prize("12345678")
            .with_first_prize("11112222")
            .with_first_prize("33334444")
            .with_first_prize("55556666")
            .with_additional_sixth_prize("909")
    }

    fn invoice(number: &str) -> InvoiceNumber {
        InvoiceNumber::parse(number).expect("valid invoice number")
    }

    #[rstest]
    #[case::special("AB87654321", Some(PrizeTier::Special))]
    #[case::grand("AB12345678", Some(PrizeTier::Grand))]
    #[case::first("XY33334444", Some(PrizeTier::First))]
    #[case::second("XY03334444", Some(PrizeTier::Second))]
    #[case::third("XY00334444", Some(PrizeTier::Third))]
    #[case::fourth("XY00034444", Some(PrizeTier::Fourth))]
    #[case::fifth("XY00004444", Some(PrizeTier::Fifth))]
    #[case::sixth("XY00000444", Some(PrizeTier::Sixth))]
    #[case::additional_sixth("XY00000909", Some(PrizeTier::Sixth))]
    #[case::grand_suffix_is_not_a_prize("XY00005678", None)]
    #[case::nothing("XY00000000", None)]
    fn matches_official_tiers(
        winning: WinningNumbers,
        #[case] number: &str,
        #[case] expected: Option<PrizeTier>,
    ) {
        assert_eq!(match_lottery(&invoice(number), &winning), expected);
    }

    #[test]
    fn grand_prize_alone_is_enough() {
        let winning = WinningNumbers::new(InvoicePeriod::new(2025, 1).expect("odd month"))
            .with_grand_prize("12345678");
        assert_eq!(
            match_lottery(&invoice("AB12345678"), &winning),
            Some(PrizeTier::Grand)
        );
    }

    #[rstest]
    fn reports_matched_number(winning: WinningNumbers) {
        let found = LotteryMatcher::official()
            .match_invoice(&invoice("XY99995666"), &winning)
            .expect("fourth prize");
        assert_eq!(found.tier, PrizeTier::Fourth);
        assert_eq!(found.matched_number, "55556666");
        assert_eq!(found.suffix_len, 5);
    }

    #[rstest]
    fn custom_table_is_honoured(winning: WinningNumbers) {
        let matcher = LotteryMatcher::new(PrizeTable {
            rules: vec![PrizeRule {
                tier: PrizeTier::Fifth,
                source: NumberSource::Grand,
                suffix_len: 4,
            }],
        });
        let found = matcher.match_invoice(&invoice("XY00005678"), &winning);
        assert_eq!(found.map(|m| m.tier), Some(PrizeTier::Fifth));
    }

    #[test]
    fn malformed_published_numbers_never_match() {
        let winning = WinningNumbers::new(InvoicePeriod::new(2025, 1).expect("odd month"))
            .with_first_prize("1234-678")
            .with_additional_sixth_prize("67");
        assert_eq!(match_lottery(&invoice("AB00000678"), &winning), None);
    }
}
