use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Decimal-separator convention inferred while normalizing an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparatorConvention {
    /// No separator carried decimal meaning (blank, integer, grouping only).
    Plain,
    /// European style: comma is the decimal separator ("7.157,16").
    DecimalComma,
    /// US style: period is the decimal separator ("1,234.56").
    DecimalPoint,
}

/// A parsed amount plus the convention that produced it. Normalization is a
/// pure function of the input string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAmount {
    pub value: BigDecimal,
    pub convention: SeparatorConvention,
}

impl NormalizedAmount {
    fn zero() -> Self {
        Self {
            value: BigDecimal::zero(),
            convention: SeparatorConvention::Plain,
        }
    }
}

/// Approval tolerance: amounts agree when they differ by less than one cent.
pub fn approval_tolerance() -> BigDecimal {
    BigDecimal::new(1.into(), 2)
}

/// Report flagging threshold: a difference of 0.005 or more is surfaced as a
/// per-item mismatch even when it still clears the approval tolerance.
pub fn report_tolerance() -> BigDecimal {
    BigDecimal::new(5.into(), 3)
}

pub fn amounts_match(a: &BigDecimal, b: &BigDecimal) -> bool {
    (a - b).abs() < approval_tolerance()
}

pub fn flagged_mismatch(a: &BigDecimal, b: &BigDecimal) -> bool {
    (a - b).abs() >= report_tolerance()
}

/// Parses a human-written amount ("USD 7.157,16", "$941.17", "129,00",
/// "15.00-") into a decimal. Blank or non-numeric input yields zero, never
/// an error: callers cannot tell "no charge found" from "zero charge".
pub fn normalize_amount(raw: &str) -> NormalizedAmount {
    // Currency markers, unit text and whitespace all drop out here; only
    // digits and the two candidate separators survive.
    let negative = raw.trim_end().ends_with('-');
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    if cleaned.is_empty() {
        return NormalizedAmount::zero();
    }

    let (canonical, convention) = resolve_separators(&cleaned);

    let value = match BigDecimal::from_str(&canonical) {
        Ok(v) => {
            if negative {
                -v
            } else {
                v
            }
        }
        Err(_) => {
            tracing::warn!(raw, %canonical, "amount did not parse, degrading to zero");
            return NormalizedAmount::zero();
        }
    };

    NormalizedAmount { value, convention }
}

/// Rewrites the digits-and-separators string into canonical `1234.56` form.
///
/// When both separators occur, the rightmost one is the decimal separator.
/// A lone comma is decimal only when it is the single comma and at most two
/// digits follow it; the same rule applies to a lone period. Everything else
/// is grouping and is removed.
fn resolve_separators(cleaned: &str) -> (String, SeparatorConvention) {
    let last_comma = cleaned.rfind(',');
    let last_period = cleaned.rfind('.');

    match (last_comma, last_period) {
        (Some(comma), Some(period)) => {
            if comma > period {
                let canonical = cleaned.replace('.', "").replace(',', ".");
                (canonical, SeparatorConvention::DecimalComma)
            } else {
                (cleaned.replace(',', ""), SeparatorConvention::DecimalPoint)
            }
        }
        (Some(comma), None) => {
            let trailing = cleaned.len() - comma - 1;
            if cleaned.matches(',').count() == 1 && trailing <= 2 {
                (cleaned.replace(',', "."), SeparatorConvention::DecimalComma)
            } else {
                (cleaned.replace(',', ""), SeparatorConvention::Plain)
            }
        }
        (None, Some(period)) => {
            let trailing = cleaned.len() - period - 1;
            if cleaned.matches('.').count() == 1 && trailing <= 2 {
                (cleaned.to_string(), SeparatorConvention::DecimalPoint)
            } else {
                (cleaned.replace('.', ""), SeparatorConvention::Plain)
            }
        }
        (None, None) => (cleaned.to_string(), SeparatorConvention::Plain),
    }
}

/// Extracts the quantity as the first contiguous run of digits; unit
/// suffixes like "EA" or "PCS" are ignored. Non-numeric input yields zero.
pub fn normalize_quantity(raw: &str) -> i64 {
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn canonical_decimal_round_trips_regardless_of_currency_prefix() {
        for raw in ["383.04", "USD 383.04", "USD383.04", "$383.04"] {
            assert_eq!(normalize_amount(raw).value, dec("383.04"), "raw: {raw}");
        }
    }

    #[test]
    fn european_format_with_both_separators() {
        let n = normalize_amount("USD 7.157,16");
        assert_eq!(n.value, dec("7157.16"));
        assert_eq!(n.convention, SeparatorConvention::DecimalComma);
    }

    #[test]
    fn us_format_with_both_separators() {
        let n = normalize_amount("USD 1,234.56");
        assert_eq!(n.value, dec("1234.56"));
        assert_eq!(n.convention, SeparatorConvention::DecimalPoint);
    }

    #[test]
    fn lone_comma_with_two_trailing_digits_is_decimal() {
        assert_eq!(normalize_amount("USD 129,00").value, dec("129.00"));
        assert_eq!(normalize_amount("USD 15,57").value, dec("15.57"));
    }

    #[test]
    fn lone_comma_with_three_trailing_digits_is_grouping() {
        assert_eq!(normalize_amount("1,234").value, dec("1234"));
    }

    #[test]
    fn lone_period_with_three_trailing_digits_is_grouping() {
        assert_eq!(normalize_amount("7.157").value, dec("7157"));
    }

    #[test]
    fn blank_and_non_numeric_degrade_to_zero() {
        assert_eq!(normalize_amount("").value, BigDecimal::zero());
        assert_eq!(normalize_amount("n/a").value, BigDecimal::zero());
        assert_eq!(normalize_amount("   ").value, BigDecimal::zero());
    }

    #[test]
    fn trailing_dash_marks_a_discount() {
        assert_eq!(normalize_amount("15.00-").value, dec("-15.00"));
        assert_eq!(normalize_amount("USD 129,00-").value, dec("-129.00"));
    }

    #[test]
    fn quantity_takes_first_digit_run_and_ignores_units() {
        assert_eq!(normalize_quantity("1 EA"), 1);
        assert_eq!(normalize_quantity("12 PCS"), 12);
        assert_eq!(normalize_quantity("EA"), 0);
        assert_eq!(normalize_quantity(""), 0);
    }

    #[test]
    fn threshold_boundary_pair() {
        let a = dec("100.0000");
        let close = dec("100.0049");
        let near = dec("100.0060");

        // 0.0049 apart: clears both thresholds.
        assert!(amounts_match(&a, &close));
        assert!(!flagged_mismatch(&a, &close));

        // 0.006 apart: still approvable, but flagged for review.
        assert!(amounts_match(&a, &near));
        assert!(flagged_mismatch(&a, &near));
    }
}
