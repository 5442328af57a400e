use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Named business rule for the delivery-address override. The rule is data,
/// not code: it can be reconfigured without touching the date arithmetic.
/// Matching requires both the street pattern and the abbreviated street-type
/// marker to appear in the address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressOverride {
    pub name: String,
    pub street_pattern: String,
    pub street_marker: String,
}

impl Default for AddressOverride {
    fn default() -> Self {
        Self {
            name: "thursday-consolidation".to_string(),
            street_pattern: "12 Bet".to_string(),
            street_marker: "St.".to_string(),
        }
    }
}

impl AddressOverride {
    pub fn applies(&self, address: &str) -> bool {
        address.contains(&self.street_pattern) && address.contains(&self.street_marker)
    }
}

/// Converts an extracted delivery date into the date written back to the
/// order-management system. Pure function over valid calendar inputs.
///
/// Always subtract 6 calendar days first. Addresses matching the override
/// take Thursday of the ISO week (Monday start) of the subtracted date; for
/// everything else a Saturday result shifts back one day to Friday.
pub fn calculate_target_date(
    extracted: NaiveDate,
    delivery_address: &str,
    special_rule: &AddressOverride,
) -> NaiveDate {
    let shifted = extracted - Duration::days(6);

    if special_rule.applies(delivery_address) {
        let monday = shifted - Duration::days(shifted.weekday().num_days_from_monday() as i64);
        monday + Duration::days(3)
    } else if shifted.weekday() == Weekday::Sat {
        shifted - Duration::days(1)
    } else {
        shifted
    }
}

/// Parses the raw extracted delivery date, DD.MM.YYYY with DD/MM/YYYY
/// accepted as a fallback.
pub fn parse_extracted_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%d.%m.%Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
}

/// Raw-string front end for the calculator. A date that fails to parse is
/// reported as a calculation error and passed through with dots rewritten to
/// slashes, so a bad document field surfaces downstream instead of aborting
/// the run.
pub fn target_date_for_raw(
    raw: &str,
    delivery_address: &str,
    special_rule: &AddressOverride,
    output_format: &str,
) -> (String, Option<String>) {
    match parse_extracted_date(raw) {
        Ok(date) => {
            let target = calculate_target_date(date, delivery_address, special_rule);
            (target.format(output_format).to_string(), None)
        }
        Err(err) => {
            tracing::warn!(raw, %err, "delivery date did not parse, passing through");
            (raw.replace('.', "/"), Some(err.to_string()))
        }
    }
}
