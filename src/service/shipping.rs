use crate::models::{
    AuthoritativeItem, ExtractedItem, OrderInfo, ShippingCase, ShippingCharge, ShippingHint,
    ShippingValidation,
};
use crate::service::normalize::{amounts_match, normalize_amount};
use bigdecimal::{BigDecimal, Zero};

/// Keyword table for recognizing shipping charges in extracted text, in
/// priority order. The rank makes the first-match-wins contract explicit.
pub const SHIPPING_KEYWORDS: [(&str, u8); 6] = [
    ("shipping & handling", 1),
    ("expedited handling", 2),
    ("shipping", 3),
    ("handling", 4),
    ("freight", 5),
    ("delivery", 6),
];

fn first_keyword_in(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    SHIPPING_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(keyword, _)| *keyword)
}

/// Cross-checks shipping/handling charges between the two sides.
///
/// Authoritative presence means a non-empty set of lines carrying the
/// reserved product-code prefix; their prices are summed. Extracted presence
/// is the caller-supplied hint when there is one, otherwise the first line
/// item whose description or code contains a shipping keyword. Expects the
/// unfiltered authoritative item list, shipping lines included.
pub fn reconcile_shipping(
    authoritative_items: &[AuthoritativeItem],
    extracted_items: &[ExtractedItem],
    hint: Option<&ShippingHint>,
    shipping_prefix: &str,
) -> ShippingValidation {
    let authoritative_charges: Vec<ShippingCharge> = authoritative_items
        .iter()
        .filter(|item| item.product_code.starts_with(shipping_prefix))
        .map(|item| ShippingCharge {
            product_code: item.product_code.clone(),
            price: item.total_price_incl_tax.clone(),
        })
        .collect();
    let authoritative_total: BigDecimal = authoritative_charges
        .iter()
        .map(|charge| charge.price.clone())
        .sum();

    let extracted = hint
        .cloned()
        .or_else(|| hint_from_line_items(extracted_items));

    match (!authoritative_charges.is_empty(), extracted) {
        (true, Some(extracted)) => {
            let difference = (&authoritative_total - &extracted.price).abs();
            let matched = amounts_match(&authoritative_total, &extracted.price);
            ShippingValidation {
                case: ShippingCase::BothExist,
                message: format!(
                    "authoritative shipping {} vs extracted shipping {}: {}",
                    authoritative_total,
                    extracted.price,
                    if matched { "match" } else { "mismatch" }
                ),
                authoritative_charges,
                authoritative_total: Some(authoritative_total),
                extracted: Some(extracted),
                difference: Some(difference),
                matched,
                passed: matched,
            }
        }
        (true, None) => ShippingValidation {
            case: ShippingCase::AuthoritativeOnly,
            message: format!(
                "authoritative order carries shipping charges totalling {} but the extraction found none",
                authoritative_total
            ),
            authoritative_charges,
            authoritative_total: Some(authoritative_total),
            extracted: None,
            difference: None,
            matched: false,
            passed: false,
        },
        (false, Some(extracted)) => ShippingValidation {
            case: ShippingCase::ExtractedOnly,
            message: format!(
                "extraction found a shipping charge of {} but the authoritative order has no {}* lines",
                extracted.price, shipping_prefix
            ),
            authoritative_charges,
            authoritative_total: None,
            extracted: Some(extracted),
            difference: None,
            matched: false,
            passed: false,
        },
        (false, None) => ShippingValidation {
            case: ShippingCase::Neither,
            message: "no shipping charges on either side".to_string(),
            authoritative_charges,
            authoritative_total: None,
            extracted: None,
            difference: None,
            matched: true,
            passed: true,
        },
    }
}

/// Line-item fallback: the first extracted item whose description or code
/// contains a shipping keyword, priced from item_total with extended_price
/// as the fallback field.
fn hint_from_line_items(items: &[ExtractedItem]) -> Option<ShippingHint> {
    for (index, item) in items.iter().enumerate() {
        let text = format!("{} {}", item.description, item.product_code);
        if let Some(keyword) = first_keyword_in(&text) {
            let price_raw = if item.item_total.trim().is_empty() {
                &item.extended_price
            } else {
                &item.item_total
            };
            tracing::debug!(keyword, index, "shipping charge found in line items");
            return Some(ShippingHint {
                source: format!("items[{index}]"),
                raw_text: format!("{} - {}", item.description, price_raw),
                price: normalize_amount(price_raw).value,
            });
        }
    }
    None
}

/// Derives a shipping hint from the order-level free-text fields, the way
/// the extraction step reports order-wide charges. Checked before any line
/// scan: a dedicated shipping-cost field wins, then field names, then
/// keyword hits inside field values. Only positive amounts count; a blank or
/// zero field means "no charge found".
pub fn hint_from_order_info(order_info: &OrderInfo) -> Option<ShippingHint> {
    if let Some(raw) = &order_info.shipping_cost {
        let price = normalize_amount(raw).value;
        if price > BigDecimal::zero() {
            return Some(ShippingHint {
                source: "order_info.shipping_cost".to_string(),
                raw_text: raw.clone(),
                price,
            });
        }
    }

    for (field, raw) in &order_info.extra {
        let lowered = field.to_lowercase();
        if SHIPPING_KEYWORDS
            .iter()
            .any(|(keyword, _)| lowered.contains(keyword))
        {
            let price = normalize_amount(raw).value;
            if price > BigDecimal::zero() {
                return Some(ShippingHint {
                    source: format!("order_info.{field}"),
                    raw_text: raw.clone(),
                    price,
                });
            }
        }
    }

    for (field, raw) in &order_info.extra {
        if first_keyword_in(raw).is_some() {
            let price = normalize_amount(raw).value;
            if price > BigDecimal::zero() {
                return Some(ShippingHint {
                    source: format!("order_info.{field}"),
                    raw_text: raw.clone(),
                    price,
                });
            }
        }
    }

    None
}
