use crate::models::{AuthoritativeOrder, OrderStatus};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ErpError {
    #[error("invalid purchase order number '{0}': expected PO followed by 10 digits")]
    InvalidOrderNumber(String),
    #[error("order {0} not found in the order-management system")]
    OrderNotFound(String),
    #[error("invalid target date '{0}': expected DD/MM/YYYY")]
    InvalidTargetDate(String),
    #[error("ERP request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// The order-management collaborator. The engine itself never talks to it;
/// the HTTP layer fetches the snapshot through this trait before the run and
/// applies the proposed updates after, which keeps every engine test free of
/// network dependencies.
#[async_trait]
pub trait OrderSystem: Send + Sync {
    /// Read snapshot of the order, shipping lines included.
    async fn fetch_order(&self, customer_po: &str) -> Result<AuthoritativeOrder, ErpError>;

    /// Writes one target delivery date to the line addressed by its opaque
    /// identifier. `target_date` is DD/MM/YYYY, converted to the ERP wire
    /// format here.
    async fn update_line_date(
        &self,
        customer_po: &str,
        line_identifier: &str,
        target_date: &str,
    ) -> Result<(), ErpError>;

    /// Writes the terminal order status with its audit reason.
    async fn update_status(
        &self,
        customer_po: &str,
        status: OrderStatus,
        reason: &str,
    ) -> Result<(), ErpError>;
}

/// Purchase order numbers are `PO` followed by exactly 10 digits.
pub fn validate_po(customer_po: &str) -> Result<(), ErpError> {
    let digits = customer_po.strip_prefix("PO").unwrap_or("");
    if customer_po.len() == 12 && digits.chars().all(|c| c.is_ascii_digit()) && !digits.is_empty() {
        Ok(())
    } else {
        Err(ErpError::InvalidOrderNumber(customer_po.to_string()))
    }
}

/// The ERP expects dates as local midnight with a fixed +03:00 offset.
fn to_erp_date(target_date: &str) -> Result<String, ErpError> {
    let date = NaiveDate::parse_from_str(target_date, "%d/%m/%Y")
        .map_err(|_| ErpError::InvalidTargetDate(target_date.to_string()))?;
    Ok(date.format("%Y-%m-%dT00:00:00+03:00").to_string())
}

/// REST implementation over the order-management system's JSON API.
pub struct RestOrderSystem {
    client: reqwest::Client,
    base_url: String,
    auth_token: String,
    approved_status: String,
    review_status: String,
}

impl RestOrderSystem {
    pub fn new(
        base_url: String,
        auth_token: String,
        approved_status: String,
        review_status: String,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            auth_token,
            approved_status,
            review_status,
        }
    }

    fn status_label(&self, status: OrderStatus) -> &str {
        match status {
            OrderStatus::Approved => &self.approved_status,
            OrderStatus::SentBackForReview => &self.review_status,
            OrderStatus::Pending => "Pending",
        }
    }

    fn order_url(&self, customer_po: &str) -> String {
        format!("{}/orders/{}", self.base_url, customer_po)
    }
}

#[async_trait]
impl OrderSystem for RestOrderSystem {
    async fn fetch_order(&self, customer_po: &str) -> Result<AuthoritativeOrder, ErpError> {
        validate_po(customer_po)?;

        let response = self
            .client
            .get(self.order_url(customer_po))
            .header("Authorization", format!("Basic {}", self.auth_token))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ErpError::OrderNotFound(customer_po.to_string()));
        }
        let order: AuthoritativeOrder = response.error_for_status()?.json().await?;
        tracing::info!(customer_po, items = order.items.len(), "fetched authoritative order");
        Ok(order)
    }

    async fn update_line_date(
        &self,
        customer_po: &str,
        line_identifier: &str,
        target_date: &str,
    ) -> Result<(), ErpError> {
        let wire_date = to_erp_date(target_date)?;
        tracing::info!(customer_po, line_identifier, %wire_date, "updating line delivery date");

        self.client
            .patch(format!(
                "{}/lines/{}",
                self.order_url(customer_po),
                line_identifier
            ))
            .header("Authorization", format!("Basic {}", self.auth_token))
            .json(&serde_json::json!({ "required_date": wire_date }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn update_status(
        &self,
        customer_po: &str,
        status: OrderStatus,
        reason: &str,
    ) -> Result<(), ErpError> {
        let label = self.status_label(status);
        tracing::info!(customer_po, label, reason, "updating order status");

        self.client
            .patch(self.order_url(customer_po))
            .header("Authorization", format!("Basic {}", self.auth_token))
            .json(&serde_json::json!({ "status": label, "status_reason": reason }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn po_numbers_must_be_po_plus_ten_digits() {
        assert!(validate_po("PO2410000285").is_ok());
        assert!(validate_po("PO241000028").is_err()); // 9 digits
        assert!(validate_po("XX2410000285").is_err());
        assert!(validate_po("PO24100002855").is_err()); // 11 digits
        assert!(validate_po("PO24100002A5").is_err());
        assert!(validate_po("").is_err());
    }

    #[test]
    fn target_dates_convert_to_the_erp_wire_format() {
        assert_eq!(
            to_erp_date("03/01/2025").unwrap(),
            "2025-01-03T00:00:00+03:00"
        );
        assert!(to_erp_date("31/02/2025").is_err());
        assert!(to_erp_date("not a date").is_err());
    }
}
