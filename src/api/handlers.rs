use crate::erp::{ErpError, OrderSystem};
use crate::models::{ExtractedOrder, OrderStatus, ShippingHint, ValidationReport};
use crate::service::shipping::hint_from_order_info;
use crate::service::{ReconcileError, Reconciler};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared handler state: the stateless engine plus the ERP collaborator.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Reconciler>,
    pub erp: Arc<dyn OrderSystem>,
}

/// Request body: one extracted order to reconcile against the ERP snapshot.
#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    pub customer_po: String,
    pub extracted: ExtractedOrder,
    /// Optional precomputed shipping charge; when absent one is derived from
    /// the order-level free-text fields.
    #[serde(default)]
    pub shipping_hint: Option<ShippingHint>,
}

#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub success: bool,
    pub customer_po: String,
    pub message: String,
    pub report: Option<ValidationReport>,
    pub line_updates: Vec<LineUpdateResult>,
    pub status_written: Option<OrderStatus>,
}

/// Per-line outcome of applying a proposed target date to the ERP.
#[derive(Debug, Serialize)]
pub struct LineUpdateResult {
    pub product_code: String,
    pub line_identifier: String,
    pub target_date: String,
    pub status: String,
    pub message: String,
}

/// Health check.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Full reconciliation pass: fetch the authoritative snapshot, run the
/// engine, then apply the proposed delivery dates and the decided status
/// through the ERP collaborator.
pub async fn reconcile_order(
    State(state): State<AppState>,
    Json(req): Json<ReconcileRequest>,
) -> Response {
    let hint = req
        .shipping_hint
        .clone()
        .or_else(|| hint_from_order_info(&req.extracted.order_info));

    let authoritative = match state.erp.fetch_order(&req.customer_po).await {
        Ok(order) => order,
        Err(err) => return erp_failure(&req.customer_po, err),
    };

    let outcome = match state
        .engine
        .reconcile(&req.extracted, &authoritative, hint.as_ref())
    {
        Ok(outcome) => outcome,
        Err(err @ ReconcileError::EmptyAuthoritativeOrder) => {
            return failure(
                StatusCode::UNPROCESSABLE_ENTITY,
                &req.customer_po,
                err.to_string(),
            )
        }
    };

    let mut line_updates = Vec::with_capacity(outcome.date_updates.len());
    for update in &outcome.date_updates {
        let (status, message) = if let Some(calc_err) = &update.calculation_error {
            ("skipped".to_string(), calc_err.clone())
        } else {
            match state
                .erp
                .update_line_date(&req.customer_po, &update.line_identifier, &update.target_date)
                .await
            {
                Ok(()) => ("success".to_string(), "line updated".to_string()),
                Err(err) => ("failed".to_string(), err.to_string()),
            }
        };
        line_updates.push(LineUpdateResult {
            product_code: update.product_code.clone(),
            line_identifier: update.line_identifier.clone(),
            target_date: update.target_date.clone(),
            status,
            message,
        });
    }

    // An inconclusive decision carries no status: the prior ERP status is
    // deliberately left untouched.
    let decision = &outcome.report.decision;
    let status_written = match decision.status() {
        Some(status) => match state
            .erp
            .update_status(&req.customer_po, status, decision.reason())
            .await
        {
            Ok(()) => Some(status),
            Err(err) => {
                tracing::warn!(customer_po = %req.customer_po, %err, "status write-back failed");
                None
            }
        },
        None => None,
    };

    let response = ReconcileResponse {
        success: true,
        customer_po: req.customer_po,
        message: decision.reason().to_string(),
        report: Some(outcome.report),
        line_updates,
        status_written,
    };
    (StatusCode::OK, Json(response)).into_response()
}

fn erp_failure(customer_po: &str, err: ErpError) -> Response {
    let status = match err {
        ErpError::InvalidOrderNumber(_) => StatusCode::BAD_REQUEST,
        ErpError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    failure(status, customer_po, err.to_string())
}

fn failure(status: StatusCode, customer_po: &str, message: String) -> Response {
    let response = ReconcileResponse {
        success: false,
        customer_po: customer_po.to_string(),
        message,
        report: None,
        line_updates: vec![],
        status_written: None,
    };
    (status, Json(response)).into_response()
}
