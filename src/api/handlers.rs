//! HTTP request handlers for the Budget Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::suggest_prices;
use crate::config::Catalog;
use crate::error::EngineResult;
use crate::models::{
    Accessory, AuditTrace, AuditWarning, BudgetDraft, BudgetQuote, LogisticsLeg,
    LogisticsSelection, LogisticsStage, LogisticsType, MachineBase, QuoteCategory, QuoteLine,
    TaxSelection,
};
use crate::money::MoneyInput;

use super::request::{BreakdownRequest, PriceSuggestionRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/budgets/breakdown", post(breakdown_handler))
        .route("/budgets/payload", post(submission_payload_handler))
        .route("/pricing/suggestions", post(price_suggestion_handler))
        .with_state(state)
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "engine_version": env!("CARGO_PKG_VERSION"),
        "catalog": state.catalog().metadata().name,
        "catalog_version": state.catalog().metadata().version
    }))
}

/// Handler for POST /budgets/breakdown.
///
/// Prices a draft against the catalog and returns the breakdown with its
/// audit trace. Nothing is persisted.
async fn breakdown_handler(
    State(state): State<AppState>,
    payload: Result<Json<BreakdownRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing breakdown request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let catalog = state.catalog();
    let (draft, warnings) = resolve_draft(&request, catalog);
    let quote = build_quote(&draft, catalog, warnings, start_time);

    for warning in &quote.audit_trace.warnings {
        warn!(
            correlation_id = %correlation_id,
            code = %warning.code,
            message = %warning.message,
            "Input degraded"
        );
    }
    info!(
        correlation_id = %correlation_id,
        lines = draft.lines.len(),
        legs = draft.logistics.len(),
        grand_total = %quote.breakdown.grand_total,
        duration_us = quote.audit_trace.duration_us,
        "Breakdown completed successfully"
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(quote),
    )
        .into_response()
}

/// Handler for POST /budgets/payload.
///
/// Resolves a draft into the body the backend expects when a budget is
/// created or updated. Unlike the breakdown preview, unknown catalog ids
/// and unparsable amounts are rejected.
async fn submission_payload_handler(
    State(state): State<AppState>,
    payload: Result<Json<BreakdownRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing submission payload request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let catalog = state.catalog();
    let result = ensure_references(&request, catalog).and_then(|()| {
        let (draft, _) = resolve_draft(&request, catalog);
        draft.to_payload()
    });

    match result {
        Ok(submission) => {
            info!(
                correlation_id = %correlation_id,
                items = submission.items.len(),
                legs = submission.logistics.len(),
                "Submission payload built"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(submission),
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Submission payload rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /pricing/suggestions.
async fn price_suggestion_handler(
    State(state): State<AppState>,
    payload: Result<Json<PriceSuggestionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing price suggestion request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let Some(cost) = request.cost.value() else {
        warn!(correlation_id = %correlation_id, cost = %request.cost, "Unparsable cost");
        return ApiErrorResponse::bad_request(ApiError::with_details(
            "INVALID_AMOUNT",
            format!("Invalid amount for 'cost': '{}'", request.cost),
            "Use digits with '.' or ',' as decimal separator",
        ))
        .into_response();
    };

    let suggestion = suggest_prices(cost, state.catalog().pricing(), 1);
    info!(
        correlation_id = %correlation_id,
        cost = %suggestion.cost,
        sale_price = %suggestion.sale_price,
        monthly_rent = %suggestion.monthly_rent,
        "Price suggestion completed"
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(suggestion),
    )
        .into_response()
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error).into_response()
}

/// Builds a draft from a request, degrading unknown references.
///
/// Unknown catalog ids price at zero (or at the amounts supplied in the
/// request) and produce a warning instead of failing the request.
fn resolve_draft(request: &BreakdownRequest, catalog: &Catalog) -> (BudgetDraft, Vec<AuditWarning>) {
    let mut warnings = Vec::new();
    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
    let mut draft = BudgetDraft::new(date);

    for (i, item) in request.items.iter().enumerate() {
        let machine = match catalog.machine(item.machine_base_id) {
            Ok(machine) => machine.clone(),
            Err(err) => {
                warnings.push(AuditWarning::new("MACHINE_NOT_FOUND", err.to_string(), "medium"));
                MachineBase {
                    id: item.machine_base_id,
                    name: fallback_label("Machine", item.machine_base_id),
                    total: Decimal::ZERO,
                }
            }
        };

        let index = draft.add_machine_line(&machine);
        if draft.set_machine_quantity(index, item.quantity).is_err() {
            continue;
        }
        if let Some(price) = &item.unit_price {
            check_amount(&mut warnings, price, || format!("items[{}].unit_price", i));
            draft.set_machine_price(machine.id, price.clone());
        }

        for (j, requested) in item.accessories.iter().enumerate() {
            let accessory = match catalog.accessory(requested.accessory_id) {
                Ok(accessory) => accessory.clone(),
                Err(err) => {
                    warnings.push(AuditWarning::new(
                        "ACCESSORY_NOT_FOUND",
                        err.to_string(),
                        "medium",
                    ));
                    Accessory {
                        id: requested.accessory_id,
                        name: fallback_label("Accessory", requested.accessory_id),
                        total: Decimal::ZERO,
                    }
                }
            };

            if draft.add_accessory(index, &accessory).is_err() {
                continue;
            }
            let accessory_index = draft.lines[index].accessories.len() - 1;
            if draft
                .set_accessory_quantity(index, accessory_index, requested.quantity)
                .is_err()
            {
                continue;
            }
            if let Some(price) = &requested.unit_price {
                check_amount(&mut warnings, price, || {
                    format!("items[{}].accessories[{}].unit_price", i, j)
                });
                draft.set_accessory_price(accessory.id, price.clone());
            }
        }
    }

    for requested in &request.logistics {
        let leg = match catalog.logistics_leg(requested.logistics_leg_id) {
            Ok(leg) => leg.clone(),
            Err(err) => {
                warnings.push(AuditWarning::new(
                    "LOGISTICS_LEG_NOT_FOUND",
                    err.to_string(),
                    "medium",
                ));
                LogisticsLeg {
                    id: requested.logistics_leg_id,
                    origin: String::new(),
                    destination: String::new(),
                    kind: LogisticsType::Land,
                    stage: LogisticsStage::PostCustoms,
                    total: Decimal::ZERO,
                }
            }
        };

        let mut selection = LogisticsSelection::capture(&leg);
        if let Some(stage) = requested.stage {
            selection.stage = stage;
        }
        if let Some(total) = &requested.total {
            check_amount(&mut warnings, total, || {
                format!("logistics[{}].total", requested.logistics_leg_id)
            });
            selection.total = total.clone();
        }
        draft.logistics.insert(leg.id, selection);
    }

    draft = draft.with_catalog_taxes(catalog.taxes());
    if let Some(requested_taxes) = &request.taxes {
        for selection in draft.taxes.values_mut() {
            selection.included = false;
        }

        for requested in requested_taxes {
            if let Err(err) = catalog.tax(requested.tax_id) {
                warnings.push(AuditWarning::new("TAX_NOT_FOUND", err.to_string(), "medium"));
            }
            let selection = draft
                .taxes
                .entry(requested.tax_id)
                .or_insert_with(|| TaxSelection {
                    tax_id: requested.tax_id,
                    name: fallback_label("Tax", requested.tax_id),
                    included: false,
                    percentage: MoneyInput::Amount(Decimal::ZERO),
                    minimum_amount: None,
                });
            selection.included = requested.included;
            if let Some(percentage) = &requested.percentage {
                check_amount(&mut warnings, percentage, || {
                    format!("taxes[{}].percentage", requested.tax_id)
                });
                selection.percentage = percentage.clone();
            }
        }
    }

    (draft, warnings)
}

/// Fails on the first id the catalog does not know.
fn ensure_references(request: &BreakdownRequest, catalog: &Catalog) -> EngineResult<()> {
    for item in &request.items {
        catalog.machine(item.machine_base_id)?;
        for accessory in &item.accessories {
            catalog.accessory(accessory.accessory_id)?;
        }
    }
    for leg in &request.logistics {
        catalog.logistics_leg(leg.logistics_leg_id)?;
    }
    for tax in request.taxes.iter().flatten() {
        catalog.tax(tax.tax_id)?;
    }
    Ok(())
}

fn check_amount(
    warnings: &mut Vec<AuditWarning>,
    value: &MoneyInput,
    field: impl FnOnce() -> String,
) {
    if value.value().is_none() {
        warnings.push(AuditWarning::new(
            "INVALID_AMOUNT",
            format!("Invalid amount for '{}': '{}'; counted as 0", field(), value),
            "high",
        ));
    }
}

fn fallback_label(kind: &str, id: u64) -> String {
    format!("{} #{}", kind, id)
}

/// Prices a resolved draft into a quote.
fn build_quote(
    draft: &BudgetDraft,
    catalog: &Catalog,
    warnings: Vec<AuditWarning>,
    start_time: Instant,
) -> BudgetQuote {
    let result = draft.explain();

    let mut lines = Vec::new();
    for line in &draft.lines {
        let unit_price = draft.overrides.machine_unit_price(line);
        lines.push(QuoteLine {
            category: QuoteCategory::Machine,
            reference_id: line.machine_base_id,
            label: catalog
                .machine(line.machine_base_id)
                .map(|m| m.name.clone())
                .unwrap_or_else(|_| fallback_label("Machine", line.machine_base_id)),
            quantity: line.quantity,
            unit_price,
            amount: unit_price.saturating_mul(Decimal::from(line.quantity)),
        });

        for accessory in &line.accessories {
            let unit_price = draft.overrides.accessory_unit_price(accessory);
            lines.push(QuoteLine {
                category: QuoteCategory::Accessory,
                reference_id: accessory.accessory_id,
                label: catalog
                    .accessory(accessory.accessory_id)
                    .map(|a| a.name.clone())
                    .unwrap_or_else(|_| fallback_label("Accessory", accessory.accessory_id)),
                quantity: accessory.quantity,
                unit_price,
                amount: unit_price.saturating_mul(Decimal::from(accessory.quantity)),
            });
        }
    }

    for selection in draft.logistics.values() {
        let total = selection.total.amount_or_zero();
        let category = match selection.stage {
            LogisticsStage::PreCustoms => QuoteCategory::PreCustomsLogistics,
            LogisticsStage::PostCustoms => QuoteCategory::PostCustomsLogistics,
        };
        lines.push(QuoteLine {
            category,
            reference_id: selection.logistics_leg_id,
            label: catalog
                .logistics_leg(selection.logistics_leg_id)
                .map(LogisticsLeg::label)
                .unwrap_or_else(|_| fallback_label("Leg", selection.logistics_leg_id)),
            quantity: 1,
            unit_price: total,
            amount: total,
        });
    }

    debug!(lines = lines.len(), steps = result.steps.len(), "quote assembled");

    BudgetQuote {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        breakdown: result.breakdown,
        formatted: result.breakdown.formatted(),
        lines,
        tax_lines: result.tax_lines,
        audit_trace: AuditTrace {
            steps: result.steps,
            warnings,
            duration_us: u64::try_from(start_time.elapsed().as_micros()).unwrap_or(u64::MAX),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatalogMetadata, PricingRules};
    use crate::error::EngineError;
    use crate::models::Tax;
    use axum::body::Body;
    use axum::http::Request;
    use std::str::FromStr;
    use tower::ServiceExt;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_catalog() -> Catalog {
        Catalog::new(
            CatalogMetadata {
                name: "Test Catalog".to_string(),
                currency: "USD".to_string(),
                version: "1".to_string(),
            },
            vec![MachineBase {
                id: 1,
                name: "Excavator".to_string(),
                total: dec("1000"),
            }],
            vec![Accessory {
                id: 10,
                name: "Hammer".to_string(),
                total: dec("100"),
            }],
            vec![
                LogisticsLeg {
                    id: 20,
                    origin: "Shanghai".to_string(),
                    destination: "Buenos Aires".to_string(),
                    kind: LogisticsType::Sea,
                    stage: LogisticsStage::PreCustoms,
                    total: dec("200"),
                },
                LogisticsLeg {
                    id: 21,
                    origin: "Buenos Aires".to_string(),
                    destination: "Cordoba".to_string(),
                    kind: LogisticsType::Land,
                    stage: LogisticsStage::PostCustoms,
                    total: dec("50"),
                },
            ],
            vec![
                Tax {
                    id: 30,
                    name: "Duty".to_string(),
                    percentage: dec("10"),
                    always_include: true,
                    minimum_amount: None,
                },
                Tax {
                    id: 31,
                    name: "VAT".to_string(),
                    percentage: dec("21"),
                    always_include: false,
                    minimum_amount: None,
                },
            ],
            PricingRules::default(),
        )
    }

    fn request(json: &str) -> BreakdownRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_resolve_draft_defaults_to_always_included_taxes() {
        let (draft, warnings) = resolve_draft(
            &request(r#"{"items": [{"machine_base_id": 1}]}"#),
            &create_test_catalog(),
        );
        assert!(warnings.is_empty());
        assert!(draft.taxes[&30].included);
        assert!(!draft.taxes[&31].included);
        assert_eq!(draft.breakdown().grand_total, dec("1100"));
    }

    #[test]
    fn test_resolve_draft_explicit_taxes_replace_defaults() {
        let (draft, _) = resolve_draft(
            &request(r#"{"items": [{"machine_base_id": 1}], "taxes": [{"tax_id": 31}]}"#),
            &create_test_catalog(),
        );
        assert!(!draft.taxes[&30].included);
        assert!(draft.taxes[&31].included);
        assert_eq!(draft.breakdown().taxes_total, dec("210"));
    }

    #[test]
    fn test_resolve_draft_unknown_machine_warns_and_prices_zero() {
        let (draft, warnings) = resolve_draft(
            &request(r#"{"items": [{"machine_base_id": 99, "quantity": 2}]}"#),
            &create_test_catalog(),
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, "MACHINE_NOT_FOUND");
        assert_eq!(draft.breakdown().machines_subtotal, Decimal::ZERO);
    }

    #[test]
    fn test_resolve_draft_unparsable_price_warns() {
        let (draft, warnings) = resolve_draft(
            &request(r#"{"items": [{"machine_base_id": 1, "unit_price": "mucho"}]}"#),
            &create_test_catalog(),
        );
        assert_eq!(warnings[0].code, "INVALID_AMOUNT");
        assert_eq!(draft.breakdown().machines_subtotal, Decimal::ZERO);
    }

    #[test]
    fn test_resolve_draft_clamps_quantities() {
        let (draft, _) = resolve_draft(
            &request(
                r#"{"items": [{"machine_base_id": 1, "quantity": 0,
                    "accessories": [{"accessory_id": 10, "quantity": -2}]}]}"#,
            ),
            &create_test_catalog(),
        );
        assert_eq!(draft.lines[0].quantity, 1);
        assert_eq!(draft.lines[0].accessories[0].quantity, 1);
    }

    #[test]
    fn test_resolve_draft_leg_stage_override() {
        let (draft, _) = resolve_draft(
            &request(
                r#"{"items": [{"machine_base_id": 1}], "taxes": [],
                    "logistics": [{"logistics_leg_id": 21, "stage": "PRE_CUSTOMS"}]}"#,
            ),
            &create_test_catalog(),
        );
        let breakdown = draft.breakdown();
        assert_eq!(breakdown.pre_customs_logistics, dec("50"));
        assert_eq!(breakdown.post_customs_logistics, Decimal::ZERO);
    }

    #[test]
    fn test_ensure_references_rejects_first_unknown_id() {
        let catalog = create_test_catalog();
        assert!(
            ensure_references(
                &request(
                    r#"{"items": [{"machine_base_id": 1, "accessories": [{"accessory_id": 10}]}],
                        "logistics": [{"logistics_leg_id": 21}], "taxes": [{"tax_id": 31}]}"#
                ),
                &catalog,
            )
            .is_ok()
        );
        assert!(matches!(
            ensure_references(
                &request(r#"{"items": [{"machine_base_id": 1}], "taxes": [{"tax_id": 77}]}"#),
                &catalog,
            ),
            Err(EngineError::TaxNotFound { id: 77 })
        ));
        assert!(matches!(
            ensure_references(
                &request(r#"{"items": [{"machine_base_id": 1}], "logistics": [{"logistics_leg_id": 5}]}"#),
                &catalog,
            ),
            Err(EngineError::LogisticsLegNotFound { id: 5 })
        ));
    }

    #[test]
    fn test_build_quote_lists_lines_in_draft_order() {
        let catalog = create_test_catalog();
        let (draft, warnings) = resolve_draft(
            &request(
                r#"{"items": [{"machine_base_id": 1, "quantity": 2,
                    "accessories": [{"accessory_id": 10}]}],
                    "logistics": [{"logistics_leg_id": 20}, {"logistics_leg_id": 21}]}"#,
            ),
            &catalog,
        );
        let quote = build_quote(&draft, &catalog, warnings, Instant::now());

        let categories: Vec<QuoteCategory> = quote.lines.iter().map(|l| l.category).collect();
        assert_eq!(
            categories,
            vec![
                QuoteCategory::Machine,
                QuoteCategory::Accessory,
                QuoteCategory::PreCustomsLogistics,
                QuoteCategory::PostCustomsLogistics,
            ]
        );
        assert_eq!(quote.lines[0].amount, dec("2000"));
        assert_eq!(quote.lines[2].label, "Shanghai -> Buenos Aires (SEA, PRE_CUSTOMS)");
        // 2000 + 100 + 200 = 2300; 10% = 230; + 50
        assert_eq!(quote.breakdown.grand_total, dec("2580"));
        assert_eq!(quote.formatted.grand_total, "U$D 2.580,00");
        assert_eq!(quote.audit_trace.steps.len(), 4);
    }

    #[tokio::test]
    async fn test_health_returns_catalog_name() {
        let router = create_router(AppState::new(create_test_catalog()));
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["catalog"], "Test Catalog");
    }

    #[tokio::test]
    async fn test_suggestion_rejects_unparsable_cost() {
        let router = create_router(AppState::new(create_test_catalog()));
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/pricing/suggestions")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"cost": "abc"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "INVALID_AMOUNT");
    }
}
