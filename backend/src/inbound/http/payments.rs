//! Checkout, provider webhooks, and organizer wallet endpoints.
//!
//! ```text
//! POST /api/v1/payments/checkout {"eventId":"…","ticketId":"…","quantity":2,"method":"PIX"}
//! POST /api/v1/payments/webhooks/{provider}  (x-webhook-signature: <hex hmac>)
//! GET  /api/v1/payments/balance?currency=BRL
//! POST /api/v1/payments/withdraw {"amount":100.0}
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{CheckoutRequest, WithdrawRequest};
use crate::domain::{Error, PaymentMethod, PaymentProvider};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    BalanceResponse, CheckoutResponse, MoneyResponse, TransactionResponse, WithdrawResponse,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, parse_currency, parse_id, parse_value, require,
};
use crate::inbound::http::webhook_signature::WEBHOOK_SIGNATURE_HEADER;

const EVENT_ID: FieldName = FieldName::new("eventId");
const TICKET_ID: FieldName = FieldName::new("ticketId");
const QUANTITY: FieldName = FieldName::new("quantity");
const METHOD: FieldName = FieldName::new("method");
const PROVIDER: FieldName = FieldName::new("provider");
const AMOUNT: FieldName = FieldName::new("amount");
const CURRENCY: FieldName = FieldName::new("currency");

/// Payload for buying tickets.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    /// Event being bought.
    pub event_id: Option<String>,
    /// Ticket type being bought.
    pub ticket_id: Option<String>,
    /// Number of tickets, at least one.
    #[schema(example = 2)]
    pub quantity: Option<i64>,
    /// `PIX`, `CREDIT_CARD`, `DEBIT_CARD`, `CASH`, or `OTHER`.
    #[schema(example = "PIX")]
    pub method: Option<String>,
    /// `ZOOP` or `PAYPAL`; the configured default is used when absent.
    pub provider: Option<String>,
}

impl CheckoutBody {
    fn into_request(self, user_id: crate::domain::UserId) -> Result<CheckoutRequest, Error> {
        let event_id = require(self.event_id, EVENT_ID)?;
        let ticket_id = require(self.ticket_id, TICKET_ID)?;
        let quantity = require(self.quantity, QUANTITY)?;
        let method = require(self.method, METHOD)?;
        Ok(CheckoutRequest {
            user_id,
            event_id: parse_id(&event_id, EVENT_ID)?,
            ticket_id: parse_id(&ticket_id, TICKET_ID)?,
            // Zero reaches the use-case so it reports the domain message.
            quantity: u32::try_from(quantity).map_err(|_| {
                invalid_field_error(QUANTITY, "Quantity must be greater than zero")
            })?,
            method: parse_value::<PaymentMethod>(&method, METHOD)?,
            provider: self
                .provider
                .as_deref()
                .map(|raw| parse_value::<PaymentProvider>(raw, PROVIDER))
                .transpose()?,
        })
    }
}

/// Query for the balance endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BalanceQuery {
    /// Three-letter code; defaults to `BRL`.
    pub currency: Option<String>,
}

/// Payload for withdrawing funds.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawBody {
    /// Positive amount to withdraw.
    #[schema(value_type = Option<f64>, example = 100.0)]
    pub amount: Option<Decimal>,
    /// Three-letter code; defaults to `BRL`.
    pub currency: Option<String>,
}

/// Buy tickets and open a charge at the payment provider.
#[utoipa::path(
    post,
    path = "/api/v1/payments/checkout",
    request_body = CheckoutBody,
    responses(
        (status = 201, description = "Pending transaction and payment instructions", body = CheckoutResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Event or ticket not found", body = Error),
        (status = 409, description = "Unpublished event or insufficient inventory", body = Error),
        (status = 503, description = "Payment provider unavailable", body = Error)
    ),
    tags = ["payments"],
    operation_id = "checkout"
)]
#[post("/payments/checkout")]
pub async fn checkout(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CheckoutBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let request = payload.into_inner().into_request(user_id)?;
    let outcome = state.payments.checkout(request).await?;
    Ok(HttpResponse::Created().json(CheckoutResponse::from(outcome)))
}

/// Receive a payment provider notification.
///
/// The raw body must be signed with the provider's shared secret in the
/// [`WEBHOOK_SIGNATURE_HEADER`] header; it is only parsed once the signature
/// checks out.
#[utoipa::path(
    post,
    path = "/api/v1/payments/webhooks/{provider}",
    params(
        ("provider" = String, Path, description = "`zoop` or `paypal`"),
        ("x-webhook-signature" = String, Header, description = "Hex HMAC-SHA256 of the raw body")
    ),
    request_body(content = Object, description = "Provider specific payload"),
    responses(
        (status = 200, description = "Updated transaction", body = TransactionResponse),
        (status = 400, description = "Unknown provider or malformed payload", body = Error),
        (status = 401, description = "Missing or invalid signature", body = Error),
        (status = 404, description = "Unknown charge reference", body = Error),
        (status = 409, description = "Transition not allowed", body = Error)
    ),
    tags = ["payments"],
    operation_id = "paymentWebhook",
    security([])
)]
#[post("/payments/webhooks/{provider}")]
pub async fn webhook(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    request: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<TransactionResponse>> {
    let provider = parse_value::<PaymentProvider>(&path, PROVIDER)?;
    let signature = request
        .headers()
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    state.webhook_secrets.verify(provider, signature, &body)?;
    let payload: Value = serde_json::from_slice(&body).map_err(|err| {
        Error::invalid_request(format!("Invalid request body: {err}"))
            .with_details(json!({ "code": "invalid_body" }))
    })?;
    let transaction = state
        .payments
        .handle_notification(provider, payload)
        .await?;
    info!(
        %provider,
        transaction_id = %transaction.id(),
        status = %transaction.status(),
        "payment notification applied"
    );
    Ok(web::Json(TransactionResponse::from(&transaction)))
}

/// Balance available to the session organizer.
#[utoipa::path(
    get,
    path = "/api/v1/payments/balance",
    params(BalanceQuery),
    responses(
        (status = 200, description = "Balance", body = BalanceResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an organizer", body = Error)
    ),
    tags = ["payments"],
    operation_id = "balance"
)]
#[get("/payments/balance")]
pub async fn balance(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<BalanceQuery>,
) -> ApiResult<web::Json<BalanceResponse>> {
    let organizer_id = session.require_user_id()?;
    let currency = parse_currency(query.currency.as_deref(), CURRENCY)?;
    let balance = state.payments_query.balance(organizer_id, currency).await?;
    Ok(web::Json(BalanceResponse {
        balance: MoneyResponse::from(&balance),
    }))
}

/// Withdraw funds from the session organizer's balance.
#[utoipa::path(
    post,
    path = "/api/v1/payments/withdraw",
    request_body = WithdrawBody,
    responses(
        (status = 201, description = "Withdrawal recorded", body = WithdrawResponse),
        (status = 400, description = "Invalid amount or insufficient balance", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an organizer", body = Error)
    ),
    tags = ["payments"],
    operation_id = "withdraw"
)]
#[post("/payments/withdraw")]
pub async fn withdraw(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<WithdrawBody>,
) -> ApiResult<HttpResponse> {
    let organizer_id = session.require_user_id()?;
    let body = payload.into_inner();
    let outcome = state
        .payments
        .withdraw(WithdrawRequest {
            organizer_id,
            amount: require(body.amount, AMOUNT)?,
            currency: parse_currency(body.currency.as_deref(), CURRENCY)?,
        })
        .await?;
    Ok(HttpResponse::Created().json(WithdrawResponse::from(outcome)))
}

#[cfg(test)]
#[path = "payments_tests.rs"]
mod tests;
