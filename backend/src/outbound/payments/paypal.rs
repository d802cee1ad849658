//! PayPal adapter: orders approved through a hosted checkout page.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::domain::ports::{PaymentGateway, PaymentGatewayError};
use crate::domain::{Charge, ChargeRequest, ChargeStatus, PaymentNotification, PaymentProvider};

use super::reference_suffix;

const DEFAULT_APPROVAL_BASE: &str = "https://www.sandbox.paypal.com/checkoutnow";

#[derive(Debug, Deserialize)]
struct PaypalWebhook {
    resource: PaypalResource,
}

#[derive(Debug, Deserialize)]
struct PaypalResource {
    id: String,
    #[serde(default)]
    status: Option<String>,
}

/// Mocked PayPal gateway.
#[derive(Debug, Clone)]
pub struct PaypalGateway {
    approval_base: String,
}

impl Default for PaypalGateway {
    fn default() -> Self {
        Self::new(DEFAULT_APPROVAL_BASE)
    }
}

impl PaypalGateway {
    /// Gateway sending buyers to `approval_base` to approve orders.
    pub fn new(approval_base: impl Into<String>) -> Self {
        Self {
            approval_base: approval_base.into(),
        }
    }
}

fn parse_status(raw: Option<&str>) -> Result<ChargeStatus, PaymentGatewayError> {
    match raw.map(str::to_ascii_uppercase).as_deref() {
        None | Some("PENDING") => Ok(ChargeStatus::Pending),
        Some("COMPLETED") => Ok(ChargeStatus::Paid),
        Some("CANCELED") => Ok(ChargeStatus::Canceled),
        Some("FAILED") => Ok(ChargeStatus::Failed),
        Some(other) => Err(PaymentGatewayError::invalid_notification(format!(
            "unknown paypal order status `{other}`"
        ))),
    }
}

#[async_trait]
impl PaymentGateway for PaypalGateway {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::Paypal
    }

    async fn create_charge(&self, request: &ChargeRequest) -> Result<Charge, PaymentGatewayError> {
        let external_id = format!("paypal_{}", reference_suffix());
        info!(
            transaction_id = %request.transaction_id,
            amount_cents = request.amount.cents(),
            currency = %request.amount.currency(),
            %external_id,
            "created paypal order"
        );
        Ok(Charge {
            provider: PaymentProvider::Paypal,
            checkout_url: Some(format!("{}?token={external_id}", self.approval_base)),
            pix_qr_code: None,
            external_id,
        })
    }

    fn parse_notification(
        &self,
        payload: &Value,
    ) -> Result<PaymentNotification, PaymentGatewayError> {
        let webhook = PaypalWebhook::deserialize(payload)
            .map_err(|err| PaymentGatewayError::invalid_notification(err.to_string()))?;
        Ok(PaymentNotification {
            provider: PaymentProvider::Paypal,
            status: parse_status(webhook.resource.status.as_deref())?,
            external_id: webhook.resource.id,
        })
    }
}
