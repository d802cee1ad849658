//! Zoop adapter: PIX QR payloads or hosted checkout links.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::domain::ports::{PaymentGateway, PaymentGatewayError};
use crate::domain::{
    Charge, ChargeRequest, ChargeStatus, PaymentMethod, PaymentNotification, PaymentProvider,
};

use super::reference_suffix;

const DEFAULT_CHECKOUT_BASE: &str = "https://sandbox.zoop.example.com/checkout";
const PIX_PAYLOAD: &str = "00020126580014BR.GOV.BCB.PIX";

#[derive(Debug, Deserialize)]
struct ZoopWebhook {
    data: ZoopChargeData,
}

#[derive(Debug, Deserialize)]
struct ZoopChargeData {
    id: String,
    #[serde(default)]
    status: Option<String>,
}

/// Mocked Zoop gateway.
#[derive(Debug, Clone)]
pub struct ZoopGateway {
    checkout_base: String,
}

impl Default for ZoopGateway {
    fn default() -> Self {
        Self::new(DEFAULT_CHECKOUT_BASE)
    }
}

impl ZoopGateway {
    /// Gateway sending buyers to `checkout_base` to pay.
    pub fn new(checkout_base: impl Into<String>) -> Self {
        Self {
            checkout_base: checkout_base.into().trim_end_matches('/').to_owned(),
        }
    }
}

fn parse_status(raw: Option<&str>) -> Result<ChargeStatus, PaymentGatewayError> {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        None | Some("pending") => Ok(ChargeStatus::Pending),
        Some("paid") => Ok(ChargeStatus::Paid),
        Some("canceled") => Ok(ChargeStatus::Canceled),
        Some("failed") => Ok(ChargeStatus::Failed),
        Some(other) => Err(PaymentGatewayError::invalid_notification(format!(
            "unknown zoop charge status `{other}`"
        ))),
    }
}

#[async_trait]
impl PaymentGateway for ZoopGateway {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::Zoop
    }

    async fn create_charge(&self, request: &ChargeRequest) -> Result<Charge, PaymentGatewayError> {
        let external_id = format!("zoop_{}", reference_suffix());
        info!(
            transaction_id = %request.transaction_id,
            amount_cents = request.amount.cents(),
            currency = %request.amount.currency(),
            method = %request.method,
            %external_id,
            "created zoop charge"
        );
        let (checkout_url, pix_qr_code) = if request.method == PaymentMethod::Pix {
            (None, Some(PIX_PAYLOAD.to_owned()))
        } else {
            (Some(format!("{}/{external_id}", self.checkout_base)), None)
        };
        Ok(Charge {
            provider: PaymentProvider::Zoop,
            external_id,
            checkout_url,
            pix_qr_code,
        })
    }

    fn parse_notification(
        &self,
        payload: &Value,
    ) -> Result<PaymentNotification, PaymentGatewayError> {
        let webhook = ZoopWebhook::deserialize(payload)
            .map_err(|err| PaymentGatewayError::invalid_notification(err.to_string()))?;
        Ok(PaymentNotification {
            provider: PaymentProvider::Zoop,
            status: parse_status(webhook.data.status.as_deref())?,
            external_id: webhook.data.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::{Currency, Money, TransactionId};

    fn request(method: PaymentMethod) -> ChargeRequest {
        ChargeRequest {
            transaction_id: TransactionId::random(),
            amount: Money::from_cents(5_000, Currency::default()).expect("money"),
            method,
            description: "2 ticket(s)".to_owned(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn pix_charges_carry_a_qr_payload() {
        let charge = ZoopGateway::default()
            .create_charge(&request(PaymentMethod::Pix))
            .await
            .expect("charge");
        assert!(charge.external_id.starts_with("zoop_"));
        assert_eq!(charge.pix_qr_code.as_deref(), Some(PIX_PAYLOAD));
        assert!(charge.checkout_url.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn card_charges_link_to_checkout() {
        let gateway = ZoopGateway::new("https://zoop.test/checkout/");
        let charge = gateway
            .create_charge(&request(PaymentMethod::CreditCard))
            .await
            .expect("charge");
        assert_eq!(
            charge.checkout_url,
            Some(format!("https://zoop.test/checkout/{}", charge.external_id))
        );
        assert!(charge.pix_qr_code.is_none());
    }

    #[rstest]
    #[case::paid(json!({"data": {"id": "zoop_1", "status": "paid"}}), ChargeStatus::Paid)]
    #[case::canceled(json!({"data": {"id": "zoop_1", "status": "canceled"}}), ChargeStatus::Canceled)]
    #[case::failed(json!({"data": {"id": "zoop_1", "status": "failed"}}), ChargeStatus::Failed)]
    #[case::missing_status(json!({"data": {"id": "zoop_1"}}), ChargeStatus::Pending)]
    fn parses_webhooks(#[case] payload: Value, #[case] expected: ChargeStatus) {
        let notification = ZoopGateway::default()
            .parse_notification(&payload)
            .expect("notification");
        assert_eq!(notification.external_id, "zoop_1");
        assert_eq!(notification.status, expected);
    }

    #[rstest]
    #[case::no_data(json!({"resource": {"id": "x"}}))]
    #[case::unknown_status(json!({"data": {"id": "zoop_1", "status": "refunded"}}))]
    fn rejects_malformed_webhooks(#[case] payload: Value) {
        let err = ZoopGateway::default()
            .parse_notification(&payload)
            .expect_err("malformed");
        assert!(matches!(err, PaymentGatewayError::InvalidNotification { .. }));
    }
}
