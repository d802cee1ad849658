//! Payment provider vocabulary shared by the gateway port and services.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Money, PaymentMethod, TransactionId};

/// Raised when a provider name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown payment provider: {value}")]
pub struct UnknownProvider {
    value: String,
}

/// External payment provider brokering a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentProvider {
    /// Zoop, the default for PIX and cards.
    #[default]
    Zoop,
    /// PayPal orders.
    Paypal,
}

impl PaymentProvider {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zoop => "ZOOP",
            Self::Paypal => "PAYPAL",
        }
    }
}

impl fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentProvider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ZOOP" => Ok(Self::Zoop),
            "PAYPAL" => Ok(Self::Paypal),
            _ => Err(UnknownProvider {
                value: s.to_owned(),
            }),
        }
    }
}

/// Charge to be created at a provider for a pending transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeRequest {
    /// Transaction being paid.
    pub transaction_id: TransactionId,
    /// Total to charge.
    pub amount: Money,
    /// Payment method chosen at checkout.
    pub method: PaymentMethod,
    /// Statement line shown to the buyer.
    pub description: String,
}

/// Provider response for a created charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    /// Provider holding the charge.
    pub provider: PaymentProvider,
    /// Charge identifier at the provider.
    pub external_id: String,
    /// Redirect URL for card and wallet payments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
    /// Copy-and-paste PIX payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pix_qr_code: Option<String>,
}

/// Normalised charge state reported by a provider notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeStatus {
    /// Not settled yet.
    Pending,
    /// Money captured.
    Paid,
    /// Canceled by the buyer or provider.
    Canceled,
    /// Declined or errored.
    Failed,
}

/// Provider notification reduced to the fields the domain acts upon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentNotification {
    /// Provider that sent the notification.
    pub provider: PaymentProvider,
    /// Charge identifier at the provider.
    pub external_id: String,
    /// Charge status reported by the provider.
    pub status: ChargeStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("zoop", PaymentProvider::Zoop)]
    #[case(" PayPal ", PaymentProvider::Paypal)]
    fn parses_provider(#[case] raw: &str, #[case] expected: PaymentProvider) {
        assert_eq!(raw.parse::<PaymentProvider>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_provider() {
        assert!("stripe".parse::<PaymentProvider>().is_err());
    }
}
