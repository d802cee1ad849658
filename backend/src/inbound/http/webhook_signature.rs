//! HMAC-SHA256 verification of payment provider notifications.
//!
//! Each provider shares a secret with the deployment. A notification is only
//! applied when its [`WEBHOOK_SIGNATURE_HEADER`] carries the hex encoded
//! HMAC of the raw request body under that provider's secret. Providers
//! without a configured secret have every notification rejected.

use std::collections::HashMap;
use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::{Error, PaymentProvider};

/// Header carrying the notification signature.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Optional scheme prefix accepted in front of the hex digest.
const SIGNATURE_PREFIX: &str = "sha256=";

type HmacSha256 = Hmac<Sha256>;

/// Shared secrets keyed by payment provider.
#[derive(Clone, Default)]
pub struct WebhookSecrets {
    secrets: HashMap<PaymentProvider, Zeroizing<Vec<u8>>>,
}

impl fmt::Debug for WebhookSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookSecrets")
            .field("providers", &self.secrets.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl WebhookSecrets {
    /// Register the secret used to verify `provider` notifications.
    ///
    /// Empty secrets are ignored so a blank environment variable does not
    /// accept notifications signed with an empty key.
    ///
    /// # Examples
    /// ```
    /// use ticketing::domain::PaymentProvider;
    /// use ticketing::inbound::http::webhook_signature::{WebhookSecrets, sign_payload};
    ///
    /// let secrets = WebhookSecrets::default().with_secret(PaymentProvider::Zoop, "s3cret");
    /// let body = br#"{"data":{"id":"zoop_1","status":"paid"}}"#;
    /// let signature = sign_payload(b"s3cret", body);
    /// assert!(secrets.verify(PaymentProvider::Zoop, Some(&signature), body).is_ok());
    /// assert!(secrets.verify(PaymentProvider::Paypal, Some(&signature), body).is_err());
    /// ```
    #[must_use]
    pub fn with_secret(mut self, provider: PaymentProvider, secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        if !secret.is_empty() {
            self.secrets.insert(provider, Zeroizing::new(secret.to_vec()));
        }
        self
    }

    /// Whether notifications from `provider` can be accepted at all.
    #[must_use]
    pub fn is_configured(&self, provider: PaymentProvider) -> bool {
        self.secrets.contains_key(&provider)
    }

    /// Check `signature` against the HMAC of `body` under the provider secret.
    ///
    /// # Errors
    /// Returns an `unauthorized` [`Error`] when no secret is configured for
    /// `provider`, when the signature is missing or not hex, or when it does
    /// not match.
    pub fn verify(
        &self,
        provider: PaymentProvider,
        signature: Option<&str>,
        body: &[u8],
    ) -> Result<(), Error> {
        let Some(secret) = self.secrets.get(&provider) else {
            warn!(%provider, "webhook rejected: no secret configured");
            return Err(invalid_signature());
        };
        let Some(signature) = signature else {
            warn!(%provider, "webhook rejected: signature header missing");
            return Err(invalid_signature());
        };
        let hex_digest = signature
            .trim()
            .strip_prefix(SIGNATURE_PREFIX)
            .unwrap_or_else(|| signature.trim());
        let expected = hex::decode(hex_digest).map_err(|_| {
            warn!(%provider, "webhook rejected: signature is not hex");
            invalid_signature()
        })?;
        let mut mac = HmacSha256::new_from_slice(secret)
            .map_err(|_| Error::internal("webhook secret rejected by HMAC"))?;
        mac.update(body);
        mac.verify_slice(&expected).map_err(|_| {
            warn!(%provider, "webhook rejected: signature mismatch");
            invalid_signature()
        })
    }
}

fn invalid_signature() -> Error {
    Error::unauthorized("Invalid webhook signature")
}

/// Hex encoded HMAC-SHA256 of `body` under `secret`, as a provider sends it.
#[must_use]
pub fn sign_payload(secret: &[u8], body: &[u8]) -> String {
    // HMAC accepts keys of any length.
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return String::new();
    };
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}
