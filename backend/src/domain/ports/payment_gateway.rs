//! Port for external payment providers and a registry selecting between them.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Charge, ChargeRequest, PaymentNotification, PaymentProvider};

use super::define_port_error;

define_port_error! {
    /// Failures raised by payment gateway adapters.
    pub enum PaymentGatewayError {
        /// The provider could not be reached.
        Unavailable { message: String } => "payment provider unavailable: {message}",
        /// The provider refused the charge.
        Rejected { message: String } => "payment rejected: {message}",
        /// A notification payload could not be understood.
        InvalidNotification { message: String } => "invalid payment notification: {message}",
    }
}

/// Port to an external payment provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Provider this gateway talks to.
    fn provider(&self) -> PaymentProvider;

    /// Create a charge for a pending transaction.
    async fn create_charge(&self, request: &ChargeRequest) -> Result<Charge, PaymentGatewayError>;

    /// Normalise a webhook payload sent by the provider.
    fn parse_notification(&self, payload: &Value)
    -> Result<PaymentNotification, PaymentGatewayError>;
}

/// Configured gateways keyed by provider, with a default for checkouts.
#[derive(Clone)]
pub struct PaymentGateways {
    default_provider: PaymentProvider,
    gateways: HashMap<PaymentProvider, Arc<dyn PaymentGateway>>,
}

impl PaymentGateways {
    /// Create a registry whose default provider is `default_provider`.
    pub fn new(default_provider: PaymentProvider) -> Self {
        Self {
            default_provider,
            gateways: HashMap::new(),
        }
    }

    /// Register a gateway under the provider it reports.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateways.insert(gateway.provider(), gateway);
        self
    }

    /// Provider used when checkout names none.
    pub fn default_provider(&self) -> PaymentProvider {
        self.default_provider
    }

    /// Gateway for `provider`, or the default when `None`.
    pub fn resolve(&self, provider: Option<PaymentProvider>) -> Option<Arc<dyn PaymentGateway>> {
        self.gateways
            .get(&provider.unwrap_or(self.default_provider))
            .cloned()
    }
}

impl std::fmt::Debug for PaymentGateways {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut providers: Vec<_> = self.gateways.keys().map(|p| p.as_str()).collect();
        providers.sort_unstable();
        f.debug_struct("PaymentGateways")
            .field("default_provider", &self.default_provider)
            .field("providers", &providers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn gateway(provider: PaymentProvider) -> Arc<dyn PaymentGateway> {
        let mut mock = MockPaymentGateway::new();
        mock.expect_provider().return_const(provider);
        Arc::new(mock)
    }

    #[rstest]
    #[case(None, Some(PaymentProvider::Zoop))]
    #[case(Some(PaymentProvider::Paypal), Some(PaymentProvider::Paypal))]
    fn resolves_registered_gateways(
        #[case] requested: Option<PaymentProvider>,
        #[case] expected: Option<PaymentProvider>,
    ) {
        let gateways = PaymentGateways::new(PaymentProvider::Zoop)
            .with_gateway(gateway(PaymentProvider::Zoop))
            .with_gateway(gateway(PaymentProvider::Paypal));
        let resolved = gateways.resolve(requested).map(|g| g.provider());
        assert_eq!(resolved, expected);
    }

    #[rstest]
    fn missing_gateway_resolves_to_none() {
        let gateways = PaymentGateways::new(PaymentProvider::Paypal)
            .with_gateway(gateway(PaymentProvider::Zoop));
        assert!(gateways.resolve(None).is_none());
    }
}
