//! Withdraw funds from an organizer's balance.

use std::sync::Arc;

use mockable::Clock;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::ports::WalletRepository;
use crate::domain::service_support::{map_money_error, map_wallet_repository_error};
use crate::domain::{Currency, Error, Money, UserId, Withdrawal};

/// Recorded withdrawal and the balance left afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawBalanceOutput {
    /// Recorded withdrawal.
    pub withdrawal: Withdrawal,
    /// Balance left afterwards.
    pub remaining: Money,
}

/// Moves funds out of an organizer's balance.
pub struct WithdrawBalance<W> {
    wallet: Arc<W>,
    clock: Arc<dyn Clock>,
}

impl<W> WithdrawBalance<W> {
    /// Use case over the wallet repository.
    pub fn new(wallet: Arc<W>, clock: Arc<dyn Clock>) -> Self {
        Self { wallet, clock }
    }
}

impl<W> WithdrawBalance<W>
where
    W: WalletRepository,
{
    /// Withdraw from an organizer balance.
    pub async fn execute(
        &self,
        organizer_id: UserId,
        amount: Decimal,
        currency: Currency,
    ) -> Result<WithdrawBalanceOutput, Error> {
        let requested = Money::new(amount, currency).map_err(map_money_error)?;
        if requested.is_zero() {
            return Err(Error::invalid_request(
                "Withdrawal amount must be greater than zero",
            ));
        }
        let balance = self
            .wallet
            .organizer_balance(&organizer_id, requested.currency())
            .await
            .map_err(map_wallet_repository_error)?;
        if !balance.covers(&requested).map_err(map_money_error)? {
            return Err(Error::invalid_request("Insufficient balance"));
        }
        let remaining = balance.subtract(&requested).map_err(map_money_error)?;

        let withdrawal = Withdrawal::new(organizer_id, requested, self.clock.utc());
        self.wallet
            .withdraw(&withdrawal)
            .await
            .map_err(map_wallet_repository_error)?;
        info!(
            withdrawal_id = %withdrawal.id,
            organizer_id = %organizer_id,
            amount = %withdrawal.amount,
            "balance withdrawn"
        );
        Ok(WithdrawBalanceOutput {
            withdrawal,
            remaining,
        })
    }
}
