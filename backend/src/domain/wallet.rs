//! Organizer balances and withdrawals.

use chrono::{DateTime, Utc};

use super::{Money, UserId, WithdrawalId};

/// Funds taken out of an organizer's balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdrawal {
    /// Withdrawal identifier.
    pub id: WithdrawalId,
    /// Organizer taking the funds.
    pub organizer_id: UserId,
    /// Amount taken out.
    pub amount: Money,
    /// When the withdrawal was recorded.
    pub created_at: DateTime<Utc>,
}

impl Withdrawal {
    /// Record a withdrawal requested at `now`.
    pub fn new(organizer_id: UserId, amount: Money, now: DateTime<Utc>) -> Self {
        Self {
            id: WithdrawalId::random(),
            organizer_id,
            amount,
            created_at: now,
        }
    }
}
