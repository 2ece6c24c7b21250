//! Reconcile one wallet by setting its balance to an absolute value.

use crate::amount::{parse_float, AmountPolicy};
use crate::api::WalletApi;
use crate::ids::WalletId;
use crate::models::{BalanceAdjustmentRequest, Wallet};
use crate::store::WalletStore;
use crate::transfer::INVALID_AMOUNT;
use crate::workflow::{optional_text, Outcome};

pub const ADJUST_FAILED: &str = "Failed to adjust balance";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdjustmentDraft {
    pub new_balance: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct AdjustBalance {
    pub draft: AdjustmentDraft,
    target: Option<WalletId>,
}

impl AdjustBalance {
    /// Pre-fills the target balance with the wallet's current one. A reason typed earlier is kept.
    pub fn open(&mut self, wallet: &Wallet) {
        self.target = Some(wallet.id);
        self.draft.new_balance = wallet.balance.to_string();
    }

    pub fn cancel(&mut self) {
        self.target = None;
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<WalletId> {
        self.target
    }

    pub async fn submit(
        &mut self,
        api: &dyn WalletApi,
        store: &mut WalletStore,
        policy: AmountPolicy,
    ) -> Outcome {
        let Some(wallet_id) = self.target else {
            return Outcome::Invalid;
        };
        let new_balance = parse_float(&self.draft.new_balance);
        if !policy.admits(new_balance) {
            store.report(INVALID_AMOUNT);
            return Outcome::Invalid;
        }
        if !new_balance.is_finite() {
            tracing::warn!(raw = %self.draft.new_balance, "sending non-numeric balance");
        }
        let request = BalanceAdjustmentRequest {
            wallet_id,
            new_balance,
            reason: optional_text(&self.draft.reason),
        };

        let result = api.adjust_balance(&request).await;
        match result {
            Ok(()) => {
                tracing::info!(%wallet_id, new_balance, "balance adjusted");
                store.clear_error();
                self.target = None;
                self.draft = AdjustmentDraft::default();
                store.load(api).await;
                Outcome::Succeeded
            }
            Err(e) => {
                tracing::warn!(error = %e, %wallet_id, "adjust balance failed");
                store.report(ADJUST_FAILED);
                Outcome::Failed
            }
        }
    }
}
