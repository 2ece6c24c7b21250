//! Move money between two wallets.
//!
//! The destination list hides the selected source, but picking a new source
//! does not clear an earlier destination; the server rejects same-wallet transfers.

use crate::amount::{parse_float, AmountPolicy};
use crate::api::WalletApi;
use crate::ids::WalletId;
use crate::models::{TransferRequest, Wallet};
use crate::store::WalletStore;
use crate::workflow::{optional_text, Outcome};

pub const TRANSFER_FAILED: &str = "Failed to transfer money";
pub const SELECT_WALLETS: &str = "Select a source and a destination wallet";
pub const INVALID_AMOUNT: &str = "Enter a valid amount";

/// Raw form values; the amount stays text until submission.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransferForm {
    pub from_wallet_id: Option<WalletId>,
    pub to_wallet_id: Option<WalletId>,
    pub amount: String,
    pub description: String,
}

#[derive(Debug, Default)]
pub struct TransferMoney {
    pub form: TransferForm,
    open: bool,
}

impl TransferMoney {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn cancel(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn select_source(&mut self, id: WalletId) {
        self.form.from_wallet_id = Some(id);
    }

    pub fn select_destination(&mut self, id: WalletId) {
        self.form.to_wallet_id = Some(id);
    }

    pub fn destination_options<'a>(&self, store: &'a WalletStore) -> Vec<&'a Wallet> {
        store.destination_options(self.form.from_wallet_id).collect()
    }

    fn request(&self, policy: AmountPolicy) -> Result<TransferRequest, &'static str> {
        let (Some(from), Some(to)) = (self.form.from_wallet_id, self.form.to_wallet_id) else {
            return Err(SELECT_WALLETS);
        };
        let amount = parse_float(&self.form.amount);
        if !policy.admits(amount) {
            return Err(INVALID_AMOUNT);
        }
        if !amount.is_finite() {
            tracing::warn!(raw = %self.form.amount, "sending non-numeric transfer amount");
        }
        Ok(TransferRequest {
            from_wallet_id: from,
            to_wallet_id: to,
            amount,
            description: optional_text(&self.form.description),
        })
    }

    pub async fn submit(
        &mut self,
        api: &dyn WalletApi,
        store: &mut WalletStore,
        policy: AmountPolicy,
    ) -> Outcome {
        let request = match self.request(policy) {
            Ok(r) => r,
            Err(problem) => {
                store.report(problem);
                return Outcome::Invalid;
            }
        };
        let result = api.transfer(&request).await;
        match result {
            Ok(()) => {
                tracing::info!(
                    from = %request.from_wallet_id,
                    to = %request.to_wallet_id,
                    amount = request.amount,
                    "transfer submitted"
                );
                store.clear_error();
                self.open = false;
                self.form = TransferForm::default();
                store.load(api).await;
                Outcome::Succeeded
            }
            Err(e) => {
                tracing::warn!(error = %e, "transfer failed");
                let message = e.detail().unwrap_or(TRANSFER_FAILED).to_string();
                store.report(message);
                Outcome::Failed
            }
        }
    }
}
