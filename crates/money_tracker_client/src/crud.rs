//! Create, edit and delete wallets. Each success reloads the store; the cache is never patched.

use crate::amount::parse_float_or_zero;
use crate::api::WalletApi;
use crate::ids::WalletId;
use crate::models::{Wallet, WalletDraft};
use crate::store::WalletStore;
use crate::workflow::{Confirm, Outcome};

pub const CREATE_FAILED: &str = "Failed to create wallet";
pub const UPDATE_FAILED: &str = "Failed to update wallet";
pub const DELETE_FAILED: &str = "Failed to delete wallet";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this wallet?";

#[derive(Debug, Default)]
pub struct CreateWallet {
    pub draft: WalletDraft,
    open: bool,
}

impl CreateWallet {
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Closes the form; the draft is kept for the next time it opens.
    pub fn cancel(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Initial balance text from the form; unparseable input becomes 0.
    pub fn set_initial_balance(&mut self, text: &str) {
        self.draft.initial_balance = parse_float_or_zero(text);
    }

    pub async fn submit(&mut self, api: &dyn WalletApi, store: &mut WalletStore) -> Outcome {
        if let Err(problem) = self.draft.validate() {
            store.report(problem);
            return Outcome::Invalid;
        }
        let result = api.create_wallet(&self.draft).await;
        match result {
            Ok(created) => {
                tracing::info!(wallet_id = %created.id, name = %created.name, "wallet created");
                store.clear_error();
                self.open = false;
                self.draft = WalletDraft::default();
                store.load(api).await;
                Outcome::Succeeded
            }
            Err(e) => {
                tracing::warn!(error = %e, "create wallet failed");
                store.report(CREATE_FAILED);
                Outcome::Failed
            }
        }
    }
}

/// Edit mode holds a private copy of the wallet being edited, plus the color
/// the server had when editing started.
#[derive(Debug, Default)]
pub struct EditWallet {
    editing: Option<Wallet>,
    saved_color: String,
}

impl EditWallet {
    pub fn open(&mut self, wallet: &Wallet) {
        self.saved_color = wallet.color.clone();
        self.editing = Some(wallet.clone());
    }

    pub fn cancel(&mut self) {
        self.editing = None;
    }

    pub fn is_open(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing(&self) -> Option<&Wallet> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut Wallet> {
        self.editing.as_mut()
    }

    pub async fn submit(&mut self, api: &dyn WalletApi, store: &mut WalletStore) -> Outcome {
        let Some(wallet) = self.editing.as_ref() else {
            return Outcome::Invalid;
        };
        if let Err(problem) = wallet.validate_edit(&self.saved_color) {
            store.report(problem);
            return Outcome::Invalid;
        }
        let result = api.update_wallet(wallet).await;
        match result {
            Ok(updated) => {
                tracing::info!(wallet_id = %updated.id, "wallet updated");
                store.clear_error();
                self.editing = None;
                store.load(api).await;
                Outcome::Succeeded
            }
            Err(e) => {
                tracing::warn!(error = %e, "update wallet failed");
                store.report(UPDATE_FAILED);
                Outcome::Failed
            }
        }
    }
}

/// Asks `confirm` first; a declined prompt sends nothing.
pub async fn delete_wallet(
    api: &dyn WalletApi,
    store: &mut WalletStore,
    wallet_id: WalletId,
    confirm: &dyn Confirm,
) -> Outcome {
    if !confirm.confirm(DELETE_PROMPT) {
        tracing::debug!(%wallet_id, "delete declined");
        return Outcome::Cancelled;
    }
    match api.delete_wallet(wallet_id).await {
        Ok(()) => {
            tracing::info!(%wallet_id, "wallet deleted");
            store.clear_error();
            store.load(api).await;
            Outcome::Succeeded
        }
        Err(e) => {
            tracing::warn!(error = %e, %wallet_id, "delete wallet failed");
            store.report(DELETE_FAILED);
            Outcome::Failed
        }
    }
}
