//! Client-side wallet cache and the shared error message.
//!
//! `load` is the only way the cached list changes: mutations never patch it,
//! they ask for a reload so the server's derived balances are what we show.

use crate::api::WalletApi;
use crate::ids::WalletId;
use crate::models::Wallet;

pub const FETCH_FAILED: &str = "Failed to fetch wallets";

#[derive(Debug)]
pub struct WalletStore {
    wallets: Vec<Wallet>,
    loading: bool,
    error: Option<String>,
}

impl Default for WalletStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletStore {
    /// Starts in the loading state, before the first fetch.
    pub fn new() -> Self {
        Self {
            wallets: Vec::new(),
            loading: true,
            error: None,
        }
    }

    pub async fn load(&mut self, api: &dyn WalletApi) {
        match api.list_wallets().await {
            Ok(wallets) => {
                tracing::debug!(count = wallets.len(), "wallets loaded");
                self.wallets = wallets;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "fetch wallets failed");
                self.error = Some(FETCH_FAILED.to_string());
            }
        }
        self.loading = false;
    }

    pub fn wallets(&self) -> &[Wallet] {
        &self.wallets
    }

    pub fn wallet(&self, id: WalletId) -> Option<&Wallet> {
        self.wallets.iter().find(|w| w.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Wallets a transfer can go to, given the current source selection.
    pub fn destination_options(&self, source: Option<WalletId>) -> impl Iterator<Item = &Wallet> {
        self.wallets.iter().filter(move |w| Some(w.id) != source)
    }

    pub(crate) fn report(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }
}
