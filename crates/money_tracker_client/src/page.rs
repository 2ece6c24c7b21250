//! The wallets screen: one store, four dialogs, at most one dialog open.

use crate::adjust::{AdjustBalance, AdjustmentDraft};
use crate::amount::AmountPolicy;
use crate::api::WalletApi;
use crate::crud::{self, CreateWallet, EditWallet};
use crate::ids::WalletId;
use crate::models::{Wallet, WalletDraft};
use crate::store::WalletStore;
use crate::transfer::{TransferForm, TransferMoney};
use crate::workflow::{Confirm, Outcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialog {
    Closed,
    Create,
    Edit,
    Transfer,
    Adjust,
}

pub struct WalletsPage<A: WalletApi> {
    api: A,
    store: WalletStore,
    create: CreateWallet,
    edit: EditWallet,
    transfer: TransferMoney,
    adjust: AdjustBalance,
    amount_policy: AmountPolicy,
}

impl<A: WalletApi> WalletsPage<A> {
    pub fn new(api: A, amount_policy: AmountPolicy) -> Self {
        Self {
            api,
            store: WalletStore::new(),
            create: CreateWallet::default(),
            edit: EditWallet::default(),
            transfer: TransferMoney::default(),
            adjust: AdjustBalance::default(),
            amount_policy,
        }
    }

    pub fn store(&self) -> &WalletStore {
        &self.store
    }

    pub async fn refresh(&mut self) {
        self.store.load(&self.api).await;
    }

    pub fn dialog(&self) -> Dialog {
        if self.create.is_open() {
            Dialog::Create
        } else if self.edit.is_open() {
            Dialog::Edit
        } else if self.transfer.is_open() {
            Dialog::Transfer
        } else if self.adjust.is_open() {
            Dialog::Adjust
        } else {
            Dialog::Closed
        }
    }

    /// Closes whatever is open. Drafts stay as typed, like the dialogs do on cancel.
    pub fn close_dialog(&mut self) {
        self.create.cancel();
        self.edit.cancel();
        self.transfer.cancel();
        self.adjust.cancel();
    }

    pub fn open_create(&mut self) -> &mut WalletDraft {
        self.close_dialog();
        self.create.open();
        &mut self.create.draft
    }

    /// `None` when the wallet is not in the cache.
    pub fn open_edit(&mut self, id: WalletId) -> Option<&mut Wallet> {
        let wallet = self.store.wallet(id)?.clone();
        self.close_dialog();
        self.edit.open(&wallet);
        self.edit.editing_mut()
    }

    pub fn open_transfer(&mut self) -> &mut TransferForm {
        self.close_dialog();
        self.transfer.open();
        &mut self.transfer.form
    }

    pub fn open_adjust(&mut self, id: WalletId) -> Option<&mut AdjustmentDraft> {
        let wallet = self.store.wallet(id)?.clone();
        self.close_dialog();
        self.adjust.open(&wallet);
        Some(&mut self.adjust.draft)
    }

    pub fn create_form(&mut self) -> &mut CreateWallet {
        &mut self.create
    }

    pub fn transfer_form(&mut self) -> &mut TransferMoney {
        &mut self.transfer
    }

    pub fn transfer_destinations(&self) -> Vec<&Wallet> {
        self.transfer.destination_options(&self.store)
    }

    pub fn editing(&self) -> Option<&Wallet> {
        self.edit.editing()
    }

    pub fn adjusting(&self) -> Option<WalletId> {
        self.adjust.target()
    }

    pub async fn submit_create(&mut self) -> Outcome {
        self.create.submit(&self.api, &mut self.store).await
    }

    pub async fn submit_edit(&mut self) -> Outcome {
        self.edit.submit(&self.api, &mut self.store).await
    }

    pub async fn submit_transfer(&mut self) -> Outcome {
        self.transfer
            .submit(&self.api, &mut self.store, self.amount_policy)
            .await
    }

    pub async fn submit_adjust(&mut self) -> Outcome {
        self.adjust
            .submit(&self.api, &mut self.store, self.amount_policy)
            .await
    }

    pub async fn delete(&mut self, id: WalletId, confirm: &dyn Confirm) -> Outcome {
        crud::delete_wallet(&self.api, &mut self.store, id, confirm).await
    }
}
