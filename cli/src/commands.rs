use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dialoguer::{Confirm, Password};
use money_tracker_client::models::{
    NewUser, TransactionDraft, TransactionKind, TransactionQuery, TransactionUpdate,
};
use money_tracker_client::storage::USERNAME_KEY;
use money_tracker_client::{
    ApiClient, ClientConfig, CredentialProvider, Outcome, StaticToken, Storage, StoredToken,
    TransactionId, WalletIcon, WalletId, WalletType, WalletsPage,
};
use tracing::{info, warn};

use crate::render;

/// Resolved configuration plus the session database, shared by every subcommand.
pub struct Session {
    config: ClientConfig,
    storage: Arc<Storage>,
    token_override: Option<String>,
}

pub struct NewWallet {
    pub name: String,
    pub wallet_type: WalletType,
    pub icon: WalletIcon,
    pub color: Option<String>,
    pub balance: String,
    pub description: String,
    pub is_default: bool,
}

/// Only the fields that were given on the command line change.
pub struct WalletEdit {
    pub name: Option<String>,
    pub wallet_type: Option<WalletType>,
    pub icon: Option<WalletIcon>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub is_default: Option<bool>,
    pub is_active: Option<bool>,
}

pub struct NewTransaction {
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub kind: TransactionKind,
    /// Defaults to the local time now.
    pub date: Option<String>,
}

pub const TRANSACTION_DELETE_PROMPT: &str = "Are you sure you want to delete this transaction?";

fn now_local() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn exit_status(outcome: Outcome) -> u8 {
    match outcome {
        Outcome::Succeeded | Outcome::Cancelled => 0,
        Outcome::Failed => 1,
        Outcome::Invalid => 2,
    }
}

/// Prints the refreshed wallet list, or the store's error, after a workflow ran.
fn finish(page: &WalletsPage<ApiClient>, outcome: Outcome, done: &str) -> ExitCode {
    match outcome {
        Outcome::Succeeded => {
            println!("{}", done);
            print!("{}", render::wallets(page.store().wallets()));
        }
        Outcome::Cancelled => println!("Cancelled"),
        Outcome::Failed | Outcome::Invalid => {
            if let Some(message) = page.store().error() {
                eprintln!("Error: {}", message);
            }
        }
    }
    ExitCode::from(exit_status(outcome))
}

/// Asks on the terminal; a failed prompt (no tty, Ctrl-C) counts as "no".
fn ask(prompt: &str) -> bool {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or_else(|e| {
            warn!(error = %e, "confirmation prompt failed");
            false
        })
}

impl Session {
    pub fn open(
        api_url: Option<String>,
        data_dir: Option<PathBuf>,
        token_override: Option<String>,
    ) -> Result<Self> {
        let mut config = ClientConfig::from_env().context("loading configuration")?;
        if let Some(url) = api_url {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        let storage = Storage::open(&config.data_dir)
            .with_context(|| format!("opening session storage in {}", config.data_dir.display()))?;
        info!(api = %config.api_base_url, "money tracker client ready");
        Ok(Self {
            config,
            storage: Arc::new(storage),
            token_override,
        })
    }

    fn client(&self) -> Result<ApiClient> {
        let credentials: Arc<dyn CredentialProvider> = match &self.token_override {
            Some(token) => Arc::new(StaticToken(token.clone())),
            None => Arc::new(StoredToken::new(self.storage.clone())),
        };
        Ok(ApiClient::new(&self.config, credentials)?)
    }

    /// A page with its first load done. A failed load is fatal for the command.
    async fn page(&self) -> Result<WalletsPage<ApiClient>> {
        let mut page = WalletsPage::new(self.client()?, self.config.amount_policy);
        page.refresh().await;
        if let Some(message) = page.store().error() {
            bail!("{}", message);
        }
        Ok(page)
    }

    pub async fn login(&self, username: &str, password: Option<String>) -> Result<ExitCode> {
        let password = match password {
            Some(p) => p,
            None => Password::new().with_prompt("Password").interact()?,
        };
        let token = self
            .client()?
            .login(username, &password)
            .await
            .context("login failed")?;
        self.storage.save_session(username, &token.access_token)?;
        info!(username, "logged in");
        println!("Logged in as {}", username);
        Ok(ExitCode::SUCCESS)
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: Option<String>,
    ) -> Result<ExitCode> {
        let password = match password {
            Some(p) => p,
            None => Password::new()
                .with_prompt("Password")
                .with_confirmation("Repeat password", "Passwords do not match")
                .interact()?,
        };
        let user = self
            .client()?
            .register(&NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password,
            })
            .await
            .context("registration failed")?;
        info!(username = %user.username, "registered");
        println!("Registered {}", render::user(&user));
        println!("Log in with: money-tracker login {}", user.username);
        Ok(ExitCode::SUCCESS)
    }

    pub async fn whoami(&self) -> Result<ExitCode> {
        let user = self.client()?.me().await?;
        println!("{}", render::user(&user));
        Ok(ExitCode::SUCCESS)
    }

    pub fn logout(&self) -> Result<ExitCode> {
        let username = self.storage.config_get(USERNAME_KEY)?;
        self.storage.clear_session()?;
        match username {
            Some(name) => println!("Logged out {}", name),
            None => println!("No session stored"),
        }
        Ok(ExitCode::SUCCESS)
    }

    pub async fn list_wallets(&self) -> Result<ExitCode> {
        let page = self.page().await?;
        print!("{}", render::wallets(page.store().wallets()));
        Ok(ExitCode::SUCCESS)
    }

    pub async fn create_wallet(&self, new: NewWallet) -> Result<ExitCode> {
        let mut page = self.page().await?;
        let draft = page.open_create();
        draft.name = new.name;
        draft.wallet_type = new.wallet_type;
        draft.icon = new.icon;
        if let Some(color) = new.color {
            draft.color = color;
        }
        draft.description = new.description;
        draft.is_default = new.is_default;
        page.create_form().set_initial_balance(&new.balance);

        let outcome = page.submit_create().await;
        Ok(finish(&page, outcome, "Wallet created"))
    }

    pub async fn edit_wallet(&self, id: WalletId, edit: WalletEdit) -> Result<ExitCode> {
        let mut page = self.page().await?;
        let Some(wallet) = page.open_edit(id) else {
            bail!("Wallet {} not found", id);
        };
        if let Some(name) = edit.name {
            wallet.name = name;
        }
        if let Some(t) = edit.wallet_type {
            wallet.wallet_type = t;
        }
        if let Some(icon) = edit.icon {
            wallet.icon = icon;
        }
        if let Some(color) = edit.color {
            wallet.color = color;
        }
        if let Some(description) = edit.description {
            wallet.description = (!description.trim().is_empty()).then_some(description);
        }
        if let Some(is_default) = edit.is_default {
            wallet.is_default = is_default;
        }
        if let Some(is_active) = edit.is_active {
            wallet.is_active = is_active;
        }

        let outcome = page.submit_edit().await;
        Ok(finish(&page, outcome, "Wallet updated"))
    }

    pub async fn delete_wallet(&self, id: WalletId) -> Result<ExitCode> {
        let mut page = self.page().await?;
        let Some(wallet) = page.store().wallet(id) else {
            bail!("Wallet {} not found", id);
        };
        println!("{}", render::wallet_line(wallet));
        let outcome = page.delete(id, &ask).await;
        Ok(finish(&page, outcome, "Wallet deleted"))
    }

    pub async fn transfer(
        &self,
        from: WalletId,
        to: WalletId,
        amount: String,
        description: String,
    ) -> Result<ExitCode> {
        let mut page = self.page().await?;
        page.open_transfer();
        let transfer = page.transfer_form();
        transfer.select_source(from);
        transfer.select_destination(to);
        transfer.form.amount = amount;
        transfer.form.description = description;

        let outcome = page.submit_transfer().await;
        Ok(finish(&page, outcome, "Transfer completed"))
    }

    pub async fn adjust(
        &self,
        id: WalletId,
        balance: Option<String>,
        reason: String,
    ) -> Result<ExitCode> {
        let mut page = self.page().await?;
        let Some(draft) = page.open_adjust(id) else {
            bail!("Wallet {} not found", id);
        };
        if let Some(balance) = balance {
            draft.new_balance = balance;
        }
        draft.reason = reason;

        let outcome = page.submit_adjust().await;
        Ok(finish(&page, outcome, "Balance adjusted"))
    }

    pub async fn transfers(&self, skip: u32, limit: u32) -> Result<ExitCode> {
        let transfers = self.client()?.list_transfers(skip, limit).await?;
        print!("{}", render::transfers(&transfers));
        Ok(ExitCode::SUCCESS)
    }

    pub async fn adjustments(&self, id: WalletId, skip: u32, limit: u32) -> Result<ExitCode> {
        let adjustments = self.client()?.list_adjustments(id, skip, limit).await?;
        print!("{}", render::adjustments(&adjustments));
        Ok(ExitCode::SUCCESS)
    }

    pub async fn dashboard(&self) -> Result<ExitCode> {
        let data = self.client()?.dashboard().await?;
        print!("{}", render::dashboard(&data));
        Ok(ExitCode::SUCCESS)
    }

    pub async fn analytics(&self) -> Result<ExitCode> {
        let spending = self.client()?.category_spending().await?;
        print!("{}", render::spending(&spending));
        Ok(ExitCode::SUCCESS)
    }

    pub async fn transactions(&self, query: TransactionQuery) -> Result<ExitCode> {
        let list = self.client()?.list_transactions(&query).await?;
        print!("{}", render::transactions(&list));
        Ok(ExitCode::SUCCESS)
    }

    pub async fn show_transaction(&self, id: TransactionId) -> Result<ExitCode> {
        let t = self.client()?.transaction(id).await?;
        println!("{}", render::transaction_line(&t));
        Ok(ExitCode::SUCCESS)
    }

    pub async fn add_transaction(&self, new: NewTransaction) -> Result<ExitCode> {
        let draft = TransactionDraft {
            amount: new.amount,
            category: new.category,
            description: new.description,
            transaction_type: new.kind,
            date: new.date.unwrap_or_else(now_local),
        };
        let created = self
            .client()?
            .create_transaction(&draft)
            .await
            .context("Failed to create transaction")?;
        println!("Transaction created");
        println!("{}", render::transaction_line(&created));
        Ok(ExitCode::SUCCESS)
    }

    pub async fn edit_transaction(
        &self,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> Result<ExitCode> {
        if update.is_empty() {
            eprintln!("Nothing to change");
            return Ok(ExitCode::from(exit_status(Outcome::Invalid)));
        }
        let updated = self
            .client()?
            .update_transaction(id, &update)
            .await
            .context("Failed to update transaction")?;
        println!("Transaction updated");
        println!("{}", render::transaction_line(&updated));
        Ok(ExitCode::SUCCESS)
    }

    pub async fn delete_transaction(&self, id: TransactionId) -> Result<ExitCode> {
        let client = self.client()?;
        let t = client.transaction(id).await?;
        println!("{}", render::transaction_line(&t));
        if !ask(TRANSACTION_DELETE_PROMPT) {
            println!("Cancelled");
            return Ok(ExitCode::from(exit_status(Outcome::Cancelled)));
        }
        client
            .delete_transaction(id)
            .await
            .context("Failed to delete transaction")?;
        println!("Transaction deleted");
        Ok(ExitCode::SUCCESS)
    }

    pub async fn categories(&self) -> Result<ExitCode> {
        for category in self.client()?.categories().await? {
            println!("{}", category);
        }
        Ok(ExitCode::SUCCESS)
    }
}
