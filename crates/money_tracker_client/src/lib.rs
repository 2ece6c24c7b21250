//! Money Tracker client: wallet cache, wallet CRUD, transfers and balance
//! adjustments against the Money Tracker HTTP API. Transactions and account
//! endpoints are plain calls on [`ApiClient`].
//!
//! The server owns every balance. After a successful mutation the client
//! refetches the wallet list instead of patching its cache.

pub mod adjust;
pub mod amount;
pub mod api;
pub mod config;
pub mod credentials;
pub mod crud;
pub mod error;
pub mod ids;
pub mod models;
pub mod page;
pub mod storage;
pub mod store;
pub mod transfer;
pub mod workflow;

pub use amount::{parse_float, AmountPolicy};
pub use api::{ApiClient, WalletApi};
pub use config::ClientConfig;
pub use credentials::{CredentialProvider, StaticToken, StoredToken};
pub use error::{ClientError, Result};
pub use ids::{TransactionId, WalletId};
pub use models::{Wallet, WalletDraft, WalletIcon, WalletType};
pub use page::{Dialog, WalletsPage};
pub use storage::Storage;
pub use store::WalletStore;
pub use workflow::{Confirm, Outcome};
