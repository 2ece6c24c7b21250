//! Data models for wallets, transfers, adjustments and the read-only views.
//! Wire format mirrors the API: integer ids, float amounts, timestamps as strings.
//! Use `parse_timestamp` when a date needs to be shown.

use crate::error::ClientError;
use crate::ids::{TransactionId, WalletId};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::str::FromStr;

pub const MAX_NAME_LEN: usize = 100;

/// Colors the wallet forms offer. The API itself accepts any string.
pub const WALLET_COLORS: [&str; 15] = [
    "#4F46E5", "#7C3AED", "#DC2626", "#EA580C", "#D97706", "#CA8A04", "#65A30D", "#16A34A",
    "#059669", "#0891B2", "#0284C7", "#2563EB", "#4338CA", "#7C2D12", "#A21CAF",
];

pub const DEFAULT_COLOR: &str = WALLET_COLORS[0];

pub fn is_palette_color(color: &str) -> bool {
    WALLET_COLORS.iter().any(|c| c.eq_ignore_ascii_case(color))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WalletType {
    #[default]
    Cash,
    BankAccount,
    CreditCard,
    Savings,
    Investment,
    DigitalWallet,
}

impl WalletType {
    pub const ALL: [WalletType; 6] = [
        WalletType::Cash,
        WalletType::BankAccount,
        WalletType::CreditCard,
        WalletType::Savings,
        WalletType::Investment,
        WalletType::DigitalWallet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WalletType::Cash => "cash",
            WalletType::BankAccount => "bank_account",
            WalletType::CreditCard => "credit_card",
            WalletType::Savings => "savings",
            WalletType::Investment => "investment",
            WalletType::DigitalWallet => "digital_wallet",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WalletType::Cash => "Cash",
            WalletType::BankAccount => "Bank Account",
            WalletType::CreditCard => "Credit Card",
            WalletType::Savings => "Savings",
            WalletType::Investment => "Investment",
            WalletType::DigitalWallet => "Digital Wallet",
        }
    }
}

impl FromStr for WalletType {
    type Err = ClientError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        WalletType::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| ClientError::UnknownValue {
                kind: "wallet type",
                value: s.to_string(),
            })
    }
}

impl std::fmt::Display for WalletType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Key into the fixed icon set. Keys the client does not know deserialize as `Wallet`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum WalletIcon {
    #[default]
    Wallet,
    Cash,
    BankAccount,
    CreditCard,
    Savings,
    Investment,
    DigitalWallet,
}

impl WalletIcon {
    pub const ALL: [WalletIcon; 7] = [
        WalletIcon::Wallet,
        WalletIcon::Cash,
        WalletIcon::BankAccount,
        WalletIcon::CreditCard,
        WalletIcon::Savings,
        WalletIcon::Investment,
        WalletIcon::DigitalWallet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WalletIcon::Wallet => "wallet",
            WalletIcon::Cash => "cash",
            WalletIcon::BankAccount => "bank_account",
            WalletIcon::CreditCard => "credit_card",
            WalletIcon::Savings => "savings",
            WalletIcon::Investment => "investment",
            WalletIcon::DigitalWallet => "digital_wallet",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            WalletIcon::Wallet | WalletIcon::CreditCard => "💳",
            WalletIcon::Cash => "💵",
            WalletIcon::BankAccount => "🏦",
            WalletIcon::Savings => "🏛️",
            WalletIcon::Investment => "📈",
            WalletIcon::DigitalWallet => "📱",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        WalletIcon::ALL.into_iter().find(|i| i.as_str() == s)
    }
}

impl Serialize for WalletIcon {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WalletIcon {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let key = String::deserialize(de)?;
        Ok(WalletIcon::from_key(&key).unwrap_or_default())
    }
}

fn default_true() -> bool {
    true
}

fn validate_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Wallet name is required".to_string());
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(format!("Wallet name must be at most {} characters", MAX_NAME_LEN));
    }
    Ok(())
}

fn validate_color(color: &str) -> Result<(), String> {
    if !is_palette_color(color) {
        return Err(format!("Color {} is not in the wallet palette", color));
    }
    Ok(())
}

/// Wallet as returned by the server. Owned by the server; the client only caches it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub name: String,
    pub wallet_type: WalletType,
    #[serde(default)]
    pub icon: WalletIcon,
    #[serde(default = "default_color")]
    pub color: String,
    pub balance: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Wallet {
    /// Edit-form rules. The name follows the create form; the color must be a
    /// palette entry unless it is still the one the server already holds.
    pub fn validate_edit(&self, saved_color: &str) -> Result<(), String> {
        validate_name(&self.name)?;
        if self.color.eq_ignore_ascii_case(saved_color) {
            return Ok(());
        }
        validate_color(&self.color)
    }
}

/// Create-wallet form state. `Default` is the blank form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalletDraft {
    pub name: String,
    pub wallet_type: WalletType,
    pub icon: WalletIcon,
    pub color: String,
    pub initial_balance: f64,
    pub description: String,
    pub is_default: bool,
}

impl Default for WalletDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            wallet_type: WalletType::Cash,
            icon: WalletIcon::Wallet,
            color: default_color(),
            initial_balance: 0.0,
            description: String::new(),
            is_default: false,
        }
    }
}

impl WalletDraft {
    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.name)?;
        validate_color(&self.color)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransferRequest {
    pub from_wallet_id: WalletId,
    pub to_wallet_id: WalletId,
    /// Non-finite values serialize as `null`.
    pub amount: f64,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BalanceAdjustmentRequest {
    pub wallet_id: WalletId,
    pub new_balance: f64,
    pub reason: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = ClientError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(ClientError::UnknownValue {
                kind: "transaction type",
                value: s.to_string(),
            }),
        }
    }
}

/// Income or expense entry as returned by `/transactions` and the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub transaction_type: TransactionKind,
    pub date: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST /transactions`. `date` is an ISO-8601 timestamp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub transaction_type: TransactionKind,
    pub date: String,
}

/// Body of `PUT /transactions/{id}`. Only the fields that are set are sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl TransactionUpdate {
    pub fn is_empty(&self) -> bool {
        *self == TransactionUpdate::default()
    }
}

/// Query filter for `GET /transactions`.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionQuery {
    pub skip: u32,
    pub limit: u32,
    pub category: Option<String>,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
            category: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub(crate) struct Categories {
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Body of `POST /register`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    #[serde(default)]
    pub income: f64,
    #[serde(default)]
    pub expenses: f64,
    #[serde(default)]
    pub net: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub balance: f64,
    pub total_income: f64,
    pub total_expenses: f64,
    #[serde(default)]
    pub monthly_summary: MonthlySummary,
    #[serde(default)]
    pub recent_transactions: Vec<Transaction>,
}

/// Expense totals per category.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    #[serde(default)]
    pub data: BTreeMap<String, f64>,
}

impl CategorySpending {
    /// Categories sorted by amount, largest first.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut out: Vec<(&str, f64)> = self.data.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        out.sort_by(|a, b| b.1.total_cmp(&a.1));
        out
    }

    pub fn total(&self) -> f64 {
        self.data.values().sum()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalletTransfer {
    pub id: i64,
    pub amount: f64,
    pub description: Option<String>,
    pub transfer_date: String,
    #[serde(default)]
    pub created_at: Option<String>,
    pub from_wallet: Wallet,
    pub to_wallet: Wallet,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceAdjustment {
    pub id: i64,
    pub old_balance: f64,
    pub new_balance: f64,
    pub adjustment_amount: f64,
    pub reason: Option<String>,
    pub adjusted_at: String,
    pub wallet: Wallet,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

/// Server timestamps come either naive (`2024-05-01T10:00:00.123456`) or with an offset.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}
