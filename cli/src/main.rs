//! `money-tracker`: wallets, transfers, balance adjustments and transactions from the terminal.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use money_tracker_client::models::{TransactionKind, TransactionQuery, TransactionUpdate};
use money_tracker_client::{TransactionId, WalletIcon, WalletId, WalletType};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "money-tracker")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API base URL (overrides MONEY_TRACKER_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding the session database (overrides MONEY_TRACKER_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this bearer token instead of the stored session
    #[arg(long, global = true, env = "MONEY_TRACKER_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        username: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        username: String,
        #[arg(long)]
        email: String,
        /// Prompted for (twice) when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List and manage wallets
    Wallets {
        #[command(subcommand)]
        action: Option<WalletCommands>,
    },

    /// Move money from one wallet to another
    Transfer {
        #[arg(long)]
        from: WalletId,
        #[arg(long)]
        to: WalletId,
        /// Parsed like a form field: "12.5abc" sends 12.5, "" sends null
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Set a wallet's balance to an absolute value
    Adjust {
        wallet: WalletId,
        /// New balance (defaults to the current one)
        #[arg(long, allow_hyphen_values = true)]
        balance: Option<String>,
        #[arg(long, default_value = "")]
        reason: String,
    },

    /// Transfer history, newest first
    Transfers {
        #[command(flatten)]
        page: Paging,
    },

    /// Adjustment history of one wallet
    Adjustments {
        wallet: WalletId,
        #[command(flatten)]
        page: Paging,
    },

    /// Balance, totals and recent transactions
    Dashboard,

    /// Spending per category
    Analytics,

    /// List and manage income and expense entries
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionCommands>,
    },
}

#[derive(Subcommand)]
enum TransactionCommands {
    /// Show transactions (default)
    List {
        #[arg(long)]
        category: Option<String>,
        #[command(flatten)]
        page: Paging,
    },

    /// Show one transaction
    Show { id: TransactionId },

    /// Record an income or expense
    Add {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        /// income or expense
        #[arg(long = "type")]
        kind: TransactionKind,
        /// ISO-8601 timestamp (defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// Change a transaction; only the given fields are sent
    Edit {
        id: TransactionId,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "type")]
        kind: Option<TransactionKind>,
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a transaction (always asks first)
    Delete { id: TransactionId },

    /// Categories the server offers
    Categories,
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Show all wallets (default)
    List,

    /// Create a wallet
    Create {
        #[arg(long)]
        name: String,
        #[arg(long = "type", value_parser = parse_wallet_type, default_value = "cash")]
        wallet_type: WalletType,
        #[arg(long, value_parser = parse_wallet_icon, default_value = "wallet")]
        icon: WalletIcon,
        #[arg(long)]
        color: Option<String>,
        /// Unparseable input becomes 0
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Make this the default wallet
        #[arg(long)]
        default: bool,
    },

    /// Change a wallet's details
    Edit {
        wallet: WalletId,
        #[command(flatten)]
        changes: WalletChanges,
    },

    /// Delete a wallet (always asks first)
    Delete { wallet: WalletId },
}

#[derive(Args)]
struct WalletChanges {
    #[arg(long)]
    name: Option<String>,
    #[arg(long = "type", value_parser = parse_wallet_type)]
    wallet_type: Option<WalletType>,
    #[arg(long, value_parser = parse_wallet_icon)]
    icon: Option<WalletIcon>,
    #[arg(long)]
    color: Option<String>,
    /// Empty string removes the description
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    default: Option<bool>,
    #[arg(long)]
    active: Option<bool>,
}

#[derive(Args, Clone, Copy)]
struct Paging {
    #[arg(long, default_value_t = 0)]
    skip: u32,
    #[arg(long, default_value_t = 20)]
    limit: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self { skip: 0, limit: 20 }
    }
}

fn parse_wallet_type(s: &str) -> Result<WalletType, String> {
    s.parse::<WalletType>().map_err(|_| {
        let known: Vec<&str> = WalletType::ALL.iter().map(|t| t.as_str()).collect();
        format!("unknown wallet type {:?} (expected one of {})", s, known.join(", "))
    })
}

fn parse_wallet_icon(s: &str) -> Result<WalletIcon, String> {
    WalletIcon::from_key(s).ok_or_else(|| format!("unknown icon {:?}", s))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "money_tracker_client=info,money_tracker=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let session = commands::Session::open(cli.api_url, cli.data_dir, cli.token)?;

    match cli.command {
        Commands::Login { username, password } => session.login(&username, password).await,
        Commands::Register {
            username,
            email,
            password,
        } => session.register(&username, &email, password).await,
        Commands::Logout => session.logout(),
        Commands::Whoami => session.whoami().await,
        Commands::Wallets { action } => match action.unwrap_or(WalletCommands::List) {
            WalletCommands::List => session.list_wallets().await,
            WalletCommands::Create {
                name,
                wallet_type,
                icon,
                color,
                balance,
                description,
                default,
            } => {
                session
                    .create_wallet(commands::NewWallet {
                        name,
                        wallet_type,
                        icon,
                        color,
                        balance,
                        description,
                        is_default: default,
                    })
                    .await
            }
            WalletCommands::Edit { wallet, changes } => {
                session
                    .edit_wallet(
                        wallet,
                        commands::WalletEdit {
                            name: changes.name,
                            wallet_type: changes.wallet_type,
                            icon: changes.icon,
                            color: changes.color,
                            description: changes.description,
                            is_default: changes.default,
                            is_active: changes.active,
                        },
                    )
                    .await
            }
            WalletCommands::Delete { wallet } => session.delete_wallet(wallet).await,
        },
        Commands::Transfer {
            from,
            to,
            amount,
            description,
        } => session.transfer(from, to, amount, description).await,
        Commands::Adjust {
            wallet,
            balance,
            reason,
        } => session.adjust(wallet, balance, reason).await,
        Commands::Transfers { page } => session.transfers(page.skip, page.limit).await,
        Commands::Adjustments { wallet, page } => {
            session.adjustments(wallet, page.skip, page.limit).await
        }
        Commands::Dashboard => session.dashboard().await,
        Commands::Analytics => session.analytics().await,
        Commands::Transactions { action } => match action.unwrap_or(TransactionCommands::List {
            category: None,
            page: Paging::default(),
        }) {
            TransactionCommands::List { category, page } => {
                session
                    .transactions(TransactionQuery {
                        skip: page.skip,
                        limit: page.limit,
                        category,
                    })
                    .await
            }
            TransactionCommands::Show { id } => session.show_transaction(id).await,
            TransactionCommands::Add {
                amount,
                category,
                description,
                kind,
                date,
            } => {
                session
                    .add_transaction(commands::NewTransaction {
                        amount,
                        category,
                        description,
                        kind,
                        date,
                    })
                    .await
            }
            TransactionCommands::Edit {
                id,
                amount,
                category,
                description,
                kind,
                date,
            } => {
                session
                    .edit_transaction(
                        id,
                        TransactionUpdate {
                            amount,
                            category,
                            description,
                            transaction_type: kind,
                            date,
                        },
                    )
                    .await
            }
            TransactionCommands::Delete { id } => session.delete_transaction(id).await,
            TransactionCommands::Categories => session.categories().await,
        },
    }
}
