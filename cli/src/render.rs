//! Plain-text rendering of the store and the read-only views. Amounts use two decimals.

use std::fmt::Write;

use money_tracker_client::models::{
    parse_timestamp, BalanceAdjustment, CategorySpending, DashboardData, Transaction,
    TransactionKind, User, WalletTransfer,
};
use money_tracker_client::Wallet;

fn money(v: f64) -> String {
    format!("{:.2}", v)
}

fn when(ts: &str) -> String {
    parse_timestamp(ts)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

pub fn wallet_line(w: &Wallet) -> String {
    let mut line = format!(
        "{:>4}  {} {:<24} {:<14} {:>12}",
        w.id,
        w.icon.glyph(),
        w.name,
        w.wallet_type.label(),
        money(w.balance)
    );
    if w.is_default {
        line.push_str("  (default)");
    }
    if !w.is_active {
        line.push_str("  (inactive)");
    }
    line
}

pub fn wallets(list: &[Wallet]) -> String {
    if list.is_empty() {
        return "No wallets yet\n".to_string();
    }
    let mut out = String::new();
    for w in list {
        let _ = writeln!(out, "{}", wallet_line(w));
        if let Some(d) = w.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "          {}", d);
        }
    }
    let total: f64 = list.iter().map(|w| w.balance).sum();
    let _ = writeln!(out, "Total {:>51}", money(total));
    out
}

pub fn transfers(list: &[WalletTransfer]) -> String {
    if list.is_empty() {
        return "No transfers\n".to_string();
    }
    let mut out = String::new();
    for t in list {
        let _ = write!(
            out,
            "{}  {} -> {}  {}",
            when(&t.transfer_date),
            t.from_wallet.name,
            t.to_wallet.name,
            money(t.amount)
        );
        if let Some(d) = t.description.as_deref() {
            let _ = write!(out, "  {}", d);
        }
        out.push('\n');
    }
    out
}

pub fn adjustments(list: &[BalanceAdjustment]) -> String {
    if list.is_empty() {
        return "No adjustments\n".to_string();
    }
    let mut out = String::new();
    for a in list {
        let _ = write!(
            out,
            "{}  {}: {} -> {} ({:+.2})",
            when(&a.adjusted_at),
            a.wallet.name,
            money(a.old_balance),
            money(a.new_balance),
            a.adjustment_amount
        );
        if let Some(r) = a.reason.as_deref() {
            let _ = write!(out, "  {}", r);
        }
        out.push('\n');
    }
    out
}

pub fn dashboard(d: &DashboardData) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Balance         {:>12}", money(d.balance));
    let _ = writeln!(out, "Total income    {:>12}", money(d.total_income));
    let _ = writeln!(out, "Total expenses  {:>12}", money(d.total_expenses));
    let m = &d.monthly_summary;
    let _ = writeln!(
        out,
        "This month      income {}  expenses {}  net {}",
        money(m.income),
        money(m.expenses),
        money(m.net)
    );
    if !d.recent_transactions.is_empty() {
        out.push_str("Recent\n");
    }
    for t in &d.recent_transactions {
        let _ = writeln!(out, "  {}", transaction_line(t));
    }
    out
}

pub fn transaction_line(t: &Transaction) -> String {
    let sign = match t.transaction_type {
        TransactionKind::Income => '+',
        TransactionKind::Expense => '-',
    };
    format!(
        "{:>4}  {}  {}{:<10} {:<16} {}",
        t.id,
        when(&t.date),
        sign,
        money(t.amount),
        t.category,
        t.description
    )
}

pub fn transactions(list: &[Transaction]) -> String {
    if list.is_empty() {
        return "No transactions\n".to_string();
    }
    let mut out = String::new();
    for t in list {
        let _ = writeln!(out, "{}", transaction_line(t));
    }
    let net: f64 = list
        .iter()
        .map(|t| match t.transaction_type {
            TransactionKind::Income => t.amount,
            TransactionKind::Expense => -t.amount,
        })
        .sum();
    let _ = writeln!(out, "Net {:+.2}", net);
    out
}

pub fn user(u: &User) -> String {
    format!("{} <{}> (id {})", u.username, u.email, u.id)
}

pub fn spending(s: &CategorySpending) -> String {
    let total = s.total();
    let mut out = String::new();
    for (category, amount) in s.ranked() {
        let share = if total > 0.0 { amount / total * 100.0 } else { 0.0 };
        let _ = writeln!(out, "{:<16} {:>12} {:>5.1}%", category, money(amount), share);
    }
    let _ = writeln!(out, "{:<16} {:>12}", "Total", money(total));
    out
}
