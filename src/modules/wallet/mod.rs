// src/modules/wallet/mod.rs

pub mod database;
pub use database::WalletDatabase;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{JugaadError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Success,
    Pending,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Success => "success",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub description: String,
    pub amount: i64,
    pub status: TransactionStatus,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    fn new(kind: TransactionKind, amount: i64, description: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: short_token(),
            kind,
            description: description.to_string(),
            amount,
            status: TransactionStatus::Success,
            timestamp: now,
        }
    }

    /// `+₹80` / `-₹80`
    pub fn signed_display(&self) -> String {
        match self.kind {
            TransactionKind::Credit => format!("+₹{}", self.amount),
            TransactionKind::Debit => format!("-₹{}", self.amount),
        }
    }
}

/// Random, not sequence-checked.
fn short_token() -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    format!("TXN-{}", raw[..8].to_uppercase())
}

/// Balance plus an append-only, newest-first transaction list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Wallet {
    balance: i64,
    transactions: Vec<Transaction>,
}

impl Wallet {
    pub fn new(balance: i64) -> Self {
        Self { balance, transactions: Vec::new() }
    }

    pub fn from_parts(balance: i64, transactions: Vec<Transaction>) -> Self {
        Self { balance, transactions }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn can_afford(&self, amount: i64) -> bool {
        amount <= self.balance
    }

    /// Skips the affordability check; callers wanting an insufficiency error check `can_afford` first.
    pub fn debit(&mut self, amount: i64, description: &str, now: DateTime<Utc>) -> Result<&Transaction> {
        self.balance = self.balance.checked_sub(amount).ok_or(JugaadError::AmountOverflow {
            amount,
            balance: self.balance,
        })?;
        Ok(self.push(Transaction::new(TransactionKind::Debit, amount, description, now)))
    }

    pub fn credit(&mut self, amount: i64, description: &str, now: DateTime<Utc>) -> Result<&Transaction> {
        self.balance = self.checked_credit(amount)?;
        Ok(self.push(Transaction::new(TransactionKind::Credit, amount, description, now)))
    }

    /// The balance after crediting `amount`, without touching the wallet.
    pub fn checked_credit(&self, amount: i64) -> Result<i64> {
        self.balance.checked_add(amount).ok_or(JugaadError::AmountOverflow {
            amount,
            balance: self.balance,
        })
    }

    pub fn withdraw(&mut self, amount: i64, now: DateTime<Utc>) -> Result<&Transaction> {
        if !self.can_afford(amount) {
            return Err(JugaadError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        self.debit(amount, "Withdrawal to Bank", now)
    }

    pub fn deposit(&mut self, amount: i64, now: DateTime<Utc>) -> Result<&Transaction> {
        self.credit(amount, "Added Money", now)
    }

    fn push(&mut self, txn: Transaction) -> &Transaction {
        self.transactions.insert(0, txn);
        &self.transactions[0]
    }
}
