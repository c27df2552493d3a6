// src/modules/wallet/database.rs
// Wallet persistence: balance and transaction list, both scoped by username

use rusqlite::Result;

use crate::util::database::{Database, StorageKey};
use super::{Transaction, Wallet};

pub trait WalletDatabase {
    /// Users with no stored balance start at `starting_balance` with no history.
    fn load_wallet(&self, username: &str, starting_balance: i64) -> Result<Wallet>;
    fn save_balance(&self, username: &str, balance: i64) -> Result<()>;
    fn save_transactions(&self, username: &str, transactions: &[Transaction]) -> Result<()>;

    fn save_wallet(&self, username: &str, wallet: &Wallet) -> Result<()> {
        self.save_balance(username, wallet.balance())?;
        self.save_transactions(username, wallet.transactions())
    }
}

impl WalletDatabase for Database {
    fn load_wallet(&self, username: &str, starting_balance: i64) -> Result<Wallet> {
        let balance = self
            .get_json::<i64>(&StorageKey::Balance(username.to_string()))?
            .unwrap_or(starting_balance);
        let transactions = self
            .get_json::<Vec<Transaction>>(&StorageKey::Transactions(username.to_string()))?
            .unwrap_or_default();

        Ok(Wallet::from_parts(balance, transactions))
    }

    fn save_balance(&self, username: &str, balance: i64) -> Result<()> {
        self.put_json(&StorageKey::Balance(username.to_string()), &balance)
    }

    fn save_transactions(&self, username: &str, transactions: &[Transaction]) -> Result<()> {
        self.put_json(&StorageKey::Transactions(username.to_string()), &transactions)
    }
}
