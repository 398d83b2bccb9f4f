//! In-memory transaction store.
//!
//! The store exclusively owns the raw records; every derived view is
//! recomputed from a snapshot. Mutation entry points serialize against
//! concurrent reads through an `RwLock` — single writer, multiple readers —
//! and readers clone a snapshot so analytics never compute under the lock.

use std::sync::RwLock;

use harvestlab_core::domain::Transaction;

/// Thread-safe in-memory transaction store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Vec<Transaction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            inner: RwLock::new(transactions),
        }
    }

    /// Append a single record.
    pub fn add(&self, transaction: Transaction) {
        self.write().push(transaction);
    }

    /// Append a batch of records. Returns the number imported.
    pub fn import(&self, transactions: Vec<Transaction>) -> usize {
        let count = transactions.len();
        self.write().extend(transactions);
        count
    }

    /// Remove every record carrying the given invoice number. Invoice
    /// numbers are not guaranteed unique, so this can remove several rows.
    /// Returns the number removed.
    pub fn delete_invoice(&self, invoice_number: &str) -> usize {
        let mut guard = self.write();
        let before = guard.len();
        guard.retain(|tx| tx.invoice_number != invoice_number);
        before - guard.len()
    }

    /// Remove all records.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Clone the current records for read-side analytics.
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Poisoning only happens if a writer panicked mid-mutation; the data is
    // plain records with no intermediate invalid state, so recover the guard.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Transaction>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Transaction>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}
