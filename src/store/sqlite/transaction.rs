//! Write transactions over a store connection.

use crate::store::StoreResult;
use rusqlite::{Connection, Params, TransactionBehavior};
use tracing::trace;

/// An `IMMEDIATE` transaction on the store's connection.
///
/// Holds the write lock from `begin` on. Anything not committed is rolled
/// back when the value is dropped.
pub struct Transaction<'a> {
    inner: rusqlite::Transaction<'a>,
}

impl<'a> Transaction<'a> {
    pub(crate) fn begin(conn: &'a mut Connection) -> StoreResult<Self> {
        let inner = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        Ok(Self { inner })
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.inner
    }

    pub fn execute(&self, sql: &str, params: impl Params) -> StoreResult<usize> {
        Ok(self.inner.execute(sql, params)?)
    }

    pub fn commit(self) -> StoreResult<()> {
        self.inner.commit()?;
        trace!("store transaction committed");
        Ok(())
    }
}
