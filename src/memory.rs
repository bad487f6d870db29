//! In-memory tables backing the store traits in tests.

use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::{StoreError, StoreResult};

pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn created_at(&self) -> OffsetDateTime;
    /// Value covered by the table's unique index, if it has one.
    fn unique_key(&self) -> Option<&str> {
        None
    }
}

pub struct MemoryTable<T> {
    rows: RwLock<Vec<T>>,
    constraint: &'static str,
}

impl<T: Record> MemoryTable<T> {
    pub fn new(constraint: &'static str) -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            constraint,
        }
    }

    /// Newest first; rows created at the same instant keep reverse insertion order.
    pub async fn list(&self) -> Vec<T> {
        let mut rows: Vec<T> = self.rows.read().await.iter().rev().cloned().collect();
        rows.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        rows
    }

    pub async fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.read().await.iter().find(|r| pred(r)).cloned()
    }

    pub async fn keys_where(&self, pred: impl Fn(&T) -> bool) -> Vec<String> {
        self.rows
            .read()
            .await
            .iter()
            .filter(|r| pred(r))
            .filter_map(|r| r.unique_key().map(str::to_string))
            .collect()
    }

    pub async fn insert(&self, row: T) -> StoreResult<T> {
        let mut rows = self.rows.write().await;
        self.check_unique(&rows, &row, None)?;
        rows.push(row.clone());
        Ok(row)
    }

    pub async fn replace(&self, id: Uuid, update: impl FnOnce(&T) -> T) -> StoreResult<Option<T>> {
        let mut rows = self.rows.write().await;
        let Some(pos) = rows.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };
        let next = update(&rows[pos]);
        self.check_unique(&rows, &next, Some(id))?;
        rows[pos] = next.clone();
        Ok(Some(next))
    }

    pub async fn delete(&self, id: Uuid) -> bool {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.id() != id);
        rows.len() != before
    }

    fn check_unique(&self, rows: &[T], row: &T, skip: Option<Uuid>) -> StoreResult<()> {
        let Some(key) = row.unique_key() else {
            return Ok(());
        };
        let clash = rows
            .iter()
            .filter(|r| Some(r.id()) != skip)
            .any(|r| r.unique_key() == Some(key));
        if clash {
            return Err(StoreError::Conflict {
                constraint: self.constraint.to_string(),
            });
        }
        Ok(())
    }
}
