use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use tokio::sync::Mutex;

use models::counter;

use super::{store::CounterStore, Counter};
use crate::errors::CounterError;

/// Database-backed store. Every mutation runs as one transaction guarded by a
/// per-name mutex, so two writers on the same name cannot interleave their
/// read-then-write sequences (lost-update prevention).
pub struct SeaOrmCounterStore {
    db: DatabaseConnection,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SeaOrmCounterStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, locks: Mutex::new(HashMap::new()) }
    }

    /// Lock registry entry for `name`, created on first use. Entries are a
    /// few words each and are not reclaimed; the registry grows with the set
    /// of distinct names seen by this process.
    async fn name_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(name.to_owned()).or_default())
    }
}

fn db_err(e: sea_orm::DbErr) -> CounterError {
    CounterError::Db(e.to_string())
}

#[async_trait]
impl CounterStore for SeaOrmCounterStore {
    async fn create(&self, name: &str, initial: i64) -> Result<Counter, CounterError> {
        let lock = self.name_lock(name).await;
        let _guard = lock.lock().await;

        let txn = self.db.begin().await.map_err(db_err)?;
        if let Some(existing) = counter::Entity::find_by_id(name.to_owned())
            .one(&txn)
            .await
            .map_err(db_err)?
        {
            txn.rollback().await.map_err(db_err)?;
            return Err(CounterError::AlreadyExists { name: existing.name, value: existing.value });
        }
        let am = counter::ActiveModel { name: Set(name.to_owned()), value: Set(initial) };
        let inserted = am.insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(Counter { name: inserted.name, value: inserted.value })
    }

    async fn get(&self, name: &str) -> Result<Counter, CounterError> {
        // Single read statement, no lock: there is no write to serialize against.
        match counter::find_by_name(&self.db, name).await? {
            Some(m) => Ok(Counter { name: m.name, value: m.value }),
            None => Err(CounterError::NotFound { name: name.to_owned() }),
        }
    }

    async fn increment(&self, name: &str) -> Result<Counter, CounterError> {
        let lock = self.name_lock(name).await;
        let _guard = lock.lock().await;

        let txn = self.db.begin().await.map_err(db_err)?;
        let updated = match counter::Entity::find_by_id(name.to_owned())
            .one(&txn)
            .await
            .map_err(db_err)?
        {
            Some(existing) => {
                let next = existing.value.wrapping_add(1);
                let mut am: counter::ActiveModel = existing.into();
                am.value = Set(next);
                am.update(&txn).await.map_err(db_err)?
            }
            None => {
                let am = counter::ActiveModel { name: Set(name.to_owned()), value: Set(1) };
                am.insert(&txn).await.map_err(db_err)?
            }
        };
        txn.commit().await.map_err(db_err)?;
        Ok(Counter { name: updated.name, value: updated.value })
    }

    async fn delete(&self, name: &str) -> Result<(), CounterError> {
        let lock = self.name_lock(name).await;
        let _guard = lock.lock().await;

        let txn = self.db.begin().await.map_err(db_err)?;
        if counter::Entity::find_by_id(name.to_owned())
            .one(&txn)
            .await
            .map_err(db_err)?
            .is_none()
        {
            txn.rollback().await.map_err(db_err)?;
            return Err(CounterError::NotFound { name: name.to_owned() });
        }
        counter::Entity::delete_by_id(name.to_owned()).exec(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use anyhow::Result;
    use tokio::sync::Barrier;
    use uuid::Uuid;

    #[tokio::test]
    async fn seaorm_counter_crud() -> Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let store = SeaOrmCounterStore::new(db);
        let name = format!("crud_{}", Uuid::new_v4());

        let created = store.create(&name, 10).await?;
        assert_eq!(created.value, 10);

        match store.create(&name, 99).await {
            Err(CounterError::AlreadyExists { value, .. }) => assert_eq!(value, 10),
            other => panic!("expected AlreadyExists, got {:?}", other),
        }
        // The failed create must not clobber the stored value
        assert_eq!(store.get(&name).await?.value, 10);

        let bumped = store.increment(&name).await?;
        assert_eq!(bumped.value, 11);
        assert_eq!(store.get(&name).await?.value, 11);

        store.delete(&name).await?;
        assert!(matches!(store.get(&name).await, Err(CounterError::NotFound { .. })));
        assert!(matches!(store.delete(&name).await, Err(CounterError::NotFound { .. })));

        // Name is reusable after deletion
        let again = store.create(&name, 10).await?;
        assert_eq!(again.value, 10);
        store.delete(&name).await?;
        Ok(())
    }

    #[tokio::test]
    async fn increment_creates_missing_row() -> Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let store = SeaOrmCounterStore::new(db);
        let name = format!("autocreate_{}", Uuid::new_v4());

        let c = store.increment(&name).await?;
        assert_eq!(c.value, 1);
        assert_eq!(store.get(&name).await?.value, 1);

        store.delete(&name).await?;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_increments_lose_no_updates() -> Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let store = Arc::new(SeaOrmCounterStore::new(db));
        let name = format!("contended_{}", Uuid::new_v4());

        let tasks = 16usize;
        let barrier = Arc::new(Barrier::new(tasks));
        let mut handles = Vec::new();
        for _ in 0..tasks {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            let name = name.clone();
            handles.push(tokio::spawn(async move {
                barrier.wait().await;
                store.increment(&name).await
            }));
        }
        for h in handles {
            h.await.expect("join")?;
        }

        assert_eq!(store.get(&name).await?.value, tasks as i64);
        store.delete(&name).await?;
        Ok(())
    }
}
