//! Mock store implementations for testing
//!
//! These mocks allow testing the publish pipeline and verification harness
//! without database dependencies. Writes can be failed on demand to
//! exercise fallback and error paths.

use crate::traits::{ArticleStore, AuditStore, ProfileStore};
use async_trait::async_trait;
use pressroom_core::models::{ArticleRecord, AuditEvent, Role};
use pressroom_core::AppError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Mock article store backed by a HashMap.
#[derive(Clone, Default)]
pub struct MockArticleStore {
    rows: Arc<Mutex<HashMap<Uuid, ArticleRecord>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MockArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn rows(&self) -> Vec<ArticleRecord> {
        self.rows.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl ArticleStore for MockArticleStore {
    async fn upsert(&self, mut record: ArticleRecord) -> Result<ArticleRecord, AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("injected write failure".to_string()));
        }
        let id = record.id.unwrap_or_else(Uuid::new_v4);
        record.id = Some(id);
        self.rows.lock().unwrap().insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ArticleRecord>, AppError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("injected write failure".to_string()));
        }
        self.rows.lock().unwrap().remove(&id);
        Ok(())
    }
}

/// Mock profile store with a preset role map.
#[derive(Clone, Default)]
pub struct MockProfileStore {
    roles: Arc<Mutex<HashMap<Uuid, Role>>>,
}

impl MockProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_role(&self, user_id: Uuid, role: Role) {
        self.roles.lock().unwrap().insert(user_id, role);
    }
}

#[async_trait]
impl ProfileStore for MockProfileStore {
    async fn role_of(&self, user_id: Uuid) -> Result<Option<Role>, AppError> {
        Ok(self.roles.lock().unwrap().get(&user_id).copied())
    }

    async fn ensure_elevated(
        &self,
        user_id: Uuid,
        _full_name: Option<&str>,
    ) -> Result<(), AppError> {
        self.roles
            .lock()
            .unwrap()
            .entry(user_id)
            .or_insert(Role::Admin);
        Ok(())
    }
}

/// Mock audit store recording events in memory.
#[derive(Clone, Default)]
pub struct MockAuditStore {
    events: Arc<Mutex<Vec<AuditEvent>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MockAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditStore for MockAuditStore {
    async fn record(&self, event: AuditEvent) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("injected audit failure".to_string()));
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
