//! Serialized access to the document.
//!
//! Every operation is load → mutate → save under one process-wide lock, so
//! concurrent requests neither lose updates nor hand out the same id twice.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info};

use models::{ids, merge::shallow_merge, Collection, Document, Id, Record};

use crate::errors::ServiceError;
use crate::storage::{DocumentStore, StorageError};

/// Last id handed out per collection.
///
/// Lives only as long as the process. Each allocation takes the larger of
/// the counter and the document's `max + 1`, so ids stay unique even when
/// the file was edited by hand, and ids freed by deletes are not reused.
#[derive(Debug, Default)]
pub struct IdAllocator {
    users: Id,
    projects: Id,
    tasks: Id,
}

impl IdAllocator {
    fn slot(&mut self, collection: Collection) -> &mut Id {
        match collection {
            Collection::Users => &mut self.users,
            Collection::Projects => &mut self.projects,
            Collection::Tasks => &mut self.tasks,
        }
    }

    /// Id the next insert would get; nothing is reserved.
    pub fn peek(&mut self, collection: Collection, doc: &Document) -> Result<Id, ServiceError> {
        let after_counter = self.slot(collection).checked_add(1);
        doc.next_id(collection)
            .zip(after_counter)
            .map(|(from_doc, from_counter)| from_doc.max(from_counter))
            .ok_or_else(|| ServiceError::Internal(format!("no ids left in {collection}")))
    }

    pub fn commit(&mut self, collection: Collection, id: Id) {
        let slot = self.slot(collection);
        *slot = (*slot).max(id);
    }
}

pub struct DataStore {
    backend: Arc<dyn DocumentStore>,
    ids: Mutex<IdAllocator>,
}

impl DataStore {
    pub fn new(backend: Arc<dyn DocumentStore>) -> Self {
        Self { backend, ids: Mutex::new(IdAllocator::default()) }
    }

    pub fn describe(&self) -> String { self.backend.describe() }

    /// Load once to prove the backing document is readable and well formed.
    pub async fn verify(&self) -> Result<Document, StorageError> {
        let _guard = self.ids.lock().await;
        self.backend.load().await
    }

    /// Run `f` over a fresh load of the document.
    pub async fn read<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&Document) -> T,
    {
        let _guard = self.ids.lock().await;
        let doc = self.backend.load().await?;
        Ok(f(&doc))
    }

    /// Load, apply `f`, and save only if `f` succeeded.
    pub async fn mutate<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut Document, &mut IdAllocator) -> Result<T, ServiceError>,
    {
        let mut ids = self.ids.lock().await;
        let mut doc = self.backend.load().await?;
        let out = f(&mut doc, &mut ids)?;
        self.backend.save(&doc).await?;
        Ok(out)
    }

    pub async fn list<R: Record>(&self) -> Result<Vec<R>, ServiceError> {
        self.read(|doc| R::rows(doc).to_vec()).await
    }

    pub async fn find<R: Record>(&self, raw_id: &str) -> Result<R, ServiceError> {
        let id = ids::parse_id(raw_id).ok_or_else(|| ServiceError::missing(R::COLLECTION))?;
        self.read(|doc| R::rows(doc).iter().find(|r| r.id() == id).cloned())
            .await?
            .ok_or_else(|| ServiceError::missing(R::COLLECTION))
    }

    /// Append a record built around a freshly allocated id.
    pub async fn insert<R, F>(&self, build: F) -> Result<R, ServiceError>
    where
        R: Record,
        F: FnOnce(&Document, Id) -> Result<R, ServiceError>,
    {
        let created = self
            .mutate(|doc, ids| {
                let id = ids.peek(R::COLLECTION, doc)?;
                let record = build(doc, id)?;
                ids.commit(R::COLLECTION, id);
                R::rows_mut(doc).push(record.clone());
                Ok(record)
            })
            .await?;
        info!(collection = %R::COLLECTION, id = created.id(), "record created");
        Ok(created)
    }

    /// Shallow-merge `patch` over the record with `raw_id`.
    pub async fn patch<R: Record>(&self, raw_id: &str, patch: &Map<String, Value>) -> Result<R, ServiceError> {
        let id = ids::parse_id(raw_id).ok_or_else(|| ServiceError::missing(R::COLLECTION))?;
        let updated = self
            .mutate(|doc, _| {
                let slot = R::rows_mut(doc)
                    .iter_mut()
                    .find(|r| r.id() == id)
                    .ok_or_else(|| ServiceError::missing(R::COLLECTION))?;
                let merged: R = shallow_merge(slot, patch)?;
                *slot = merged.clone();
                Ok(merged)
            })
            .await?;
        debug!(collection = %R::COLLECTION, id, fields = patch.len(), "record patched");
        Ok(updated)
    }

    /// Remove the record with `raw_id`; nothing is written when it is absent.
    pub async fn remove<R: Record>(&self, raw_id: &str) -> Result<R, ServiceError> {
        let id = ids::parse_id(raw_id).ok_or_else(|| ServiceError::missing(R::COLLECTION))?;
        let removed = self
            .mutate(|doc, _| take_by_id::<R>(doc, id).ok_or_else(|| ServiceError::missing(R::COLLECTION)))
            .await?;
        info!(collection = %R::COLLECTION, id, "record deleted");
        Ok(removed)
    }
}

/// Remove and return the first record with `id`.
pub(crate) fn take_by_id<R: Record>(doc: &mut Document, id: Id) -> Option<R> {
    let rows = R::rows_mut(doc);
    let pos = rows.iter().position(|r| r.id() == id)?;
    Some(rows.remove(pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use models::project::NewProject;
    use serde_json::json;

    fn store_with(doc: Value) -> (Arc<MemoryStore>, DataStore) {
        let doc: Document = serde_json::from_value(doc).unwrap();
        let mem = Arc::new(MemoryStore::with_document(&doc));
        (mem.clone(), DataStore::new(mem))
    }

    #[test]
    fn allocator_never_goes_backwards() -> Result<(), ServiceError> {
        let mut ids = IdAllocator::default();
        let empty = Document::default();
        ids.commit(Collection::Tasks, 2);
        assert_eq!(ids.peek(Collection::Tasks, &empty)?, 3);
        // other collections are independent
        assert_eq!(ids.peek(Collection::Users, &empty)?, 1);

        let doc: Document = serde_json::from_value(json!({
            "tasks": [{"id": 10, "title": "t", "status": "todo", "projectId": 1}]
        }))
        .unwrap();
        assert_eq!(ids.peek(Collection::Tasks, &doc)?, 11);
        Ok(())
    }

    #[test]
    fn peek_does_not_reserve() -> Result<(), ServiceError> {
        let mut ids = IdAllocator::default();
        let empty = Document::default();
        assert_eq!(ids.peek(Collection::Projects, &empty)?, 1);
        assert_eq!(ids.peek(Collection::Projects, &empty)?, 1);
        ids.commit(Collection::Projects, 1);
        assert_eq!(ids.peek(Collection::Projects, &empty)?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn exhausted_id_space_is_an_error_not_a_wrap() {
        let (mem, store) = store_with(json!({"projects": [{"id": u64::MAX, "name": "last"}]}));
        let before = mem.text().await;
        let res = store
            .insert(|_, id| Ok(NewProject { name: Some("next".into()), description: None }.into_project(id, chrono::Utc::now())?))
            .await;
        assert!(matches!(res, Err(ServiceError::Internal(_))));
        assert_eq!(mem.text().await, before);
    }

    #[tokio::test]
    async fn unmanaged_collections_survive_a_write() -> Result<(), anyhow::Error> {
        let mem = Arc::new(MemoryStore::with_text(
            r#"{"users":[],"projects":[],"tasks":[],"comments":[{"id":1,"text":"keep me"}]}"#,
        ));
        let store = DataStore::new(mem.clone());
        store.mutate(|_, _| Ok(())).await?;
        let saved: Value = serde_json::from_str(&mem.text().await)?;
        assert_eq!(saved["comments"], json!([{"id": 1, "text": "keep me"}]));
        Ok(())
    }

    #[tokio::test]
    async fn failed_mutation_writes_nothing() -> Result<(), anyhow::Error> {
        let (mem, store) = store_with(json!({"projects": [{"id": 1, "name": "a"}]}));
        let before = mem.text().await;
        let res: Result<(), _> = store
            .mutate(|doc, _| {
                doc.projects.clear();
                Err(ServiceError::Validation("nope".into()))
            })
            .await;
        assert!(res.is_err());
        assert_eq!(mem.text().await, before);
        Ok(())
    }

    #[tokio::test]
    async fn ids_are_unique_under_concurrent_inserts() -> Result<(), anyhow::Error> {
        let (_, store) = store_with(json!({}));
        let store = Arc::new(store);
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .insert(|_, id| {
                        Ok(NewProject { name: Some(format!("p{i}")), description: None }
                            .into_project(id, chrono::Utc::now())?)
                    })
                    .await
                    .map(|p: models::Project| p.id)
            }));
        }
        let mut ids = Vec::new();
        for h in handles {
            ids.push(h.await??);
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=16).collect::<Vec<_>>());
        assert_eq!(store.list::<models::Project>().await?.len(), 16);
        Ok(())
    }

    #[tokio::test]
    async fn non_numeric_ids_are_not_found() {
        let (_, store) = store_with(json!({"projects": [{"id": 1, "name": "a"}]}));
        assert!(matches!(store.find::<models::Project>("abc").await, Err(ServiceError::NotFound(_))));
        assert!(matches!(store.remove::<models::Project>("").await, Err(ServiceError::NotFound(_))));
        assert!(store.find::<models::Project>("1").await.is_ok());
    }

    #[tokio::test]
    async fn corrupt_backend_surfaces_as_storage_error() {
        let store = DataStore::new(Arc::new(MemoryStore::with_text("[1, 2")));
        assert!(store.verify().await.is_err());
        assert!(matches!(store.list::<models::Task>().await, Err(ServiceError::Storage(StorageError::Corrupt { .. }))));
    }
}
