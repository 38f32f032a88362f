use serde_json::{Map, Value};
use tracing::{instrument, warn};

use models::user::NewUser;
use models::User;

use crate::data_store::DataStore;
use crate::errors::ServiceError;

/// List users, optionally those whose email contains `email` (any case).
pub async fn list_users(store: &DataStore, email: Option<&str>) -> Result<Vec<User>, ServiceError> {
    let needle = email.map(|e| e.trim().to_lowercase()).filter(|e| !e.is_empty());
    store
        .read(|doc| {
            doc.users
                .iter()
                .filter(|u| needle.as_deref().map_or(true, |n| u.email.to_lowercase().contains(n)))
                .cloned()
                .collect()
        })
        .await
}

pub async fn get_user(store: &DataStore, raw_id: &str) -> Result<User, ServiceError> {
    store.find::<User>(raw_id).await
}

/// Register a user. Emails are unique ignoring case; the check and the
/// insert happen under the same lock.
#[instrument(skip_all)]
pub async fn create_user(store: &DataStore, body: &Map<String, Value>) -> Result<User, ServiceError> {
    let input = NewUser::from_body(body)?.validate()?;
    store
        .insert(|doc, id| {
            if doc.users.iter().any(|u| u.email_matches(&input.email)) {
                warn!(email = %input.email, "registration rejected: email taken");
                return Err(ServiceError::Conflict("email already exists".into()));
            }
            Ok(input.into_user(id))
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use models::{Document, Role};
    use serde_json::json;
    use std::sync::Arc;

    fn body(v: Value) -> Map<String, Value> { v.as_object().cloned().unwrap() }

    fn seeded() -> (Arc<MemoryStore>, DataStore) {
        let doc: Document = serde_json::from_value(json!({
            "users": [
                {"id": 1, "name": "Ana", "email": "ana@corp.io", "password": "a", "role": "manager"},
                {"id": 2, "name": "Luis", "email": "luis@home.net", "password": "b", "role": "user"}
            ]
        }))
        .unwrap();
        let mem = Arc::new(MemoryStore::with_document(&doc));
        (mem.clone(), DataStore::new(mem))
    }

    #[tokio::test]
    async fn duplicate_email_in_other_case_conflicts() -> Result<(), anyhow::Error> {
        let (mem, store) = seeded();
        let before = mem.text().await;
        let res = create_user(
            &store,
            &body(json!({"name": "Ana 2", "email": "ANA@Corp.io", "password": "x", "role": "user"})),
        )
        .await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));
        assert_eq!(mem.text().await, before);
        Ok(())
    }

    #[tokio::test]
    async fn register_assigns_next_id() -> Result<(), anyhow::Error> {
        let (_, store) = seeded();
        let u = create_user(
            &store,
            &body(json!({"name": "Eva", "email": "eva@corp.io", "password": "x", "role": "user"})),
        )
        .await?;
        assert_eq!(u.id, 3);
        assert_eq!(u.role, Role::User);
        assert_eq!(get_user(&store, "3").await?, u);
        Ok(())
    }

    #[tokio::test]
    async fn missing_fields_are_validation_errors() {
        let (_, store) = seeded();
        let res = create_user(&store, &body(json!({"name": "Eva", "email": "eva@corp.io"}))).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn email_filter_is_case_insensitive_substring() -> Result<(), anyhow::Error> {
        let (_, store) = seeded();
        let hits = list_users(&store, Some("CORP")).await?;
        assert_eq!(hits.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(list_users(&store, Some("")).await?.len(), 2);
        assert_eq!(list_users(&store, None).await?.len(), 2);
        assert!(list_users(&store, Some("nobody")).await?.is_empty());
        Ok(())
    }
}
