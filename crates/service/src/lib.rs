//! Service layer over the task board document.
//! - `storage` holds the load/save abstraction and its backends.
//! - `data_store` serializes every read-modify-write behind one lock.
//! - The `*_service` modules are the operations the HTTP layer calls.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod data_store;
pub mod project_service;
pub mod task_service;
pub mod user_service;
pub mod dashboard_service;

pub use data_store::DataStore;
pub use errors::ServiceError;
