use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

use crate::document::Document;
use crate::ids::Id;

/// The three collections of the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Projects,
    Tasks,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Projects => "projects",
            Collection::Tasks => "tasks",
        }
    }

    /// Singular noun used in error messages.
    pub fn entity(self) -> &'static str {
        match self {
            Collection::Users => "user",
            Collection::Projects => "project",
            Collection::Tasks => "task",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of one collection.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    fn id(&self) -> Id;

    /// This record's collection inside the document.
    fn rows(doc: &Document) -> &[Self];

    fn rows_mut(doc: &mut Document) -> &mut Vec<Self>;
}
