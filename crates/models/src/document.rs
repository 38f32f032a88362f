use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::ids::{next_after, Id};
use crate::project::Project;
use crate::record::Collection;
use crate::task::Task;
use crate::user::User;

/// The whole persisted state. Field order here is the on-disk order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub users: Vec<User>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub projects: Vec<Project>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tasks: Vec<Task>,
    /// Top-level keys this service does not manage; written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Document {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Two-space indented JSON, the format the file has always been written in.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Next id by the `max + 1` rule for the given collection, `None` once
    /// the id space is exhausted.
    pub fn next_id(&self, collection: Collection) -> Option<Id> {
        match collection {
            Collection::Users => next_after(self.users.iter().map(|u| u.id)),
            Collection::Projects => next_after(self.projects.iter().map(|p| p.id)),
            Collection::Tasks => next_after(self.tasks.iter().map(|t| t.id)),
        }
    }
}
