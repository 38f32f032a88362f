use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::Document;
use crate::errors::ModelError;
use crate::ids::{self, Id};
use crate::record::{Collection, Record};
use crate::user::non_blank;

/// `progress` is whatever the last writer stored; it is not derived from tasks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(deserialize_with = "ids::deserialize_id")]
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub progress: i64,
    /// Written by create; a `null` patch clears it and the key is dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Project {
    const COLLECTION: Collection = Collection::Projects;

    fn id(&self) -> Id { self.id }

    fn rows(doc: &Document) -> &[Self] { &doc.projects }

    fn rows_mut(doc: &mut Document) -> &mut Vec<Self> { &mut doc.projects }
}

#[derive(Debug, Default, Deserialize)]
pub struct NewProject {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewProject {
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, ModelError> {
        serde_json::from_value(Value::Object(body.clone()))
            .map_err(|e| ModelError::validation(format!("invalid project: {e}")))
    }

    /// New projects start at progress 0, stamped with `now`.
    pub fn into_project(self, id: Id, now: DateTime<Utc>) -> Result<Project, ModelError> {
        let name = non_blank(self.name).ok_or_else(|| ModelError::validation("name required"))?;
        Ok(Project {
            id,
            name,
            description: self.description.unwrap_or_default(),
            progress: 0,
            created_at: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            extra: Map::new(),
        })
    }
}
