use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::Document;
use crate::errors::ModelError;
use crate::ids::{self, Id};
use crate::record::{Collection, Record};
use crate::user::non_blank;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Todo,
    Doing,
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Doing => "doing",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "doing" => Ok(TaskStatus::Doing),
            "done" => Ok(TaskStatus::Done),
            other => Err(ModelError::validation(format!("status must be todo, doing or done, got {other:?}"))),
        }
    }
}

/// `project_id` points at a project but is not checked; `assignee` is a
/// free-text name, not a user id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(deserialize_with = "ids::deserialize_id")]
    pub id: Id,
    pub title: String,
    pub status: TaskStatus,
    #[serde(deserialize_with = "ids::deserialize_id")]
    pub project_id: Id,
    /// `null` and absent both mean unassigned; either way the key is not
    /// written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Task {
    const COLLECTION: Collection = Collection::Tasks;

    fn id(&self) -> Id { self.id }

    fn rows(doc: &Document) -> &[Self] { &doc.tasks }

    fn rows_mut(doc: &mut Document) -> &mut Vec<Self> { &mut doc.tasks }
}

impl Task {
    pub fn is_assigned_to(&self, name: &str) -> bool {
        self.assignee
            .as_deref()
            .map(|a| a.to_lowercase() == name.to_lowercase())
            .unwrap_or(false)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "ids::deserialize_opt_id")]
    pub project_id: Option<Id>,
    #[serde(default)]
    pub assignee: Option<String>,
}

const TASK_REQUIRED: &str = "title, status, projectId required";

impl NewTask {
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, ModelError> {
        serde_json::from_value(Value::Object(body.clone()))
            .map_err(|e| ModelError::validation(format!("{TASK_REQUIRED}: {e}")))
    }

    pub fn into_task(self, id: Id) -> Result<Task, ModelError> {
        let (Some(title), Some(status), Some(project_id)) =
            (non_blank(self.title), non_blank(self.status), self.project_id.filter(|p| *p != 0))
        else {
            return Err(ModelError::validation(TASK_REQUIRED));
        };
        Ok(Task {
            id,
            title,
            status: status.parse()?,
            project_id,
            assignee: self.assignee,
            extra: Map::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(v: Value) -> Map<String, Value> { v.as_object().cloned().unwrap() }

    #[test]
    fn required_fields() {
        for b in [
            json!({"status": "todo", "projectId": 1}),
            json!({"title": "t", "projectId": 1}),
            json!({"title": "t", "status": "todo"}),
            json!({"title": "t", "status": "todo", "projectId": 0}),
        ] {
            let res = NewTask::from_body(&body(b)).and_then(|t| t.into_task(1));
            assert!(matches!(res, Err(ModelError::Validation(_))));
        }
    }

    #[test]
    fn accepts_string_project_id_and_omits_missing_assignee() {
        let t = NewTask::from_body(&body(json!({"title": "Docs", "status": "doing", "projectId": "3"})))
            .and_then(|t| t.into_task(8))
            .unwrap();
        assert_eq!(t.project_id, 3);
        assert_eq!(t.status, TaskStatus::Doing);
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v, json!({"id": 8, "title": "Docs", "status": "doing", "projectId": 3}));
    }

    #[test]
    fn rejects_unknown_status() {
        let res = NewTask::from_body(&body(json!({"title": "t", "status": "blocked", "projectId": 1})))
            .and_then(|t| t.into_task(1));
        assert!(res.unwrap_err().to_string().contains("status must be"));
    }

    #[test]
    fn assignee_match_ignores_case() {
        let t = NewTask::from_body(&body(json!({"title": "t", "status": "todo", "projectId": 1, "assignee": "Ana"})))
            .and_then(|t| t.into_task(1))
            .unwrap();
        assert!(t.is_assigned_to("ana"));
        assert!(!t.is_assigned_to("bob"));
    }

    #[test]
    fn null_assignee_patch_unassigns() {
        let t = NewTask::from_body(&body(json!({"title": "t", "status": "todo", "projectId": 1, "assignee": "Ana"})))
            .and_then(|t| t.into_task(1))
            .unwrap();
        let merged: Task = crate::merge::shallow_merge(&t, &body(json!({"assignee": null}))).unwrap();
        assert_eq!(merged.assignee, None);
        assert!(!merged.is_assigned_to("ana"));
        let v = serde_json::to_value(&merged).unwrap();
        assert!(v.get("assignee").is_none());
        assert_eq!(v["title"], "t");
    }
}
