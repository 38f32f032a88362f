//! Progress metrics for the dashboard.
//!
//! Managers see everything. A regular user sees the tasks assigned to them
//! (assignee equal to their name, ignoring case) and only the projects those
//! tasks belong to.

use std::collections::HashSet;

use serde::Serialize;

use models::{Document, Id, Project, Role, Task, TaskStatus, User};

use crate::data_store::DataStore;
use crate::errors::ServiceError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub id: Id,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub total: usize,
    pub todo: usize,
    pub doing: usize,
    pub done: usize,
    pub progress_pct: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    pub project_id: Id,
    pub name: String,
    pub total: usize,
    pub done: usize,
    pub progress_pct: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<Viewer>,
    pub overall: StatusCounts,
    pub projects: Vec<ProjectProgress>,
}

/// Rounded percentage of `done` over `total`; 0 when there is nothing.
pub fn percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((done as f64 / total as f64) * 100.0).round() as u32
}

fn count(tasks: &[&Task]) -> StatusCounts {
    let mut c = StatusCounts { total: tasks.len(), ..StatusCounts::default() };
    for t in tasks {
        match t.status {
            TaskStatus::Todo => c.todo += 1,
            TaskStatus::Doing => c.doing += 1,
            TaskStatus::Done => c.done += 1,
        }
    }
    c.progress_pct = percent(c.done, c.total);
    c
}

/// Build the summary from one snapshot of the document.
pub fn build_summary(doc: &Document, viewer: Option<&User>) -> DashboardSummary {
    let restricted = viewer.filter(|u| u.role != Role::Manager);
    let tasks: Vec<&Task> = match restricted {
        Some(u) => doc.tasks.iter().filter(|t| t.is_assigned_to(&u.name)).collect(),
        None => doc.tasks.iter().collect(),
    };
    let projects: Vec<&Project> = match restricted {
        Some(_) => {
            let mine: HashSet<Id> = tasks.iter().map(|t| t.project_id).collect();
            doc.projects.iter().filter(|p| mine.contains(&p.id)).collect()
        }
        None => doc.projects.iter().collect(),
    };

    let per_project = projects
        .into_iter()
        .map(|p| {
            let own: Vec<&Task> = tasks.iter().copied().filter(|t| t.project_id == p.id).collect();
            let done = own.iter().filter(|t| t.status == TaskStatus::Done).count();
            ProjectProgress {
                project_id: p.id,
                name: p.name.clone(),
                total: own.len(),
                done,
                progress_pct: percent(done, own.len()),
            }
        })
        .collect();

    DashboardSummary {
        viewer: viewer.map(|u| Viewer { id: u.id, name: u.name.clone(), role: u.role }),
        overall: count(&tasks),
        projects: per_project,
    }
}

/// Summary for `viewer_id`, or the full view when no viewer is given.
pub async fn summarize(store: &DataStore, viewer_id: Option<&str>) -> Result<DashboardSummary, ServiceError> {
    let viewer_id = viewer_id.map(str::trim).filter(|s| !s.is_empty());
    let wanted = match viewer_id {
        Some(raw) => Some(models::ids::parse_id(raw).ok_or_else(|| ServiceError::not_found("user"))?),
        None => None,
    };
    store
        .read(|doc| -> Result<DashboardSummary, ServiceError> {
            let viewer = match wanted {
                Some(id) => Some(doc.users.iter().find(|u| u.id == id).ok_or_else(|| ServiceError::not_found("user"))?),
                None => None,
            };
            Ok(build_summary(doc, viewer))
        })
        .await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn doc() -> Document {
        serde_json::from_value(json!({
            "users": [
                {"id": 1, "name": "Ana", "email": "ana@x.io", "password": "a", "role": "manager"},
                {"id": 2, "name": "Luis", "email": "luis@x.io", "password": "b", "role": "user"}
            ],
            "projects": [
                {"id": 1, "name": "Web"},
                {"id": 2, "name": "App"},
                {"id": 3, "name": "Empty"}
            ],
            "tasks": [
                {"id": 1, "title": "a", "status": "done", "projectId": 1, "assignee": "luis"},
                {"id": 2, "title": "b", "status": "todo", "projectId": 1, "assignee": "Ana"},
                {"id": 3, "title": "c", "status": "doing", "projectId": 2, "assignee": "Ana"},
                {"id": 4, "title": "d", "status": "done", "projectId": 1}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn percent_rounds_and_handles_zero() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(4, 4), 100);
    }

    #[test]
    fn manager_sees_everything() {
        let d = doc();
        let s = build_summary(&d, Some(&d.users[0]));
        assert_eq!(s.overall, StatusCounts { total: 4, todo: 1, doing: 1, done: 2, progress_pct: 50 });
        assert_eq!(s.projects.len(), 3);
        assert_eq!(s.projects[0].progress_pct, 67);
        assert_eq!(s.projects[2].total, 0);
        assert_eq!(s.projects[2].progress_pct, 0);
    }

    #[test]
    fn user_sees_only_assigned_work() {
        let d = doc();
        let s = build_summary(&d, Some(&d.users[1]));
        assert_eq!(s.overall.total, 1);
        assert_eq!(s.overall.progress_pct, 100);
        assert_eq!(s.projects.iter().map(|p| p.project_id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(s.viewer.as_ref().map(|v| v.role), Some(Role::User));
    }

    #[tokio::test]
    async fn summarize_resolves_viewer() -> Result<(), anyhow::Error> {
        let store = DataStore::new(Arc::new(MemoryStore::with_document(&doc())));
        let all = summarize(&store, None).await?;
        assert!(all.viewer.is_none());
        assert_eq!(all.overall.total, 4);
        let luis = summarize(&store, Some("2")).await?;
        assert_eq!(luis.overall.total, 1);
        assert!(matches!(summarize(&store, Some("9")).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
