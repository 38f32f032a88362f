//! Entities of the task board document and the rules that apply to a single
//! record: required fields on create, allowed enum values, and the shallow
//! merge used by updates.

pub mod errors;
pub mod ids;
pub mod record;
pub mod merge;
pub mod document;
pub mod user;
pub mod project;
pub mod task;

pub use document::Document;
pub use ids::Id;
pub use project::Project;
pub use record::{Collection, Record};
pub use task::{Task, TaskStatus};
pub use user::{Role, User};
