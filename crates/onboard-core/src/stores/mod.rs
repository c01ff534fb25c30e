//! External data stores
//!
//! Narrow read-only adapters over the onboarding data set: markdown
//! documents, contact records in YAML frontmatter, and the task list.
//! Tools hold `Arc`s to these and never reach around them.

mod frontmatter;

pub mod contacts;
pub mod docs;
pub mod tasks;

pub use contacts::{ContactsStore, Customer, Person};
pub use docs::{DocStore, SearchHit};
pub use tasks::{Task, TaskPriority, TaskStatus, TaskStore};
