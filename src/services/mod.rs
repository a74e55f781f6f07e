//! Services Module
//!
//! Service-layer readers that memoize backend reads in per-domain caches
//! and invalidate them after writes.

mod error;
mod project;
mod source;

pub use error::ServiceError;
pub use project::{NewProject, Project, ProjectService, ProjectStatus, ProjectUpdate};
pub use source::{InMemoryProjectSource, ProjectSource};
