//! Project Source
//!
//! The backend the project service reads through.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use super::{NewProject, Project, ProjectStatus, ProjectUpdate, ServiceError};

// == Project Source ==
/// Backend operations on projects.
pub trait ProjectSource: Send + Sync {
    /// Lists an owner's projects, optionally filtered by status.
    fn list_projects(
        &self,
        owner_id: &str,
        status: Option<ProjectStatus>,
    ) -> impl Future<Output = Result<Vec<Project>, ServiceError>> + Send;

    fn find_project(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Project>, ServiceError>> + Send;

    fn insert_project(
        &self,
        project: NewProject,
    ) -> impl Future<Output = Result<Project, ServiceError>> + Send;

    fn update_project(
        &self,
        id: &str,
        update: ProjectUpdate,
    ) -> impl Future<Output = Result<Project, ServiceError>> + Send;

    fn delete_project(&self, id: &str) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

// == In-Memory Source ==
/// A [`ProjectSource`] backed by a HashMap.
///
/// Counts read calls so callers can observe how often the cache in front
/// of it actually reaches the backend.
#[derive(Debug, Default)]
pub struct InMemoryProjectSource {
    projects: Mutex<HashMap<String, Project>>,
    next_id: AtomicUsize,
    reads: AtomicUsize,
}

impl InMemoryProjectSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `list_projects` and `find_project` calls served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn projects(&self) -> MutexGuard<'_, HashMap<String, Project>> {
        self.projects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProjectSource for InMemoryProjectSource {
    async fn list_projects(
        &self,
        owner_id: &str,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<Project>, ServiceError> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        let mut projects: Vec<Project> = self
            .projects()
            .values()
            .filter(|p| p.owner_id == owner_id)
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect();
        projects.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(projects)
    }

    async fn find_project(&self, id: &str) -> Result<Option<Project>, ServiceError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.projects().get(id).cloned())
    }

    async fn insert_project(&self, project: NewProject) -> Result<Project, ServiceError> {
        if project.name.trim().is_empty() {
            return Err(ServiceError::Backend("project name cannot be empty".to_string()));
        }

        let id = format!("p-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let project = Project {
            id: id.clone(),
            owner_id: project.owner_id,
            name: project.name,
            status: ProjectStatus::Active,
            created_at: Utc::now(),
        };
        self.projects().insert(id, project.clone());
        Ok(project)
    }

    async fn update_project(&self, id: &str, update: ProjectUpdate) -> Result<Project, ServiceError> {
        let mut projects = self.projects();
        let project = projects
            .get_mut(id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        if let Some(name) = update.name {
            project.name = name;
        }
        if let Some(status) = update.status {
            project.status = status;
        }
        Ok(project.clone())
    }

    async fn delete_project(&self, id: &str) -> Result<(), ServiceError> {
        self.projects()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }
}
