//! Project Service
//!
//! Cached reads and invalidating writes for projects.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ProjectSource, ServiceError};
use crate::cache::{Clock, MemoryCache, SystemClock, DEFAULT_TTL, SHORT_TTL};
use crate::cache_key;
use crate::config::CacheConfig;

const PREFIX: &str = "projects";

// == Models ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub owner_id: String,
    pub name: String,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
}

// == Project Service ==
/// Reads projects through two caches: one for owner listings, one for
/// single projects.
///
/// Listings change whenever any project changes, so every write drops the
/// whole list cache; single entries are dropped by id.
pub struct ProjectService<S> {
    source: S,
    lists: MemoryCache<Vec<Project>>,
    details: MemoryCache<Project>,
}

impl<S: ProjectSource> ProjectService<S> {
    pub fn new(source: S) -> Self {
        Self::with_clock(source, Arc::new(SystemClock))
    }

    /// Creates a service whose caches read `clock`.
    pub fn with_clock(source: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            lists: MemoryCache::with_clock(
                CacheConfig::new("project-lists").with_default_ttl_ms(SHORT_TTL),
                clock.clone(),
            ),
            details: MemoryCache::with_clock(
                CacheConfig::new("project-details").with_default_ttl_ms(DEFAULT_TTL),
                clock,
            ),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    // == Reads ==
    /// Lists an owner's projects, optionally filtered by status.
    pub async fn list(
        &self,
        owner_id: &str,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<Project>, ServiceError> {
        let key = cache_key!(PREFIX, "list", owner_id, status.map(|s| s.as_str()));
        let source = &self.source;
        self.lists
            .get_or_fetch(&key, move || source.list_projects(owner_id, status), None)
            .await
    }

    /// Fetches one project. Missing projects are not cached.
    pub async fn get(&self, id: &str) -> Result<Project, ServiceError> {
        let key = cache_key!(PREFIX, "detail", id);
        let source = &self.source;
        self.details
            .get_or_fetch(
                &key,
                move || async move {
                    source
                        .find_project(id)
                        .await?
                        .ok_or_else(|| ServiceError::NotFound(id.to_string()))
                },
                None,
            )
            .await
    }

    // == Writes ==
    pub async fn create(&self, project: NewProject) -> Result<Project, ServiceError> {
        let created = self.source.insert_project(project).await?;
        self.lists.invalidate_all();
        debug!(project = %created.id, "project created, list cache invalidated");
        Ok(created)
    }

    /// Applies `update` and primes the detail cache with the result.
    pub async fn update(&self, id: &str, update: ProjectUpdate) -> Result<Project, ServiceError> {
        let updated = self.source.update_project(id, update).await?;
        self.lists.invalidate_all();
        self.details.set(cache_key!(PREFIX, "detail", id), updated.clone(), None);
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.source.delete_project(id).await?;
        self.lists.invalidate_all();
        self.details.invalidate(&cache_key!(PREFIX, "detail", id));
        Ok(())
    }

    /// Sweeps expired entries from both caches.
    pub fn cleanup(&self) -> usize {
        self.lists.cleanup() + self.details.cleanup()
    }
}
