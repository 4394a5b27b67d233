//! Project registry.
//!
//! Front ends own a [`ProjectStore`] and hand it to whatever needs project
//! state; nothing reaches for a global map. The store also carries the
//! per-project generation guard: two generation jobs for the same project
//! would overwrite each other's segment files, so only one may hold the
//! guard at a time.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

use crate::project::{Project, ProjectError};

/// Storage for projects keyed by id.
pub trait ProjectStore: Send + Sync {
    /// Snapshot of a project.
    fn get(&self, id: &str) -> Result<Project, ProjectError>;

    /// Insert or replace a project.
    fn put(&self, project: Project);

    /// Remove a project, returning its last state.
    fn delete(&self, id: &str) -> Result<Project, ProjectError>;

    /// Ids of all stored projects, sorted.
    fn ids(&self) -> Vec<String>;

    /// Claim the right to generate a video for `id`.
    fn begin_generation(&self, id: &str) -> Result<GenerationGuard, ProjectError>;

    /// Read-modify-write a project. Implementations shared between threads
    /// should override this so the edit is atomic.
    fn update(
        &self,
        id: &str,
        f: &mut dyn FnMut(&mut Project),
    ) -> Result<Project, ProjectError> {
        let mut project = self.get(id)?;
        f(&mut project);
        self.put(project.clone());
        Ok(project)
    }
}

/// Set of project ids with a generation in flight.
#[derive(Debug, Default)]
pub struct InFlight {
    ids: Mutex<HashSet<String>>,
}

impl InFlight {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Claim `id`, failing if it is already claimed.
    pub fn claim(self: &Arc<Self>, id: &str) -> Result<GenerationGuard, ProjectError> {
        let mut ids = self.ids.lock().unwrap_or_else(|e| e.into_inner());
        if !ids.insert(id.to_string()) {
            return Err(ProjectError::GenerationInProgress { id: id.to_string() });
        }
        Ok(GenerationGuard {
            id: id.to_string(),
            in_flight: Arc::clone(self),
        })
    }

    fn release(&self, id: &str) {
        self.ids
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);
    }
}

/// Held for the duration of one generation job; releases on drop.
#[derive(Debug)]
pub struct GenerationGuard {
    id: String,
    in_flight: Arc<InFlight>,
}

impl GenerationGuard {
    pub fn project_id(&self) -> &str {
        &self.id
    }
}

impl Drop for GenerationGuard {
    fn drop(&mut self) {
        self.in_flight.release(&self.id);
    }
}

/// Process-local store. State is lost when the process exits.
#[derive(Debug)]
pub struct InMemoryProjectStore {
    projects: RwLock<HashMap<String, Project>>,
    in_flight: Arc<InFlight>,
}

impl Default for InMemoryProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(HashMap::new()),
            in_flight: InFlight::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.projects
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProjectStore for InMemoryProjectStore {
    fn get(&self, id: &str) -> Result<Project, ProjectError> {
        self.projects
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
            .ok_or_else(|| ProjectError::NotFound { id: id.to_string() })
    }

    fn put(&self, project: Project) {
        self.projects
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(project.id.clone(), project);
    }

    fn delete(&self, id: &str) -> Result<Project, ProjectError> {
        self.projects
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id)
            .ok_or_else(|| ProjectError::NotFound { id: id.to_string() })
    }

    fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .projects
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    fn update(
        &self,
        id: &str,
        f: &mut dyn FnMut(&mut Project),
    ) -> Result<Project, ProjectError> {
        let mut projects = self.projects.write().unwrap_or_else(|e| e.into_inner());
        let project = projects
            .get_mut(id)
            .ok_or_else(|| ProjectError::NotFound { id: id.to_string() })?;
        f(project);
        Ok(project.clone())
    }

    fn begin_generation(&self, id: &str) -> Result<GenerationGuard, ProjectError> {
        // Only known projects can be generated.
        self.get(id)?;
        self.in_flight.claim(id)
    }
}
