//! Record managers
//!
//! Every operation is a full load → mutate → save cycle against the store.

use chrono::Utc;
use std::marker::PhantomData;

use shortcut_storage::{ConfigStore, Project, QuickAccessSite};

use crate::error::CoreError;
use crate::ids::generate_id;
use crate::record::{advance, Record};
use crate::Result;

pub type ProjectManager = RecordManager<Project>;
pub type QuickAccessManager = RecordManager<QuickAccessSite>;

pub struct RecordManager<R: Record> {
    store: ConfigStore,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RecordManager<R> {
    pub fn new(store: ConfigStore) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub fn list(&self) -> Vec<R> {
        R::collection(&self.store.load()).to_vec()
    }

    pub fn get(&self, id: &str) -> Result<R> {
        R::collection(&self.store.load())
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| CoreError::not_found(R::KIND, id))
    }

    pub fn add(&self, draft: R::Draft) -> Result<R> {
        let record = self.store.transaction(|doc| {
            let mut id = generate_id(R::ID_PREFIX);
            while R::collection(doc).iter().any(|r| r.id() == id) {
                id = generate_id(R::ID_PREFIX);
            }

            let record = R::create(id, draft, Utc::now());
            R::collection_mut(doc).push(record.clone());
            Ok::<_, CoreError>(record)
        })?;

        tracing::info!(kind = %R::KIND, id = %record.id(), "Added record");
        Ok(record)
    }

    pub fn update(&self, id: &str, patch: R::Patch) -> Result<R> {
        let record = self.store.transaction(|doc| {
            let record = R::collection_mut(doc)
                .iter_mut()
                .find(|r| r.id() == id)
                .ok_or_else(|| CoreError::not_found(R::KIND, id))?;
            record.apply(patch, Utc::now());
            Ok::<_, CoreError>(record.clone())
        })?;

        tracing::info!(kind = %R::KIND, id = %id, "Updated record");
        Ok(record)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        self.store.transaction(|doc| {
            let records = R::collection_mut(doc);
            let before = records.len();
            records.retain(|r| r.id() != id);

            if records.len() == before {
                return Err(CoreError::not_found(R::KIND, id));
            }
            Ok(())
        })?;

        tracing::info!(kind = %R::KIND, id = %id, "Deleted record");
        Ok(true)
    }
}

impl RecordManager<Project> {
    /// Clear running state left over from a previous process.
    ///
    /// Failures are logged only; there is no caller to report them to at startup.
    pub fn reset_running_flags(&self) {
        let result = self.store.transaction(|doc| {
            let now = Utc::now();
            for project in &mut doc.projects {
                project.is_running = false;
                project.updated_at = advance(project.updated_at, now);
            }
            Ok::<_, CoreError>(doc.projects.len())
        });

        match result {
            Ok(count) => tracing::info!(count, "Reset project running flags"),
            Err(e) => tracing::error!(error = %e, "Failed to reset project running flags"),
        }
    }

    /// Record a server start or stop. An unknown id is ignored without writing.
    pub fn set_running_status(&self, id: &str, is_running: bool, port: Option<u16>) {
        let result = self.store.transaction(|doc| {
            let project = doc
                .projects
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| CoreError::not_found(Project::KIND, id))?;

            project.is_running = is_running;
            if let Some(port) = port.filter(|p| *p != 0) {
                project.port = Some(port);
            }
            project.updated_at = advance(project.updated_at, Utc::now());
            Ok::<_, CoreError>(())
        });

        match result {
            Ok(()) => {
                tracing::debug!(project_id = %id, is_running, ?port, "Updated project status")
            }
            Err(CoreError::NotFound { .. }) => {
                tracing::debug!(project_id = %id, "Ignoring status change for unknown project")
            }
            Err(e) => {
                tracing::error!(project_id = %id, error = %e, "Failed to update project status")
            }
        }
    }
}
