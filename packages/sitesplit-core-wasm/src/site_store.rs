use lazy_static::lazy_static;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::models::SplitResult;

// Split results per project, keyed by building id
pub struct SiteStore {
    projects: HashMap<String, BTreeMap<usize, SplitResult>>,

    // Stats
    lookups: usize,
    hits: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub projects_count: usize,
    pub buildings_count: usize,
    pub total_lookups: usize,
    pub hit_rate: f64,
}

// Create a global static instance of the store
lazy_static! {
    static ref SITE_STORE: Mutex<SiteStore> = Mutex::new(SiteStore::new());
}

impl Default for SiteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteStore {
    pub fn new() -> Self {
        SiteStore {
            projects: HashMap::new(),
            lookups: 0,
            hits: 0,
        }
    }

    pub fn with_mut<F, R>(f: F) -> R
    where
        F: FnOnce(&mut SiteStore) -> R,
    {
        let mut guard = SITE_STORE.lock();
        f(&mut guard)
    }

    pub fn with<F, R>(f: F) -> R
    where
        F: FnOnce(&SiteStore) -> R,
    {
        let guard = SITE_STORE.lock();
        f(&guard)
    }

    /// Overwrite every entry of `project_name` with `results`. Returns true
    /// when older entries were dropped.
    pub fn replace_project(
        &mut self,
        project_name: &str,
        results: BTreeMap<usize, SplitResult>,
    ) -> bool {
        let previous = self.projects.insert(project_name.to_string(), results);
        previous.map_or(false, |old| !old.is_empty())
    }

    pub fn get_building(&mut self, project_name: &str, building_id: usize) -> Option<&SplitResult> {
        self.lookups += 1;
        let found = self
            .projects
            .get(project_name)
            .and_then(|buildings| buildings.get(&building_id));
        if found.is_some() {
            self.hits += 1;
        }
        found
    }

    pub fn project(&self, project_name: &str) -> Option<&BTreeMap<usize, SplitResult>> {
        self.projects.get(project_name)
    }

    /// Drop a project. Returns the number of buildings removed.
    pub fn remove_project(&mut self, project_name: &str) -> usize {
        self.projects
            .remove(project_name)
            .map_or(0, |buildings| buildings.len())
    }

    pub fn stats(&self) -> StoreStats {
        let hit_rate = if self.lookups > 0 {
            self.hits as f64 / self.lookups as f64
        } else {
            0.0
        };

        StoreStats {
            projects_count: self.projects.len(),
            buildings_count: self.projects.values().map(BTreeMap::len).sum(),
            total_lookups: self.lookups,
            hit_rate,
        }
    }

    pub fn clear(&mut self) {
        self.projects.clear();
        self.lookups = 0;
        self.hits = 0;
    }
}
