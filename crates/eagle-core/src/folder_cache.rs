//! In-process cache of the catalog's folders

use std::sync::RwLock;

use crate::types::Folder;

/// State of a folder cache
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CacheState {
    /// Nothing fetched yet
    #[default]
    Unloaded,
    /// Fetched once (possibly empty after a failed fetch)
    Loaded(Vec<Folder>),
}

impl CacheState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, CacheState::Loaded(_))
    }
}

/// Storage for the folder list the catalog client looks names up in.
///
/// The client owns loading; implementations only decide how the list is kept.
pub trait FolderCache: Send + Sync {
    /// Current state
    fn state(&self) -> CacheState;

    /// Replace the contents with a freshly fetched list
    fn load(&self, folders: Vec<Folder>);

    /// Record a folder created through the client
    fn append(&self, folder: Folder);

    /// First folder whose name or id equals `name_or_id`, in list order
    fn find(&self, name_or_id: &str) -> Option<Folder> {
        match self.state() {
            CacheState::Loaded(folders) => folders.into_iter().find(|f| f.matches(name_or_id)),
            CacheState::Unloaded => None,
        }
    }

    fn is_loaded(&self) -> bool {
        self.state().is_loaded()
    }
}

/// Append-only cache living for the client's lifetime
#[derive(Debug, Default)]
pub struct MemoryFolderCache {
    state: RwLock<CacheState>,
}

impl MemoryFolderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache that starts out loaded with `folders`
    pub fn preloaded(folders: Vec<Folder>) -> Self {
        Self {
            state: RwLock::new(CacheState::Loaded(folders)),
        }
    }
}

impl FolderCache for MemoryFolderCache {
    fn state(&self) -> CacheState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn load(&self, folders: Vec<Folder>) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *state = CacheState::Loaded(folders);
    }

    fn append(&self, folder: Folder) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match &mut *state {
            CacheState::Loaded(folders) => folders.push(folder),
            CacheState::Unloaded => *state = CacheState::Loaded(vec![folder]),
        }
    }

    fn find(&self, name_or_id: &str) -> Option<Folder> {
        let state = self
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match &*state {
            CacheState::Loaded(folders) => folders.iter().find(|f| f.matches(name_or_id)).cloned(),
            CacheState::Unloaded => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unloaded() {
        let cache = MemoryFolderCache::new();
        assert_eq!(cache.state(), CacheState::Unloaded);
        assert!(!cache.is_loaded());
        assert_eq!(cache.find("anything"), None);
    }

    #[test]
    fn test_find_by_name_or_id() {
        let cache = MemoryFolderCache::preloaded(vec![
            Folder::new("L1", "Landscapes"),
            Folder::new("P1", "Portraits"),
        ]);

        assert_eq!(cache.find("Portraits").map(|f| f.id), Some("P1".to_string()));
        assert_eq!(cache.find("L1").map(|f| f.id), Some("L1".to_string()));
        assert_eq!(cache.find("Missing"), None);
    }

    #[test]
    fn test_first_match_wins_when_name_collides_with_id() {
        // A folder literally named "B2" listed before the folder whose id is "B2"
        let cache = MemoryFolderCache::preloaded(vec![
            Folder::new("A1", "B2"),
            Folder::new("B2", "Other"),
        ]);
        assert_eq!(cache.find("B2").map(|f| f.id), Some("A1".to_string()));

        let cache = MemoryFolderCache::preloaded(vec![
            Folder::new("B2", "Other"),
            Folder::new("A1", "B2"),
        ]);
        assert_eq!(cache.find("B2").map(|f| f.id), Some("B2".to_string()));
    }

    #[test]
    fn test_append_after_load() {
        let cache = MemoryFolderCache::new();
        cache.load(vec![]);
        cache.append(Folder::new("N1", "New"));

        assert_eq!(cache.state(), CacheState::Loaded(vec![Folder::new("N1", "New")]));
    }
}
