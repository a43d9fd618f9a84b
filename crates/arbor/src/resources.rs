//! Path-keyed caches for loaded resources such as textures and shaders.
//!
//! Caches are ordinary values owned by the application, one per resource
//! type. Ids are handed to nodes with [`Scene::set_resource`]; id zero is
//! never issued, so a node with resource zero is one whose resource has not
//! loaded yet.
//!
//! [`Scene::set_resource`]: crate::scene::Scene::set_resource

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{error::Result, node::ResourceId};

/// A cache of loaded resources keyed by source path.
#[derive(Debug)]
pub struct ResourceCache<T> {
    /// Path to id.
    ids: HashMap<PathBuf, ResourceId>,
    /// Entries indexed by `id - 1`.
    entries: Vec<(PathBuf, T)>,
}

impl<T> Default for ResourceCache<T> {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<T> ResourceCache<T> {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the cache empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a resource unless the path is already cached. The loader is only
    /// called on a miss.
    pub fn load(
        &mut self,
        path: impl AsRef<Path>,
        loader: impl FnOnce(&Path) -> Result<T>,
    ) -> Result<ResourceId> {
        let path = path.as_ref();
        if let Some(id) = self.ids.get(path) {
            return Ok(*id);
        }
        let value = loader(path)?;
        self.entries.push((path.to_path_buf(), value));
        let id = self.entries.len() as ResourceId;
        self.ids.insert(path.to_path_buf(), id);
        debug!(path = %path.display(), id, "resource loaded");
        Ok(id)
    }

    /// The id of a cached path.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<ResourceId> {
        self.ids.get(path.as_ref()).copied()
    }

    /// The resource for an id, if it exists.
    pub fn try_resolve(&self, id: ResourceId) -> Option<&T> {
        let index = (id as usize).checked_sub(1)?;
        self.entries.get(index).map(|(_, v)| v)
    }

    /// The resource for an id.
    ///
    /// # Panics
    ///
    /// Panics if the id was not issued by this cache. Ids only come from
    /// [`load`](Self::load), so a missing id is a programming error.
    pub fn resolve(&self, id: ResourceId) -> &T {
        match self.try_resolve(id) {
            Some(v) => v,
            None => panic!("resource id {id} was not issued by this cache"),
        }
    }

    /// Reload a cached path in place, keeping its id. Uncached paths are
    /// loaded fresh. On failure the old value stays.
    pub fn reload(
        &mut self,
        path: impl AsRef<Path>,
        loader: impl FnOnce(&Path) -> Result<T>,
    ) -> Result<ResourceId> {
        let path = path.as_ref();
        let Some(id) = self.get(path) else {
            return self.load(path, loader);
        };
        let value = loader(path)?;
        if let Some(entry) = self.entries.get_mut(id as usize - 1) {
            entry.1 = value;
        }
        debug!(path = %path.display(), id, "resource reloaded");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn load_caches_by_path() -> Result<()> {
        let mut cache = ResourceCache::new();
        let mut calls = 0;
        let a = cache.load("a.png", |_| {
            calls += 1;
            Ok(1u8)
        })?;
        let again = cache.load("a.png", |_| Ok(9u8))?;
        let b = cache.load("b.png", |_| Ok(2u8))?;
        assert_eq!(calls, 1);
        assert_eq!(a, again);
        assert_ne!(a, 0);
        assert_ne!(a, b);
        assert_eq!(*cache.resolve(b), 2);
        assert_eq!(cache.get("a.png"), Some(a));
        assert_eq!(cache.get("c.png"), None);
        Ok(())
    }

    #[test]
    fn failed_load_caches_nothing() {
        let mut cache: ResourceCache<u8> = ResourceCache::new();
        let r = cache.load("bad", |_| Err(Error::Invalid("corrupt".into())));
        assert!(r.is_err());
        assert!(cache.is_empty());
        assert_eq!(cache.try_resolve(0), None);
    }

    #[test]
    fn reload_keeps_id() -> Result<()> {
        let mut cache = ResourceCache::new();
        let id = cache.load("shader.wgsl", |_| Ok("v1"))?;
        assert_eq!(cache.reload("shader.wgsl", |_| Ok("v2"))?, id);
        assert_eq!(*cache.resolve(id), "v2");
        assert!(cache.reload("shader.wgsl", |_| Err(Error::Invalid("x".into()))).is_err());
        assert_eq!(*cache.resolve(id), "v2");
        Ok(())
    }

    #[test]
    #[should_panic(expected = "not issued")]
    fn resolve_unknown_panics() {
        let cache: ResourceCache<u8> = ResourceCache::new();
        cache.resolve(3);
    }
}
