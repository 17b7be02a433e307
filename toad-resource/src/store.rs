use toad_array::Array;
use toad_len::Len;

use crate::path;
use crate::platform::PlatformTypes;
use crate::resource::Resource;

/// The backing collection cannot hold another resource
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Exhausted;

/// A flat, ordered collection of [`Resource`]s.
///
/// Paths are unique (callers check before [`insert`](Store::insert)ing)
/// and stored trimmed; lookups trim the path they are handed, so
/// callers never need to pre-normalize.
///
/// Lookup is a linear scan. The deployments this crate targets hold
/// tens of resources; anything cleverer costs more code and memory
/// than it saves.
pub struct Store<P: PlatformTypes> {
  resources: P::Resources,
}

impl<P: PlatformTypes> Default for Store<P> {
  fn default() -> Self {
    Self { resources: Default::default() }
  }
}

impl<P: PlatformTypes> core::fmt::Debug for Store<P> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Store")
     .field("resources", &self.resources)
     .finish()
  }
}

impl<P: PlatformTypes> Store<P> {
  /// An empty store
  pub fn new() -> Self {
    Default::default()
  }

  /// How many resources the store holds
  pub fn len(&self) -> usize {
    self.resources.len()
  }

  /// Whether the store holds no resources
  pub fn is_empty(&self) -> bool {
    self.resources.is_empty()
  }

  /// Add a resource to the front of the store.
  ///
  /// Uniqueness is **not** checked here; callers must have
  /// established that no resource with this path exists.
  pub fn insert(&mut self, resource: Resource<P>) -> Result<(), Exhausted> {
    if self.resources.is_full() {
      return Err(Exhausted);
    }

    self.resources.insert_at(0, resource);
    Ok(())
  }

  /// The position of the resource at exactly this path (trimmed)
  pub fn index_of(&self, path: &[u8]) -> Option<usize> {
    if path.is_empty() {
      return None;
    }

    let path = path::trim(path);
    self.resources
        .iter()
        .position(|r| r.path.len() == path.len() && &r.path[..] == path)
  }

  /// The position of any resource living strictly below this path,
  /// i.e. whose path is `path` + `/` + more.
  ///
  /// Which one you get when several match is unspecified; callers
  /// remove and re-ask until there are none.
  pub fn index_of_subresource(&self, path: &[u8]) -> Option<usize> {
    if path.is_empty() {
      return None;
    }

    let path = path::trim(path);
    self.resources
        .iter()
        .position(|r| {
          r.path.len() > path.len() && r.path[path.len()] == b'/' && &r.path[..path.len()] == path
        })
  }

  /// Borrow the resource at exactly this path
  pub fn find(&self, path: &[u8]) -> Option<&Resource<P>> {
    self.index_of(path).and_then(|ix| self.get(ix))
  }

  /// Mutably borrow the resource at exactly this path
  pub fn find_mut(&mut self, path: &[u8]) -> Option<&mut Resource<P>> {
    match self.index_of(path) {
      | Some(ix) => self.get_mut(ix),
      | None => None,
    }
  }

  /// Borrow the resource at this position
  pub fn get(&self, ix: usize) -> Option<&Resource<P>> {
    self.resources.get(ix)
  }

  /// Mutably borrow the resource at this position
  pub fn get_mut(&mut self, ix: usize) -> Option<&mut Resource<P>> {
    self.resources.get_mut(ix)
  }

  /// Remove & yield the resource at exactly this path
  pub fn remove(&mut self, path: &[u8]) -> Option<Resource<P>> {
    match self.index_of(path) {
      | Some(ix) => self.resources.remove(ix),
      | None => None,
    }
  }

  /// Remove & yield some resource living strictly below this path
  pub fn remove_subresource(&mut self, path: &[u8]) -> Option<Resource<P>> {
    match self.index_of_subresource(path) {
      | Some(ix) => self.resources.remove(ix),
      | None => None,
    }
  }

  /// Iterate the resources, most recently inserted first
  pub fn iter(&self) -> core::slice::Iter<'_, Resource<P>> {
    self.resources.iter()
  }
}
