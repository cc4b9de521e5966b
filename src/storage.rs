//! Concurrent storage behind the container
//!
//! Uses DashMap with ahash for lock-free reads. Accessors clone values out of
//! the maps so no shard guard is ever held while user code runs.

use crate::binding::Binding;
use crate::constructor::Constructor;
use crate::factory::ServiceFactory;
use crate::scope::Scope;
use crate::Instance;
use ahash::{AHashMap, RandomState};
use dashmap::DashMap;
use std::sync::Arc;

/// Shard count for the service maps.
///
/// Default DashMap uses num_cpus * 4 shards which is overkill for
/// typical containers with a few dozen services.
const SHARDS: usize = 8;

fn map<K: Eq + std::hash::Hash, V>() -> DashMap<K, V, RandomState> {
    DashMap::with_capacity_and_hasher_and_shard_amount(0, RandomState::new(), SHARDS)
}

/// Binding registry, caches, factories and the constructor table.
pub(crate) struct ServiceStorage {
    bindings: DashMap<String, Binding, RandomState>,
    instances: DashMap<String, Instance, RandomState>,
    scoped: DashMap<Scope, AHashMap<String, Instance>, RandomState>,
    factories: DashMap<String, Arc<dyn ServiceFactory>, RandomState>,
    constructors: DashMap<String, Arc<Constructor>, RandomState>,
}

impl ServiceStorage {
    pub fn new() -> Self {
        Self {
            bindings: map(),
            instances: map(),
            scoped: map(),
            factories: map(),
            constructors: map(),
        }
    }

    // -- bindings ------------------------------------------------------------

    pub fn insert_binding(&self, binding: Binding) {
        self.bindings.insert(binding.abstract_id.clone(), binding);
    }

    pub fn binding(&self, id: &str) -> Option<Binding> {
        self.bindings.get(id).map(|b| b.value().clone())
    }

    // -- instance cache ------------------------------------------------------

    pub fn insert_instance(&self, id: &str, instance: Instance) {
        self.instances.insert(id.to_owned(), instance);
    }

    /// Store unless another resolution got there first; returns the kept instance
    pub fn cache_instance(&self, id: &str, instance: Instance) -> Instance {
        Arc::clone(self.instances.entry(id.to_owned()).or_insert(instance).value())
    }

    pub fn instance(&self, id: &str) -> Option<Instance> {
        self.instances.get(id).map(|i| Arc::clone(i.value()))
    }

    pub fn remove_instance(&self, id: &str) -> bool {
        self.instances.remove(id).is_some()
    }

    // -- scoped cache --------------------------------------------------------

    pub fn scoped_instance(&self, scope: Scope, id: &str) -> Option<Instance> {
        self.scoped
            .get(&scope)
            .and_then(|entries| entries.get(id).map(Arc::clone))
    }

    pub fn cache_scoped(&self, scope: Scope, id: &str, instance: Instance) -> Instance {
        let mut entries = self.scoped.entry(scope).or_default();
        Arc::clone(entries.entry(id.to_owned()).or_insert(instance))
    }

    /// Drop every instance cached for the scope; returns how many were held
    pub fn clear_scope(&self, scope: Scope) -> usize {
        self.scoped
            .remove(&scope)
            .map(|(_, entries)| entries.len())
            .unwrap_or(0)
    }

    // -- factories -----------------------------------------------------------

    pub fn insert_factory(&self, id: &str, factory: Arc<dyn ServiceFactory>) {
        self.factories.insert(id.to_owned(), factory);
    }

    pub fn factory(&self, id: &str) -> Option<Arc<dyn ServiceFactory>> {
        self.factories.get(id).map(|f| Arc::clone(f.value()))
    }

    // -- constructor table ---------------------------------------------------

    pub fn insert_constructor(&self, constructor: Constructor) {
        self.constructors
            .insert(constructor.type_id().to_owned(), Arc::new(constructor));
    }

    pub fn constructor(&self, id: &str) -> Option<Arc<Constructor>> {
        self.constructors.get(id).map(|c| Arc::clone(c.value()))
    }

    pub fn is_defined(&self, id: &str) -> bool {
        self.constructors.contains_key(id)
    }

    // -- queries -------------------------------------------------------------

    /// Bound, cached or produced by a factory
    pub fn has(&self, id: &str) -> bool {
        self.bindings.contains_key(id)
            || self.instances.contains_key(id)
            || self.factories.contains_key(id)
    }

    /// Whether autowiring can produce the identifier
    pub fn is_resolvable(&self, id: &str) -> bool {
        self.has(id)
            || self
                .constructors
                .get(id)
                .map(|c| c.is_instantiable())
                .unwrap_or(false)
    }

    pub fn binding_ids(&self) -> Vec<String> {
        self.bindings.iter().map(|b| b.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.len() + self.instances.len() + self.factories.len()
    }

    /// Remove bindings, instances, scoped instances and factories.
    ///
    /// The constructor table is kept: types stay known.
    pub fn clear(&self) {
        self.bindings.clear();
        self.instances.clear();
        self.scoped.clear();
        self.factories.clear();
    }
}

impl Default for ServiceStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ServiceStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceStorage")
            .field("bindings", &self.bindings.len())
            .field("instances", &self.instances.len())
            .field("scopes", &self.scoped.len())
            .field("factories", &self.factories.len())
            .field("constructors", &self.constructors.len())
            .finish()
    }
}
