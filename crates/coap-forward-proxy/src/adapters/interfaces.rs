//! # Interface Registry Adapter
//!
//! A fixed list of interface ids, taken from configuration.

use crate::domain::InterfaceId;
use crate::ports::InterfaceRegistry;

/// Interface registry backed by a static list.
///
/// Duplicate ids are collapsed; order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticInterfaceRegistry {
    ids: Vec<InterfaceId>,
}

impl StaticInterfaceRegistry {
    /// Create a registry from interface ids.
    pub fn new(ids: impl IntoIterator<Item = InterfaceId>) -> Self {
        let mut ids: Vec<_> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> &[InterfaceId] {
        &self.ids
    }
}

impl InterfaceRegistry for StaticInterfaceRegistry {
    fn count(&self) -> usize {
        self.ids.len()
    }

    fn contains(&self, id: InterfaceId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    fn sole(&self) -> Option<InterfaceId> {
        match self.ids.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}
