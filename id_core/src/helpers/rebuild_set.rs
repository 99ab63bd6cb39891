use std::{collections::HashSet, hash::Hash};

/// Collects requests to rebuild live geometry until the renderer picks them up.
///
/// A request with neighbours wins over one without for the same key.
pub struct RebuildSet<T: Eq + Hash> {
    _requested: HashSet<T>,
    _with_neighbours: HashSet<T>,
}

impl<T: Eq + Hash> Default for RebuildSet<T> {
    fn default() -> Self {
        Self {
            _requested: HashSet::new(),
            _with_neighbours: HashSet::new(),
        }
    }
}

impl<T: Eq + Hash + Copy> RebuildSet<T> {
    pub fn request(&mut self, key: T, include_neighbours: bool) {
        self._requested.insert(key);
        if include_neighbours {
            self._with_neighbours.insert(key);
        }
    }

    /// Returns every pending request and empties the set.
    pub fn drain(&mut self) -> Vec<(T, bool)> {
        let with_neighbours = std::mem::take(&mut self._with_neighbours);
        self._requested
            .drain()
            .map(|key| (key, with_neighbours.contains(&key)))
            .collect()
    }
}
