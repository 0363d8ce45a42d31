//! Location registry for named pan/tilt lookup.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{LocationError, Result};

/// Name of the location the servos are homed to at startup.
pub const HOME: &str = "home";

/// A saved pan/tilt pair.
///
/// Values are stored as captured; they are clamped against the limits in
/// force when the location is visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Pan angle in degrees.
    pub pan: i32,
    /// Tilt angle in degrees.
    pub tilt: i32,
}

impl Location {
    /// Create a new location.
    pub const fn new(pan: i32, tilt: i32) -> Self {
        Self { pan, tilt }
    }
}

/// Registry for named locations, in insertion order.
///
/// Removing a location keeps the remaining ones in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationRegistry {
    locations: IndexMap<String, Location>,
}

impl LocationRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a location, returning the previous value.
    ///
    /// An overwritten location keeps its place in the order.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty.
    pub fn insert(&mut self, name: &str, location: Location) -> Result<Option<Location>> {
        if name.is_empty() {
            return Err(LocationError::InvalidName(name.into()).into());
        }
        Ok(self.locations.insert(name.to_string(), location))
    }

    /// Get a location by name.
    pub fn get(&self, name: &str) -> Option<&Location> {
        self.locations.get(name)
    }

    /// Check if a location exists.
    pub fn contains(&self, name: &str) -> bool {
        self.locations.contains_key(name)
    }

    /// Remove a location by name.
    pub fn remove(&mut self, name: &str) -> Option<Location> {
        self.locations.shift_remove(name)
    }

    /// Get the number of saved locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Get an iterator over location names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.locations.keys().map(String::as_str)
    }

    /// Get an iterator over locations.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Location)> {
        self.locations.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_insert_and_overwrite() {
        let mut registry = LocationRegistry::new();

        assert_eq!(registry.insert("door", Location::new(10, 20)).unwrap(), None);
        let previous = registry.insert("door", Location::new(30, 40)).unwrap();

        assert_eq!(previous, Some(Location::new(10, 20)));
        assert_eq!(registry.get("door"), Some(&Location::new(30, 40)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut registry = LocationRegistry::new();
        assert!(registry.remove("nowhere").is_none());
    }

    #[test]
    fn test_rejects_empty_name() {
        let mut registry = LocationRegistry::new();

        assert!(matches!(
            registry.insert("", Location::new(0, 0)),
            Err(Error::Location(LocationError::InvalidName(_)))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_long_names_and_many_entries() {
        let mut registry = LocationRegistry::new();
        let long = "living room window looking at the driveway";
        registry.insert(long, Location::new(5, 6)).unwrap();
        for i in 0..100 {
            registry.insert(&format!("loc{i}"), Location::new(i, 0)).unwrap();
        }

        assert_eq!(registry.len(), 101);
        assert_eq!(registry.get(long), Some(&Location::new(5, 6)));
        assert_eq!(registry.get("loc99"), Some(&Location::new(99, 0)));
    }

    #[test]
    fn test_names_keep_insertion_order() {
        let mut registry = LocationRegistry::new();
        registry.insert(HOME, Location::new(60, 45)).unwrap();
        registry.insert("window", Location::new(1, 2)).unwrap();
        registry.insert("desk", Location::new(3, 4)).unwrap();
        registry.insert("window", Location::new(5, 6)).unwrap();

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec![HOME, "window", "desk"]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut registry = LocationRegistry::new();
        for name in [HOME, "a", "b", "c"] {
            registry.insert(name, Location::new(0, 0)).unwrap();
        }

        registry.remove(HOME);
        registry.remove("b");

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["a", "c"]);
    }
}
