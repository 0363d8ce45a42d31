//! Managed state: axis limits and saved locations.
//!
//! This is the document persisted by [`crate::store::StateStore`].

use serde::{Deserialize, Serialize};

use crate::location::{Location, LocationRegistry, HOME};
use crate::servo::Axis;

use super::limits::AxisLimits;

/// Limits for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLimitsPair {
    /// Pan axis limits.
    pub pan: AxisLimits,
    /// Tilt axis limits.
    pub tilt: AxisLimits,
}

impl AxisLimitsPair {
    /// Limits for `axis`.
    #[inline]
    pub fn get(&self, axis: Axis) -> &AxisLimits {
        match axis {
            Axis::Pan => &self.pan,
            Axis::Tilt => &self.tilt,
        }
    }

    /// Mutable limits for `axis`.
    #[inline]
    pub fn get_mut(&mut self, axis: Axis) -> &mut AxisLimits {
        match axis {
            Axis::Pan => &mut self.pan,
            Axis::Tilt => &mut self.tilt,
        }
    }
}

impl Default for AxisLimitsPair {
    fn default() -> Self {
        Self {
            pan: AxisLimits::pan_default(),
            tilt: AxisLimits::tilt_default(),
        }
    }
}

/// Process-wide mutable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Per-axis limits.
    pub position: AxisLimitsPair,

    /// Saved locations.
    #[serde(default)]
    pub locations: LocationRegistry,
}

impl AppState {
    /// Limits for `axis`.
    #[inline]
    pub fn limits(&self, axis: Axis) -> &AxisLimits {
        self.position.get(axis)
    }

    /// The reserved home location, if present.
    pub fn home(&self) -> Option<Location> {
        self.locations.get(HOME).copied()
    }
}

impl Default for AppState {
    fn default() -> Self {
        let mut locations = LocationRegistry::new();
        // Capacity is far above one entry; the insert cannot fail.
        let _ = locations.insert(HOME, Location::new(60, 45));
        Self {
            position: AxisLimitsPair::default(),
            locations,
        }
    }
}
