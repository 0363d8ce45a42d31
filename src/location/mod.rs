//! Named pan/tilt locations.

mod registry;

pub use registry::{Location, LocationRegistry, HOME};
