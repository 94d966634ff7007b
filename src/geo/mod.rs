//! Geographic anchoring of the local smoke scene in Web-Mercator space

pub mod mercator;
pub mod anchor;

pub use mercator::{circumference_at_latitude, MercatorCoordinate};
pub use anchor::{GeoAnchor, ModelTransform};
