//! HTTP middleware.

pub mod tracking;

pub use tracking::{InFlightLayer, InFlightService};
