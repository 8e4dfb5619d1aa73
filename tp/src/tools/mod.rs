//! Tool system for TripPlanner
//!
//! The model may ask for a capability by name instead of answering in prose.
//! The `ToolRegistry` holds every capability, the `ToolDispatcher` runs the
//! calls a response requests and records one outcome per call.

mod dispatcher;
mod error;
mod registry;

pub mod itinerary;
pub mod sanitize;

pub use dispatcher::{ToolDispatcher, ToolOutcome};
pub use error::ToolError;
pub use itinerary::{ItineraryOutcome, ItineraryTool};
pub use registry::{Capability, ToolRegistry};
