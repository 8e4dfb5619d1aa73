//! Domain types shared by the tools and the HTTP layer

mod itinerary;

pub use itinerary::{COORDINATE_NUDGE, Coordinates, Itinerary, ItineraryError, MAX_NUDGES};
