//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Itinerary generation prompt (Handlebars, expects `destination`)
pub const ITINERARY: &str = include_str!("../../prompts/itinerary.pmt");

/// Travel-expert persona sent as the system message
pub const SYSTEM: &str = include_str!("../../prompts/system.pmt");

/// Names of every embedded template
pub const NAMES: &[&str] = &["itinerary", "system"];

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "itinerary" => Some(ITINERARY),
        "system" => Some(SYSTEM),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
