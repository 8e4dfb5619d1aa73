//! Itinerary document
//!
//! The model's JSON is kept as parsed: extra fields and loosely typed values
//! pass through untouched. Only two things are enforced on the way out. Days
//! are ordered by `day`, and no two days share a coordinate pair.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};

/// Latitude step used to separate repeated coordinates (degrees)
pub const COORDINATE_NUDGE: f64 = 0.0001;

/// Upper bound on nudges for a single day
pub const MAX_NUDGES: u32 = 1000;

/// Coordinates closer than this are treated as identical (degrees)
const COORDINATES_PER_DEGREE: f64 = 1e6;

/// Errors from [`Itinerary::from_value`]
#[derive(Debug, Error)]
pub enum ItineraryError {
    #[error("Model returned an invalid itinerary: {0}")]
    Shape(String),

    #[error("Day {day} has coordinates out of range: latitude {latitude}, longitude {longitude}")]
    OutOfRange { day: Value, latitude: f64, longitude: f64 },

    #[error("Could not separate repeated coordinates for day {day}")]
    Crowded { day: Value },
}

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Numeric `coordinates.latitude`/`coordinates.longitude` of a day entry
    pub fn of_day(day: &Value) -> Option<Self> {
        let coordinates = day.get("coordinates")?;
        Some(Self::new(
            coordinates.get("latitude")?.as_f64()?,
            coordinates.get("longitude")?.as_f64()?,
        ))
    }

    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Only meaningful for in-range coordinates
    fn key(&self) -> (i64, i64) {
        (
            (self.latitude * COORDINATES_PER_DEGREE).round() as i64,
            (self.longitude * COORDINATES_PER_DEGREE).round() as i64,
        )
    }
}

/// A day-ordered itinerary document with unique coordinates per day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Itinerary {
    document: Value,
}

impl Default for Itinerary {
    fn default() -> Self {
        Self {
            document: json!({ "itinerary": [] }),
        }
    }
}

impl Itinerary {
    /// Accept a model document and normalize it in place
    ///
    /// The document must be an object whose `itinerary` is an array of
    /// objects; everything else about it is left as the model wrote it.
    pub fn from_value(document: Value) -> Result<Self, ItineraryError> {
        debug!("Itinerary::from_value: called");
        let days = document
            .get("itinerary")
            .and_then(Value::as_array)
            .ok_or_else(|| ItineraryError::Shape("expected an object with an \"itinerary\" array".to_string()))?;
        if !days.iter().all(Value::is_object) {
            return Err(ItineraryError::Shape("every itinerary day must be an object".to_string()));
        }

        let mut itinerary = Self { document };
        itinerary.normalize()?;
        Ok(itinerary)
    }

    pub fn days(&self) -> &[Value] {
        self.document
            .get("itinerary")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn days_mut(&mut self) -> Option<&mut Vec<Value>> {
        self.document.get_mut("itinerary").and_then(Value::as_array_mut)
    }

    pub fn len(&self) -> usize {
        self.days().len()
    }

    pub fn is_empty(&self) -> bool {
        self.days().is_empty()
    }

    pub fn as_value(&self) -> &Value {
        &self.document
    }

    pub fn into_value(self) -> Value {
        self.document
    }

    /// Sort days and make coordinates unique; returns the number of days moved
    pub fn normalize(&mut self) -> Result<usize, ItineraryError> {
        if let Some(days) = self.days_mut() {
            // Days without a numeric `day` keep their relative order at the end
            days.sort_by(|a, b| match (a["day"].as_f64(), b["day"].as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        }
        self.ensure_distinct_coordinates()
    }

    /// Nudge the latitude of any day whose coordinates repeat an earlier day's
    ///
    /// Out-of-range coordinates are rejected before anything is moved.
    pub fn ensure_distinct_coordinates(&mut self) -> Result<usize, ItineraryError> {
        debug!(days = self.len(), "Itinerary::ensure_distinct_coordinates: called");
        for day in self.days() {
            if let Some(c) = Coordinates::of_day(day).filter(|c| !c.in_range()) {
                return Err(ItineraryError::OutOfRange {
                    day: day["day"].clone(),
                    latitude: c.latitude,
                    longitude: c.longitude,
                });
            }
        }

        let Some(days) = self.days_mut() else {
            return Ok(0);
        };
        let mut seen = HashSet::new();
        let mut adjusted = 0;

        for day in days.iter_mut() {
            let Some(original) = Coordinates::of_day(day) else {
                continue;
            };
            // Step toward the equator so the result stays in range
            let step = if original.latitude > 0.0 {
                -COORDINATE_NUDGE
            } else {
                COORDINATE_NUDGE
            };

            let mut moved = original;
            let mut attempts = 0;
            while !seen.insert(moved.key()) {
                if attempts == MAX_NUDGES {
                    return Err(ItineraryError::Crowded { day: day["day"].clone() });
                }
                attempts += 1;
                let latitude = original.latitude + step * f64::from(attempts);
                moved.latitude = (latitude * COORDINATES_PER_DEGREE).round() / COORDINATES_PER_DEGREE;
            }

            if attempts > 0 {
                warn!(
                    day = %day["day"],
                    from_latitude = original.latitude,
                    to_latitude = moved.latitude,
                    "Repeated coordinates adjusted"
                );
                day["coordinates"]["latitude"] = json!(moved.latitude);
                adjusted += 1;
            }
        }

        Ok(adjusted)
    }

    /// True when no two days share a coordinate pair
    pub fn has_distinct_coordinates(&self) -> bool {
        let mut seen = HashSet::new();
        self.days()
            .iter()
            .filter_map(Coordinates::of_day)
            .all(|c| seen.insert(c.key()))
    }
}
