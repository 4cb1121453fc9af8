//! # Compass Map Core Library
//!
//! This library provides the data model and the two side-effecting integrations
//! of the compass map application: an HTTP geocoding client and a heading
//! sensor subscription.
//!
//! ## Design Philosophy
//!
//! ### Single UI Owner
//! - **One mutation site**: All UI state ([`map_state::MapState`], the displayed
//!   heading) is owned by the UI loop in [`app`] and mutated only there
//! - **Marshaled completions**: Network results and sensor samples are sent to
//!   the UI loop over a channel instead of touching state from other tasks
//! - **No locks**: Because every mutation is serialized onto the loop task
//!
//! ### Failure Handling
//! Every failure mode (bad URL, transport error, undecodable body, address not
//! found, missing sensor) is logged and leaves the prior state untouched. There
//! is no retry, no user-visible alert and no crash.
//!
//! ### Data Flow
//! 1. **Query**: User text → [`geocode::build_request_url`] → one HTTP GET
//! 2. **Decode**: JSON envelope → first candidate only
//! 3. **Apply**: UI loop replaces the viewport and the single pin
//! 4. **Heading**: Sensor sample → [`heading::normalize_heading`] → overlay label
//!
//! ## Core Types
//!
//! - [`Coordinate`]: A latitude/longitude pair in degrees
//! - [`Span`]: Angular extent of a viewport
//! - [`Region`]: Map viewport (center plus span)
//! - [`Pin`]: A single labeled marker

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Module declarations
pub mod app;
pub mod config;
pub mod geocode;
pub mod heading;
pub mod map_state;
pub mod renderer;
pub mod sensors;

/// A point on the globe in decimal degrees.
///
/// # Example
/// ```
/// use compass_map_lib::Coordinate;
///
/// let paris = Coordinate::new(48.8566, 2.3522);
/// assert_eq!(paris.latitude, 48.8566);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north
    pub latitude: f64,
    /// Longitude in degrees, positive east
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Angular extent of a viewport. Smaller deltas mean a closer zoom.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Span {
    /// Square span using the same delta on both axes.
    pub fn uniform(delta: f64) -> Self {
        Self {
            latitude_delta: delta,
            longitude_delta: delta,
        }
    }
}

/// The visible map area.
///
/// # Example
/// ```
/// use compass_map_lib::{Coordinate, Region, Span};
///
/// let region = Region {
///     center: Coordinate::new(51.507222, -0.1275),
///     span: Span::uniform(5.0),
/// };
///
/// assert!(region.contains(Coordinate::new(52.0, 0.0)));
/// assert!(!region.contains(Coordinate::new(48.8566, 2.3522)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: Coordinate,
    pub span: Span,
}

impl Region {
    /// Whether `coordinate` falls inside the viewport (edges included).
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        let half_lat = self.span.latitude_delta / 2.0;
        let half_lon = self.span.longitude_delta / 2.0;
        (coordinate.latitude - self.center.latitude).abs() <= half_lat
            && (coordinate.longitude - self.center.longitude).abs() <= half_lon
    }
}

/// A labeled marker on the map. Display-only: the identity is generated on
/// creation and is never looked up.
#[derive(Clone, Debug, PartialEq)]
pub struct Pin {
    pub id: Uuid,
    /// Display name, empty when the geocoder returned none
    pub name: String,
    pub coordinate: Coordinate,
}

impl Pin {
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            coordinate,
        }
    }
}
