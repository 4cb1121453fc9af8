//! # Observable Map State
//!
//! Holds everything the map view renders: the viewport, the pin list and the
//! last resolved coordinate. Mutations go through [`MapState::apply_candidate`]
//! and every change is published on a `tokio::sync::watch` channel so views
//! can re-render without polling.

use crate::geocode::{Candidate, GeocodeResponse};
use crate::{config::MapConfig, Coordinate, Pin, Region, Span};
use tokio::sync::watch;

/// A point-in-time copy of the map state, as published to subscribers.
#[derive(Clone, Debug, PartialEq)]
pub struct MapSnapshot {
    /// Current viewport
    pub region: Region,
    /// Zero or one pin
    pub pins: Vec<Pin>,
    /// Coordinate of the last successful lookup
    pub last_coordinate: Option<Coordinate>,
}

/// State container for the map view.
///
/// Owned by the UI loop. Not `Clone`: there is exactly one writer.
#[derive(Debug)]
pub struct MapState {
    tx: watch::Sender<MapSnapshot>,
}

impl MapState {
    /// Initial state: the configured default viewport with a single pin at its
    /// center.
    pub fn new(config: &MapConfig) -> Self {
        let region = config.default_region();
        let pins = vec![Pin::new(config.default_pin_name.clone(), region.center)];
        Self::with_snapshot(MapSnapshot {
            region,
            pins,
            last_coordinate: None,
        })
    }

    pub fn with_snapshot(snapshot: MapSnapshot) -> Self {
        let (tx, _rx) = watch::channel(snapshot);
        Self { tx }
    }

    /// Receiver that observes every subsequent change.
    pub fn subscribe(&self) -> watch::Receiver<MapSnapshot> {
        self.tx.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> MapSnapshot {
        self.tx.borrow().clone()
    }

    pub fn region(&self) -> Region {
        self.tx.borrow().region
    }

    pub fn pins(&self) -> Vec<Pin> {
        self.tx.borrow().pins.clone()
    }

    pub fn last_coordinate(&self) -> Option<Coordinate> {
        self.tx.borrow().last_coordinate
    }

    /// Apply a decoded lookup response. Returns `false` and changes nothing
    /// when the response carries no candidates.
    pub fn apply_response(&mut self, response: GeocodeResponse, zoom_delta: f64) -> bool {
        match response.into_first() {
            Some(candidate) => {
                self.apply_candidate(&candidate, zoom_delta);
                true
            }
            None => false,
        }
    }

    /// Center the viewport on `candidate` with a `zoom_delta` span and make it
    /// the only pin.
    pub fn apply_candidate(&mut self, candidate: &Candidate, zoom_delta: f64) {
        let coordinate = Coordinate::new(candidate.latitude, candidate.longitude);
        let name = candidate.name.clone().unwrap_or_default();

        self.tx.send_modify(|state| {
            state.last_coordinate = Some(coordinate);
            state.region = Region {
                center: coordinate,
                span: Span::uniform(zoom_delta),
            };
            state.pins.clear();
            state.pins.push(Pin::new(name, coordinate));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn paris() -> Candidate {
        Candidate {
            latitude: 48.8566,
            longitude: 2.3522,
            name: Some("Paris".to_string()),
        }
    }

    #[test]
    fn test_initial_state_has_default_pin() {
        let state = MapState::new(&Config::default().map);
        let pins = state.pins();
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].name, "Pin");
        assert_eq!(pins[0].coordinate, state.region().center);
        assert_eq!(state.region().span, Span::uniform(5.0));
        assert_eq!(state.last_coordinate(), None);
    }

    #[test]
    fn test_apply_paris_replaces_pin_and_viewport() {
        let mut state = MapState::new(&Config::default().map);
        let response = GeocodeResponse {
            data: vec![paris()],
        };

        assert!(state.apply_response(response, 0.5));

        let pins = state.pins();
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].name, "Paris");
        assert_eq!(pins[0].coordinate, Coordinate::new(48.8566, 2.3522));
        assert_eq!(state.region().center, Coordinate::new(48.8566, 2.3522));
        assert_eq!(state.region().span, Span::uniform(0.5));
        assert_eq!(
            state.last_coordinate(),
            Some(Coordinate::new(48.8566, 2.3522))
        );
    }

    #[test]
    fn test_empty_response_leaves_state_unchanged() {
        let mut state = MapState::new(&Config::default().map);
        let before = state.snapshot();

        assert!(!state.apply_response(GeocodeResponse { data: vec![] }, 0.5));

        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_missing_name_becomes_empty_string() {
        let mut state = MapState::new(&Config::default().map);
        let candidate = Candidate {
            name: None,
            ..paris()
        };
        state.apply_candidate(&candidate, 0.1);
        assert_eq!(state.pins()[0].name, "");
    }

    #[test]
    fn test_each_apply_creates_fresh_pin_identity() {
        let mut state = MapState::new(&Config::default().map);
        state.apply_candidate(&paris(), 0.5);
        let first = state.pins()[0].id;
        state.apply_candidate(&paris(), 0.5);
        let pins = state.pins();
        assert_eq!(pins.len(), 1);
        assert_ne!(pins[0].id, first);
    }

    #[test]
    fn test_subscribers_see_changes() {
        let mut state = MapState::new(&Config::default().map);
        let mut rx = state.subscribe();
        assert!(!rx.has_changed().unwrap());

        state.apply_candidate(&paris(), 0.5);

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().pins[0].name, "Paris");
    }
}
