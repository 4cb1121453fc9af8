//! # UI Event Loop State
//!
//! [`App`] is the single owner of everything the screen shows. Work that
//! happens elsewhere (geocoding requests on spawned tasks, sensor samples on
//! the sensor's own task) reports back through an unbounded channel of
//! [`UiEvent`]s, and the loop applies them one at a time with [`App::handle`].
//!
//! Geocoding requests are fire-and-forget. Nothing tracks which requests are
//! in flight, so when two overlap the one that completes last decides the
//! final map state.

use crate::config::{Config, MapConfig};
use crate::geocode::{Candidate, GeocodeError, GeocodingClient};
use crate::map_state::MapState;
use crate::renderer;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Something that happened off the UI loop and must be applied on it.
#[derive(Debug)]
pub enum UiEvent {
    /// A geocoding request finished (successfully or not)
    GeocodeFinished {
        address: String,
        zoom_delta: f64,
        outcome: Result<Candidate, GeocodeError>,
    },
    /// A normalized heading sample, in degrees
    Heading(f64),
}

pub type UiEventSender = mpsc::UnboundedSender<UiEvent>;

pub struct App {
    map: MapState,
    heading: f64,
    zoom_delta: f64,
    client: GeocodingClient,
    events_tx: UiEventSender,
    events_rx: mpsc::UnboundedReceiver<UiEvent>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self::with_client(GeocodingClient::new(&config.geocoder), &config.map)
    }

    pub fn with_client(client: GeocodingClient, map: &MapConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            map: MapState::new(map),
            heading: 0.0,
            zoom_delta: map.zoom_delta,
            client,
            events_tx,
            events_rx,
        }
    }

    pub fn map(&self) -> &MapState {
        &self.map
    }

    /// Last heading shown by the overlay, in [0, 360).
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Handle for posting events onto the UI loop.
    pub fn events(&self) -> UiEventSender {
        self.events_tx.clone()
    }

    /// Heading callback that marshals samples onto the UI loop.
    pub fn heading_callback(&self) -> impl Fn(f64) + Send + Sync + 'static {
        let tx = self.events();
        move |heading| {
            // Closed channel means the UI is gone
            let _ = tx.send(UiEvent::Heading(heading));
        }
    }

    /// The "Find address" button: resolve `address` with the configured zoom.
    pub fn find_address(&self, address: &str) -> JoinHandle<()> {
        self.resolve(address, self.zoom_delta)
    }

    /// Start resolving `address` in the background. The result arrives later
    /// as a [`UiEvent::GeocodeFinished`].
    pub fn resolve(&self, address: &str, zoom_delta: f64) -> JoinHandle<()> {
        let client = self.client.clone();
        let tx = self.events();
        let address = address.to_string();

        tokio::spawn(async move {
            let outcome = client.lookup(&address).await;
            let _ = tx.send(UiEvent::GeocodeFinished {
                address,
                zoom_delta,
                outcome,
            });
        })
    }

    /// Wait for the next event. Never returns `None` while the app is alive,
    /// since the app keeps a sender of its own.
    pub async fn next_event(&mut self) -> Option<UiEvent> {
        self.events_rx.recv().await
    }

    /// Next event if one is already queued.
    pub fn try_next_event(&mut self) -> Option<UiEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Apply an event to the UI state. Failures are logged and change nothing.
    pub fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::GeocodeFinished {
                address,
                zoom_delta,
                outcome,
            } => match outcome {
                Ok(candidate) => {
                    self.map.apply_candidate(&candidate, zoom_delta);
                    log::info!(
                        "Successfully loaded location! {}",
                        candidate.name.as_deref().unwrap_or_default()
                    );
                }
                Err(err) => {
                    log::warn!("Lookup for {address:?} failed: {err}");
                }
            },
            UiEvent::Heading(heading) => {
                self.heading = heading;
            }
        }
    }

    pub fn render(&self, display: &crate::config::DisplayConfig) -> String {
        renderer::render(&self.map.snapshot(), self.heading, display)
    }
}
