use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::debounce::Debouncer;
use crate::config::Config;
use crate::places::{
    is_searchable, AutocompleteOptions, LatLng, LocationData, PlaceSearch, PlacesError, Prediction,
};

/// Delay before suggestions are hidden after the input loses focus
pub const BLUR_HIDE_DELAY: Duration = Duration::from_millis(150);

/// Give up on the device position after this long
pub const LOCATION_TIMEOUT: Duration = Duration::from_secs(15);

const NETWORK_ERROR: &str = "Network error occurred";
const LOCATION_ERROR: &str = "Unable to get current location";

/// Source of the device's own position
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<LatLng>;
}

/// Location provider returning a preset position, or failing when there is none
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationProvider(Option<LatLng>);

impl FixedLocationProvider {
    pub fn new(position: Option<LatLng>) -> Self {
        Self(position)
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_position(&self) -> Result<LatLng> {
        self.0
            .ok_or_else(|| anyhow::anyhow!("Location services are unavailable"))
    }
}

/// Typeahead settings
#[derive(Debug, Clone)]
pub struct TypeaheadOptions {
    pub debounce: Duration,
    pub max_results: usize,
    pub autocomplete: AutocompleteOptions,
    /// Shown as the query when the current location is picked
    pub current_location_text: String,
}

impl Default for TypeaheadOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            max_results: 5,
            autocomplete: AutocompleteOptions {
                country_code: Some("BR".to_string()),
                ..AutocompleteOptions::default()
            },
            current_location_text: "Use current location".to_string(),
        }
    }
}

impl TypeaheadOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            max_results: config.max_results,
            autocomplete: AutocompleteOptions {
                country_code: Some(config.country_code.clone()).filter(|c| !c.is_empty()),
                ..AutocompleteOptions::default()
            },
            ..Self::default()
        }
    }
}

/// Observable typeahead state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeaheadState {
    pub query: String,
    pub predictions: Vec<Prediction>,
    pub is_loading: bool,
    pub show_suggestions: bool,
    pub error: Option<String>,
}

struct Shared {
    places: Arc<dyn PlaceSearch>,
    options: TypeaheadOptions,
    state: watch::Sender<TypeaheadState>,
    // Bumped whenever the query changes hands; results from older generations are dropped.
    generation: AtomicU64,
}

impl Shared {
    fn update(&self, f: impl FnOnce(&mut TypeaheadState)) {
        self.state.send_modify(f);
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Applies `f` only if `generation` is still current, checked under the state lock
    ///
    /// Every other writer bumps the generation before taking the lock, so a
    /// stale search can never land on top of a newer query.
    fn update_if_current(&self, generation: u64, f: impl FnOnce(&mut TypeaheadState)) -> bool {
        self.state.send_if_modified(|s| {
            if !self.is_current(generation) {
                return false;
            }
            f(s);
            true
        })
    }
}

fn error_message(err: &PlacesError) -> String {
    match err {
        PlacesError::Status { message, .. } => message.clone(),
        PlacesError::Transport(_) | PlacesError::Decode(_) => NETWORK_ERROR.to_string(),
        PlacesError::InvalidRequest(_) => err.to_string(),
    }
}

async fn run_search(shared: Arc<Shared>, query: String, generation: u64) {
    if !is_searchable(&query) {
        shared.update_if_current(generation, |s| {
            s.predictions.clear();
            s.is_loading = false;
        });
        return;
    }

    let started = shared.update_if_current(generation, |s| {
        s.is_loading = true;
        s.error = None;
    });
    if !started {
        return;
    }

    let result = shared
        .places
        .autocomplete(&query, &shared.options.autocomplete, shared.options.max_results)
        .await;

    let applied = shared.update_if_current(generation, |s| {
        match result {
            Ok(predictions) => s.predictions = predictions,
            Err(err) => {
                warn!("Address search failed: {}", err);
                s.error = Some(error_message(&err));
                s.predictions.clear();
            }
        }
        s.is_loading = false;
    });
    if !applied {
        debug!("Discarding stale suggestions for {:?}", query);
    }
}

/// Debounced address search session behind a text input
pub struct Typeahead {
    shared: Arc<Shared>,
    search_timer: Debouncer,
    blur_timer: Debouncer,
}

impl Typeahead {
    pub fn new(places: Arc<dyn PlaceSearch>, options: TypeaheadOptions) -> Self {
        let (state, _) = watch::channel(TypeaheadState::default());
        let search_timer = Debouncer::new(options.debounce);
        Self {
            shared: Arc::new(Shared {
                places,
                options,
                state,
                generation: AtomicU64::new(0),
            }),
            search_timer,
            blur_timer: Debouncer::new(BLUR_HIDE_DELAY),
        }
    }

    /// Returns a snapshot of the current state
    pub fn state(&self) -> TypeaheadState {
        self.shared.state.borrow().clone()
    }

    /// Returns a receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<TypeaheadState> {
        self.shared.state.subscribe()
    }

    /// Records new input text and schedules a search once typing pauses
    pub fn input_changed(&self, text: &str) {
        let generation = self.shared.next_generation();
        self.shared.update(|s| {
            s.query = text.to_string();
            s.show_suggestions = true;
        });

        // Only the timer is cancelled; a search that already started finishes
        // and is discarded by its generation.
        let shared = Arc::clone(&self.shared);
        let query = text.to_string();
        self.search_timer.schedule(async move {
            tokio::spawn(run_search(shared, query, generation));
        });
    }

    /// Picks a suggestion and resolves it to a location
    ///
    /// Returns `None` when the place lookup fails.
    pub async fn select_prediction(&self, prediction: &Prediction) -> Option<LocationData> {
        self.search_timer.cancel();
        self.shared.next_generation();
        self.shared.update(|s| {
            s.query = prediction.description.clone();
            s.show_suggestions = false;
            s.predictions.clear();
            s.is_loading = false;
        });

        match self.shared.places.place_details(&prediction.place_id).await {
            Ok(location) => Some(location),
            Err(err) => {
                warn!("Error fetching place details: {}", err);
                None
            }
        }
    }

    /// Picks the device's own position
    pub async fn use_current_location(&self, provider: &dyn LocationProvider) -> Option<LocationData> {
        self.search_timer.cancel();
        self.shared.next_generation();
        let text = self.shared.options.current_location_text.clone();
        self.shared.update(|s| {
            s.query = text.clone();
            s.show_suggestions = false;
            s.predictions.clear();
            s.is_loading = false;
        });

        let position = match tokio::time::timeout(LOCATION_TIMEOUT, provider.current_position()).await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!("Timed out waiting for a position")),
        };

        match position {
            Ok(location) => Some(LocationData::current(text, location)),
            Err(err) => {
                warn!("Error getting current location: {:#}", err);
                self.shared.update(|s| s.error = Some(LOCATION_ERROR.to_string()));
                None
            }
        }
    }

    /// Empties the input and drops any pending search
    pub fn clear(&self) {
        self.search_timer.cancel();
        self.shared.next_generation();
        self.shared.update(|s| {
            s.query.clear();
            s.predictions.clear();
            s.show_suggestions = false;
            s.is_loading = false;
            s.error = None;
        });
    }

    /// Hides suggestions shortly after the input loses focus
    pub fn blur(&self) {
        let shared = Arc::clone(&self.shared);
        self.blur_timer.schedule(async move {
            shared.update(|s| s.show_suggestions = false);
        });
    }

    /// Shows suggestions again when the input regains focus
    pub fn focus(&self) {
        self.blur_timer.cancel();
        self.shared.update(|s| s.show_suggestions = true);
    }
}
