//! Debounced address search behind a text input

mod debounce;
mod session;

pub use debounce::Debouncer;
pub use session::{
    FixedLocationProvider, LocationProvider, Typeahead, TypeaheadOptions, TypeaheadState,
    BLUR_HIDE_DELAY, LOCATION_TIMEOUT,
};
