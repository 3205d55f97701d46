//! Address autocomplete and place lookup

mod client;
mod types;

pub use client::{
    is_searchable, PlaceSearch, PlacesClient, PlacesError, DEFAULT_ERROR_MESSAGE, MIN_QUERY_CHARS,
};
pub use types::{
    AddressComponent, AutocompleteOptions, Geometry, LatLng, LocationData, MatchedSubstring,
    PlaceDetails, PlaceType, Prediction, StructuredFormatting, Term,
};

#[cfg(test)]
pub use client::mock;
