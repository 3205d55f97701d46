// Client core for the parking spot service: backend API access, address
// search and the key-case conversion between the two worlds.

pub mod api;
pub mod auth;
pub mod config;
pub mod parking;
pub mod places;
pub mod transcode;
pub mod typeahead;

#[cfg(test)]
mod testutil;

pub use api::{ApiClient, FetchError, FetchErrorKind, FetchResult, RequestOptions};
pub use parking::ParkingApi;
pub use places::{PlaceSearch, PlacesClient};
pub use typeahead::Typeahead;
