use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use super::types::*;
use crate::api::{HttpClient, HttpRequest, ReqwestClient};

/// Fields requested from the details endpoint
const DETAIL_FIELDS: &str = "geometry,formatted_address,name,types,address_components";

/// Queries shorter than this never reach the network
pub const MIN_QUERY_CHARS: usize = 2;

/// Fallback message when the service gives none
pub const DEFAULT_ERROR_MESSAGE: &str = "Error fetching addresses";

/// Places errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlacesError {
    #[error("Network error: {0}")]
    Transport(String),
    /// The service answered with a non-OK status
    #[error("{message}")]
    Status { status: String, message: String },
    #[error("Invalid places response: {0}")]
    Decode(String),
    /// The request could not be built, usually a bad base URL
    #[error("Invalid places request: {0}")]
    InvalidRequest(String),
}

/// Address search used by the typeahead
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Returns at most `max_results` suggestions for the input
    async fn autocomplete(
        &self,
        input: &str,
        options: &AutocompleteOptions,
        max_results: usize,
    ) -> Result<Vec<Prediction>, PlacesError>;

    /// Resolves a suggestion to an address and coordinates
    async fn place_details(&self, place_id: &str) -> Result<LocationData, PlacesError>;
}

/// Returns true if the query is long enough to be searched
pub fn is_searchable(input: &str) -> bool {
    !input.trim().is_empty() && input.chars().count() >= MIN_QUERY_CHARS
}

/// Google Places autocomplete and details client
pub struct PlacesClient<H: HttpClient = ReqwestClient> {
    http: H,
    base_url: Url,
    api_key: String,
}

impl PlacesClient<ReqwestClient> {
    /// Creates a new client using reqwest
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self::with_http_client(base_url, api_key, ReqwestClient::new())
    }
}

impl<H: HttpClient> PlacesClient<H> {
    /// Creates a client with a custom HTTP client (for testing)
    pub fn with_http_client(base_url: Url, api_key: impl Into<String>, http: H) -> Self {
        Self {
            http,
            base_url,
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str, query: &str) -> Result<Url, PlacesError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PlacesError::InvalidRequest(format!("{} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(path.split('/'));
        url.set_query(Some(query));
        Ok(url)
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, PlacesError> {
        let response = self
            .http
            .send(HttpRequest::get(url))
            .await
            .map_err(|e| PlacesError::Transport(e.0))?;

        if !response.is_success() {
            return Err(PlacesError::Status {
                status: response.status.to_string(),
                message: response.status_line(),
            });
        }

        response.json().map_err(|e| PlacesError::Decode(e.to_string()))
    }
}

fn autocomplete_query(input: &str, key: &str, options: &AutocompleteOptions) -> String {
    let mut query = format!(
        "input={}&key={}",
        urlencoding::encode(input),
        urlencoding::encode(key)
    );

    if let Some(country) = &options.country_code {
        query.push_str(&format!("&components=country:{country}"));
    }
    if let Some(location) = options.location {
        query.push_str(&format!("&location={},{}", location.lat, location.lng));
        if let Some(radius) = options.radius {
            query.push_str(&format!("&radius={radius}"));
        }
    }
    if let Some(types) = options.types {
        query.push_str(&format!("&types={}", types.as_str()));
    }

    query
}

fn status_error(status: String, error_message: Option<String>) -> PlacesError {
    PlacesError::Status {
        status,
        message: error_message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
    }
}

#[async_trait]
impl<H: HttpClient> PlaceSearch for PlacesClient<H> {
    async fn autocomplete(
        &self,
        input: &str,
        options: &AutocompleteOptions,
        max_results: usize,
    ) -> Result<Vec<Prediction>, PlacesError> {
        if !is_searchable(input) {
            return Ok(Vec::new());
        }

        debug!("Autocomplete for {:?}", input);
        let url = self.url("autocomplete/json", &autocomplete_query(input, &self.api_key, options))?;
        let response: AutocompleteResponse = self.fetch(url).await?;

        match response.status.as_str() {
            "OK" => {
                let mut predictions = response.predictions;
                predictions.truncate(max_results);
                Ok(predictions)
            }
            "ZERO_RESULTS" => Ok(Vec::new()),
            _ => {
                warn!("Autocomplete failed with status {}", response.status);
                Err(status_error(response.status, response.error_message))
            }
        }
    }

    async fn place_details(&self, place_id: &str) -> Result<LocationData, PlacesError> {
        let query = format!(
            "place_id={}&fields={}&key={}",
            urlencoding::encode(place_id),
            DETAIL_FIELDS,
            urlencoding::encode(&self.api_key)
        );
        let url = self.url("details/json", &query)?;
        let response: PlaceDetailsResponse = self.fetch(url).await?;

        match (response.status.as_str(), response.result) {
            ("OK", Some(details)) => Ok(LocationData::from_details(place_id, details)),
            ("OK", None) => Err(PlacesError::Decode("details response has no result".to_string())),
            _ => {
                warn!("Place details failed with status {}", response.status);
                Err(status_error(response.status, response.error_message))
            }
        }
    }
}
