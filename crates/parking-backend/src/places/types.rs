use serde::{Deserialize, Serialize};

/// A coordinate pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Restricts which kinds of place the autocomplete service suggests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceType {
    Address,
    Establishment,
    Geocode,
    Cities,
    Regions,
}

impl PlaceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Establishment => "establishment",
            Self::Geocode => "geocode",
            Self::Cities => "(cities)",
            Self::Regions => "(regions)",
        }
    }
}

/// Country restriction and proximity bias for autocomplete requests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutocompleteOptions {
    pub country_code: Option<String>,
    /// Proximity bias point
    pub location: Option<LatLng>,
    /// Bias radius in metres, only sent together with `location`
    pub radius: Option<u32>,
    pub types: Option<PlaceType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedSubstring {
    pub offset: u32,
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredFormatting {
    pub main_text: String,
    #[serde(default)]
    pub secondary_text: Option<String>,
    #[serde(default)]
    pub main_text_matched_substrings: Vec<MatchedSubstring>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub offset: u32,
    pub value: String,
}

/// One ranked autocomplete suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub description: String,
    pub place_id: String,
    #[serde(default)]
    pub structured_formatting: Option<StructuredFormatting>,
    #[serde(default)]
    pub matched_substrings: Vec<MatchedSubstring>,
    #[serde(default)]
    pub terms: Vec<Term>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub distance_meters: Option<u64>,
}

impl Prediction {
    /// Primary line of the suggestion, falling back to the full description
    pub fn main_text(&self) -> &str {
        self.structured_formatting
            .as_ref()
            .map_or(self.description.as_str(), |f| f.main_text.as_str())
    }

    /// Secondary line (city, state...) when the service provides one
    pub fn secondary_text(&self) -> Option<&str> {
        self.structured_formatting
            .as_ref()
            .and_then(|f| f.secondary_text.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AutocompleteResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

/// The `result` of a place details lookup, limited to the requested fields
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetails {
    pub formatted_address: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PlaceDetailsResponse {
    #[serde(default)]
    pub result: Option<PlaceDetails>,
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// A resolved place: the chosen address and its coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationData {
    pub address: String,
    pub name: Option<String>,
    pub location: LatLng,
    pub types: Vec<String>,
    pub place_id: Option<String>,
    pub is_current_location: bool,
    pub address_components: Vec<AddressComponent>,
}

impl LocationData {
    /// Builds location data from a details lookup result
    pub fn from_details(place_id: &str, details: PlaceDetails) -> Self {
        Self {
            address: details.formatted_address,
            name: details.name,
            location: details.geometry.location,
            types: details.types,
            place_id: Some(place_id.to_string()),
            is_current_location: false,
            address_components: details.address_components,
        }
    }

    /// Location data for the device's own position
    pub fn current(address: impl Into<String>, location: LatLng) -> Self {
        Self {
            address: address.into(),
            name: None,
            location,
            types: Vec::new(),
            place_id: None,
            is_current_location: true,
            address_components: Vec::new(),
        }
    }
}
