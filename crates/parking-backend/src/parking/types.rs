use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Kind of parking place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotType {
    Garage,
    Lot,
    Street,
    Driveway,
    #[serde(other)]
    Other,
}

/// A parking spot as returned by the listing, search and detail endpoints
///
/// Field names follow the camelized in-memory shape. Fields that only some
/// endpoints return are optional or defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpot {
    pub id: String,
    pub title: String,
    pub address: String,
    /// Missing for spots registered without coordinates
    #[serde(default, deserialize_with = "optional_decimal")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub longitude: Option<f64>,
    pub spot_type: SpotType,
    #[serde(deserialize_with = "decimal")]
    pub price_per_hour: f64,
    #[serde(default)]
    pub available_spots: u32,
    #[serde(default)]
    pub total_spots: u32,
    /// Kilometres from the query point, pre-computed by the server
    #[serde(default, deserialize_with = "optional_decimal")]
    pub distance: Option<f64>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
}

impl ParkingSpot {
    /// Returns true if at least one space is free right now
    pub fn is_available(&self) -> bool {
        self.available_spots > 0
    }
}

/// A page of spots
///
/// The nearby endpoint answers `{"spots": [...]}` without a count; search
/// answers `{"count": n, "results": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotsPage {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(alias = "spots")]
    pub results: Vec<ParkingSpot>,
}

/// Query for `GET /nearby/`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbySpotsParams {
    pub latitude: f64,
    pub longitude: f64,
    /// Search radius in km
    pub radius: Option<f64>,
    pub limit: Option<u32>,
}

impl NearbySpotsParams {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius: None,
            limit: None,
        }
    }
}

/// Query for `GET /search/`, spots free for the whole window
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSpotsParams {
    pub lat: f64,
    pub lng: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub radius: Option<f64>,
}

/// Lifecycle state of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
    Expired,
}

impl BookingStatus {
    /// Returns the wire value, as used in the `status` filter
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }
}

/// Body for `POST /bookings/`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub spot: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewBooking {
    /// Creates a booking request whose duration is derived from the window
    pub fn for_window(spot: impl Into<String>, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        let minutes = (end_time - start_time).num_minutes().max(0);
        Self {
            spot: spot.into(),
            start_time,
            end_time,
            duration_hours: minutes as f64 / 60.0,
            notes: None,
        }
    }
}

/// A booking as returned by the bookings endpoints
///
/// Creation only echoes the submitted fields, so server-assigned fields are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub booking_id: Option<String>,
    pub spot: String,
    #[serde(default)]
    pub spot_title: Option<String>,
    #[serde(default)]
    pub spot_address: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(deserialize_with = "decimal")]
    pub duration_hours: f64,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body for `POST /bookings/{id}/extend_session/`
#[derive(Debug, Clone, Serialize)]
pub struct ExtendSession {
    pub hours: f64,
}

/// Reply from `POST /bookings/{id}/extend_session/`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedSession {
    pub message: String,
    pub new_end_time: DateTime<Utc>,
    #[serde(deserialize_with = "decimal")]
    pub additional_cost: f64,
    #[serde(deserialize_with = "decimal")]
    pub total_price: f64,
}

/// Plain `{"message": ...}` acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}

/// Either a paginated `{"results": [...]}` envelope or a bare array
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Page { results: Vec<T> },
    Plain(Vec<T>),
}

impl<T> Listing<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Page { results } | Self::Plain(results) => results,
        }
    }
}

/// Map viewport: a centre plus the visible span in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

/// Initial viewport before the device position is known (Fortaleza, BR)
pub const DEFAULT_LOCATION: MapLocation = MapLocation {
    latitude: -3.757_896_5,
    longitude: -38.562_928_2,
    latitude_delta: 0.01,
    longitude_delta: 0.01,
};

// Decimal columns arrive either as JSON numbers or as strings like "12.50".
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Self::Number(n) => Ok(n),
            Self::String(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid decimal: {s:?}"))),
        }
    }
}

fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    NumberOrString::deserialize(deserializer)?.into_f64()
}

fn optional_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Option::<NumberOrString>::deserialize(deserializer)?
        .map(NumberOrString::into_f64)
        .transpose()
}
