use serde_json::Value;

use super::types::*;
use crate::api::{ApiClient, FetchError, FetchResult, HttpClient, QueryParams, ReqwestClient};

/// Backend endpoint paths, relative to the API base URL
pub mod endpoints {
    pub const NEARBY_SPOTS: &str = "/nearby/";
    pub const SEARCH_SPOTS: &str = "/search/";
    pub const PARKING_SPOTS: &str = "/parking-spots/";
    pub const BOOKINGS: &str = "/bookings/";
    pub const DASHBOARD: &str = "/dashboard/";
}

/// Typed parking backend operations on top of [`ApiClient`]
pub struct ParkingApi<H: HttpClient = ReqwestClient> {
    api: ApiClient<H>,
}

impl<H: HttpClient> ParkingApi<H> {
    pub fn new(api: ApiClient<H>) -> Self {
        Self { api }
    }
}

fn query<T: serde::Serialize>(params: &T) -> FetchResult<QueryParams> {
    QueryParams::from_serialize(params)
        .map_err(|e| FetchError::invalid_request(format!("Invalid query parameters: {e}")))
}

fn detail_path(collection: &str, id: &str) -> String {
    format!("{}{}/", collection, urlencoding::encode(id))
}

// Spot-related methods
impl<H: HttpClient> ParkingApi<H> {
    /// Gets spots with free space around a point, nearest first
    pub async fn nearby_spots(&self, params: &NearbySpotsParams) -> FetchResult<Vec<ParkingSpot>> {
        let page: SpotsPage = self.api.get(endpoints::NEARBY_SPOTS, &query(params)?).await?;
        Ok(page.results)
    }

    /// Searches spots that are not booked during the requested window
    pub async fn search_spots(&self, params: &SearchSpotsParams) -> FetchResult<SpotsPage> {
        self.api.get(endpoints::SEARCH_SPOTS, &query(params)?).await
    }

    /// Gets a single spot with its detail-only fields
    pub async fn spot_details(&self, spot_id: &str) -> FetchResult<ParkingSpot> {
        self.api
            .get(&detail_path(endpoints::PARKING_SPOTS, spot_id), &QueryParams::new())
            .await
    }
}

// Booking-related methods
impl<H: HttpClient> ParkingApi<H> {
    /// Books a spot for a time window
    pub async fn create_booking(&self, booking: &NewBooking) -> FetchResult<Booking> {
        self.api.post(endpoints::BOOKINGS, booking).await
    }

    /// Lists the current user's bookings, optionally filtered by status
    pub async fn list_bookings(&self, status: Option<BookingStatus>) -> FetchResult<Vec<Booking>> {
        let params = QueryParams::new().insert("status", status.map(BookingStatus::as_str));
        let listing: Listing<Booking> = self.api.get(endpoints::BOOKINGS, &params).await?;
        Ok(listing.into_vec())
    }

    /// Cancels a pending or confirmed booking
    pub async fn cancel_booking(&self, booking_id: &str) -> FetchResult<Ack> {
        let path = format!("{}cancel_booking/", detail_path(endpoints::BOOKINGS, booking_id));
        self.api.post(&path, &serde_json::json!({})).await
    }

    /// Extends an active booking by some hours
    pub async fn extend_session(&self, booking_id: &str, hours: f64) -> FetchResult<ExtendedSession> {
        let path = format!("{}extend_session/", detail_path(endpoints::BOOKINGS, booking_id));
        self.api.post(&path, &ExtendSession { hours }).await
    }

    /// Gets the user's dashboard summary
    ///
    /// The shape is not fixed by the backend, so it is returned as camelCase JSON.
    pub async fn dashboard_stats(&self) -> FetchResult<Value> {
        self.api.get(endpoints::DASHBOARD, &QueryParams::new()).await
    }
}
