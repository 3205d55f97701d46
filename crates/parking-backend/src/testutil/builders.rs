//! Test data builders
//!
//! Provides builder patterns for creating test data with sensible defaults.

use serde_json::{json, Value};

use crate::parking::ParkingSpot;
use crate::transcode::camelize_owned;

/// Builder for parking spots, producing either the snake_case wire JSON or the typed spot
#[derive(Debug, Clone)]
pub struct SpotBuilder {
    id: String,
    title: String,
    address: String,
    latitude: f64,
    longitude: f64,
    spot_type: String,
    price_per_hour: String,
    available_spots: u32,
    total_spots: u32,
    distance: Option<f64>,
    features: Vec<String>,
}

impl Default for SpotBuilder {
    fn default() -> Self {
        Self {
            id: "spot-1".to_string(),
            title: "Test Spot".to_string(),
            address: "Rua Teste, 1".to_string(),
            latitude: -3.7319,
            longitude: -38.5267,
            spot_type: "garage".to_string(),
            price_per_hour: "5.00".to_string(),
            available_spots: 1,
            total_spots: 1,
            distance: None,
            features: vec![],
        }
    }
}

impl SpotBuilder {
    /// Creates a new spot builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Sets the spot type wire value (garage, lot, street, driveway)
    pub fn spot_type(mut self, spot_type: impl Into<String>) -> Self {
        self.spot_type = spot_type.into();
        self
    }

    /// Sets the hourly price as the decimal string the backend sends
    pub fn price(mut self, price: impl Into<String>) -> Self {
        self.price_per_hour = price.into();
        self
    }

    /// Sets available and total space counts
    pub fn spaces(mut self, available: u32, total: u32) -> Self {
        self.available_spots = available;
        self.total_spots = total;
        self
    }

    /// Sets the distance from the query point, in km
    pub fn distance(mut self, km: f64) -> Self {
        self.distance = Some(km);
        self
    }

    pub fn feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// Builds the snake_case JSON the backend sends
    pub fn build_wire(self) -> Value {
        let mut wire = json!({
            "id": self.id,
            "title": self.title,
            "address": self.address,
            "latitude": self.latitude,
            "longitude": self.longitude,
            "spot_type": self.spot_type,
            "price_per_hour": self.price_per_hour,
            "available_spots": self.available_spots,
            "total_spots": self.total_spots,
            "features": self.features,
        });
        if let Some(distance) = self.distance {
            wire["distance"] = json!(distance);
        }
        wire
    }

    /// Builds the typed spot, as the API client would hand it out
    pub fn build(self) -> ParkingSpot {
        serde_json::from_value(camelize_owned(self.build_wire())).expect("builder produced an invalid spot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_and_typed_agree() {
        let builder = SpotBuilder::new().title("Lot A").price("7.25").distance(0.4);

        let wire = builder.clone().build_wire();
        let spot = builder.build();

        assert_eq!(wire["price_per_hour"], "7.25");
        assert!((spot.price_per_hour - 7.25).abs() < f64::EPSILON);
        assert_eq!(spot.title, "Lot A");
        assert_eq!(spot.distance, Some(0.4));
    }
}
