//! Test fixtures
//!
//! Pre-built test data for common testing scenarios.

use serde_json::{json, Value};

use super::builders::SpotBuilder;
use crate::places::Prediction;

/// Three spots around central Fortaleza, nearest first, in wire shape
pub fn sample_wire_spots() -> Vec<Value> {
    vec![
        SpotBuilder::new()
            .id("spot-1")
            .title("Garagem Centro")
            .address("Rua Floriano Peixoto, 100")
            .at(-3.7279, -38.527)
            .price("8.50")
            .spaces(3, 10)
            .distance(0.35)
            .feature("covered")
            .build_wire(),
        SpotBuilder::new()
            .id("spot-2")
            .title("Estacionamento Aldeota")
            .address("Av. Santos Dumont, 1500")
            .at(-3.7365, -38.5049)
            .spot_type("lot")
            .price("6.00")
            .spaces(12, 40)
            .distance(2.1)
            .build_wire(),
        SpotBuilder::new()
            .id("spot-3")
            .title("Vaga Meireles")
            .address("Rua Silva Jatahy, 220")
            .at(-3.7262, -38.4934)
            .spot_type("driveway")
            .price("4.00")
            .spaces(0, 1)
            .distance(3.8)
            .build_wire(),
    ]
}

/// Wraps spots the way the nearby endpoint does
pub fn nearby_wire_response(spots: Vec<Value>) -> Value {
    json!({ "spots": spots })
}

/// A prediction with structured text derived from the description
pub fn prediction(description: &str, place_id: &str) -> Prediction {
    let (main, secondary) = match description.split_once(", ") {
        Some((main, rest)) => (main, Some(rest)),
        None => (description, None),
    };
    serde_json::from_value(json!({
        "description": description,
        "place_id": place_id,
        "structured_formatting": {
            "main_text": main,
            "secondary_text": secondary,
        },
        "types": ["route", "geocode"],
    }))
    .expect("invalid prediction fixture")
}

/// An `OK` autocomplete response with one prediction per description
pub fn autocomplete_response(descriptions: &[&str]) -> Value {
    let predictions: Vec<Prediction> = descriptions
        .iter()
        .enumerate()
        .map(|(i, d)| prediction(d, &format!("place-{i}")))
        .collect();
    json!({ "predictions": predictions, "status": "OK" })
}

/// An `OK` details response for an address at the given position
pub fn details_response(address: &str, lat: f64, lng: f64) -> Value {
    json!({
        "status": "OK",
        "result": {
            "formatted_address": address,
            "name": address,
            "geometry": { "location": { "lat": lat, "lng": lng } },
            "types": ["street_address"],
            "address_components": [
                { "long_name": "Fortaleza", "short_name": "Fortaleza", "types": ["locality", "political"] }
            ]
        }
    })
}
