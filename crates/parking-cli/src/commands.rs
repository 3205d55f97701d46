use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use parking_backend::auth::{FileTokenStore, TokenStorage};
use parking_backend::config::{Config, ConfigManager, PLACES_KEY_ENV};
use parking_backend::parking::{NearbySpotsParams, NewBooking, SearchSpotsParams};
use parking_backend::places::{PlaceSearch, PlacesClient};
use parking_backend::typeahead::{Typeahead, TypeaheadOptions, TypeaheadState};
use parking_backend::{ApiClient, ParkingApi};

use crate::{Cli, Command, ConfigAction};

/// Upper bound on waiting for the last typeahead search at end of input
const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn run(cli: Cli) -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.get();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    match cli.command {
        Command::Login { token } => {
            let token = token.trim();
            if token.is_empty() {
                bail!("Token must not be empty");
            }
            FileTokenStore::new()?.save(token).await?;
            eprintln!("Token saved");
        }
        Command::Logout => {
            FileTokenStore::new()?.delete().await?;
            eprintln!("Logged out");
        }
        Command::Nearby {
            lat,
            lng,
            radius,
            limit,
        } => {
            let params = NearbySpotsParams {
                radius: Some(radius.unwrap_or(config.nearby_radius_km)),
                limit: Some(limit.unwrap_or(config.spots_limit)),
                ..NearbySpotsParams::new(lat, lng)
            };
            print_json(&parking(&config)?.nearby_spots(&params).await?)?;
        }
        Command::Search {
            lat,
            lng,
            start,
            end,
            radius,
        } => {
            if end <= start {
                bail!("--end must be after --start");
            }
            let params = SearchSpotsParams {
                lat,
                lng,
                start_time: start,
                end_time: end,
                radius: Some(radius.unwrap_or(config.search_radius_km)),
            };
            print_json(&parking(&config)?.search_spots(&params).await?)?;
        }
        Command::Spot { id } => {
            print_json(&parking(&config)?.spot_details(&id).await?)?;
        }
        Command::Book {
            spot,
            start,
            end,
            notes,
        } => {
            if end <= start {
                bail!("--end must be after --start");
            }
            let booking = NewBooking {
                notes,
                ..NewBooking::for_window(spot, start, end)
            };
            print_json(&parking(&config)?.create_booking(&booking).await?)?;
        }
        Command::Bookings { status } => {
            let bookings = parking(&config)?
                .list_bookings(status.map(Into::into))
                .await?;
            print_json(&bookings)?;
        }
        Command::Cancel { id } => {
            print_json(&parking(&config)?.cancel_booking(&id).await?)?;
        }
        Command::Extend { id, hours } => {
            if hours <= 0.0 {
                bail!("--hours must be positive");
            }
            print_json(&parking(&config)?.extend_session(&id, hours).await?)?;
        }
        Command::Dashboard => {
            print_json(&parking(&config)?.dashboard_stats().await?)?;
        }
        Command::Places { input, max } => {
            let options = TypeaheadOptions::from_config(&config);
            let predictions = places(&config)?
                .autocomplete(
                    &input,
                    &options.autocomplete,
                    max.unwrap_or(options.max_results),
                )
                .await?;
            print_json(&predictions)?;
        }
        Command::Place { place_id } => {
            print_json(&places(&config)?.place_details(&place_id).await?)?;
        }
        Command::Typeahead => typeahead(&config).await?,
        Command::Config { action } => configure(&manager, &config, action)?,
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to format output")?;
    println!("{json}");
    Ok(())
}

fn parking(config: &Config) -> Result<ParkingApi> {
    let tokens = Arc::new(FileTokenStore::new()?);
    Ok(ParkingApi::new(ApiClient::new(config.base_url()?, tokens)))
}

fn places(config: &Config) -> Result<PlacesClient> {
    let key = config
        .places_api_key
        .clone()
        .filter(|k| !k.is_empty())
        .with_context(|| format!("No places API key configured; set {PLACES_KEY_ENV}"))?;
    Ok(PlacesClient::new(config.places_base_url()?, key))
}

fn configure(manager: &ConfigManager, effective: &Config, action: ConfigAction) -> Result<()> {
    // Env overrides stay out of the file
    let mut stored = ConfigManager::load_from(manager.path())?;
    match action {
        ConfigAction::Show => return print_json(effective),
        ConfigAction::SetBaseUrl { url } => {
            stored.base_url = url.trim().to_string();
            stored.base_url()?;
        }
        ConfigAction::SetPlacesKey { key } => {
            let key = key.trim();
            if key.is_empty() {
                bail!("Key must not be empty");
            }
            stored.places_api_key = Some(key.to_string());
        }
    }
    manager.save(stored)?;
    eprintln!("Saved {}", manager.path().display());
    Ok(())
}

fn print_suggestions(state: &TypeaheadState) {
    println!("> {}", state.query);
    if let Some(error) = &state.error {
        println!("  ! {error}");
    }
    for prediction in &state.predictions {
        match prediction.secondary_text() {
            Some(secondary) => println!("  - {} ({})", prediction.main_text(), secondary),
            None => println!("  - {}", prediction.main_text()),
        }
    }
}

async fn typeahead(config: &Config) -> Result<()> {
    let places: Arc<dyn PlaceSearch> = Arc::new(places(config)?);
    let options = TypeaheadOptions::from_config(config);
    let debounce = options.debounce;
    let session = Typeahead::new(places, options);

    let mut updates = session.subscribe();
    let printer = tokio::spawn(async move {
        let mut last_printed: Option<TypeaheadState> = None;
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if state.is_loading || (state.predictions.is_empty() && state.error.is_none()) {
                continue;
            }
            if last_printed.as_ref() != Some(&state) {
                print_suggestions(&state);
                last_printed = Some(state);
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        session.input_changed(line.trim_end());
    }

    // Give the last input its quiet period, then wait for its search to land
    tokio::time::sleep(debounce + Duration::from_millis(50)).await;
    let mut settled = session.subscribe();
    if tokio::time::timeout(SETTLE_TIMEOUT, settled.wait_for(|s| !s.is_loading))
        .await
        .is_err()
    {
        tracing::warn!("Gave up waiting for the last search");
    }

    drop(settled);
    drop(session);
    let _ = tokio::time::timeout(Duration::from_secs(1), printer).await;
    Ok(())
}
