mod commands;

use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use parking_backend::parking::BookingStatus;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "parkspot")]
#[command(about = "Find, book and manage parking spots", long_about = None)]
struct Cli {
    /// Backend API base URL (overrides config and PARKING_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store the bearer token used for authenticated requests
    Login {
        #[arg(long)]
        token: String,
    },
    /// Forget the stored token
    Logout,
    /// List spots with free space near a point
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Radius in km
        #[arg(long)]
        radius: Option<f64>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Search spots free for a whole time window
    Search {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Window start, RFC 3339
        #[arg(long)]
        start: DateTime<Utc>,
        /// Window end, RFC 3339
        #[arg(long)]
        end: DateTime<Utc>,
        #[arg(long)]
        radius: Option<f64>,
    },
    /// Show one spot
    Spot { id: String },
    /// Book a spot
    Book {
        spot: String,
        #[arg(long)]
        start: DateTime<Utc>,
        #[arg(long)]
        end: DateTime<Utc>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List your bookings
    Bookings {
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Cancel a booking
    Cancel { id: String },
    /// Extend an active booking
    Extend {
        id: String,
        #[arg(long, default_value_t = 1.0)]
        hours: f64,
    },
    /// Show your dashboard summary
    Dashboard,
    /// Suggest addresses for some text
    Places {
        input: String,
        #[arg(long)]
        max: Option<usize>,
    },
    /// Resolve a place id to an address and coordinates
    Place { place_id: String },
    /// Interactive address search: each stdin line is treated as the new input text
    Typeahead,
    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Save the backend API base URL
    SetBaseUrl { url: String },
    /// Save the places API key
    SetPlacesKey { key: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
    Expired,
}

impl From<StatusArg> for BookingStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Self::Pending,
            StatusArg::Confirmed => Self::Confirmed,
            StatusArg::Active => Self::Active,
            StatusArg::Completed => Self::Completed,
            StatusArg::Cancelled => Self::Cancelled,
            StatusArg::Expired => Self::Expired,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout stays machine readable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
