#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for UrbanShield.
//!
//! Wires the permission table, distance checks, geocoding chain, location
//! service and backend client together. The reporter's position comes
//! from `--lat`/`--lon` (or `URBAN_SHIELD_LAT`/`URBAN_SHIELD_LON`) and
//! defaults to Cebu City.

mod account;
mod report;

use clap::{Args, Parser, Subcommand};
use urban_shield_geocoder::GeocoderChain;
use urban_shield_geography::check_bounds;
use urban_shield_geography_models::{
    DEFAULT_REGION_LATITUDE, DEFAULT_REGION_LONGITUDE, GeoPoint, LocationData,
};
use urban_shield_incident_models::{IncidentCategory, IncidentSeverity};
use urban_shield_location::{FixedPosition, LocationService};
use urban_shield_user_models::UserType;

#[derive(Parser)]
#[command(name = "urban_shield", about = "UrbanShield community safety reporting")]
struct Cli {
    #[command(flatten)]
    position: PositionArgs,

    #[command(subcommand)]
    command: Commands,
}

/// The reporter's position and report radius.
#[derive(Args, Clone, Copy)]
struct PositionArgs {
    /// Current latitude
    #[arg(long, global = true, env = "URBAN_SHIELD_LAT", default_value_t = DEFAULT_REGION_LATITUDE, allow_negative_numbers = true)]
    lat: f64,
    /// Current longitude
    #[arg(long, global = true, env = "URBAN_SHIELD_LON", default_value_t = DEFAULT_REGION_LONGITUDE, allow_negative_numbers = true)]
    lon: f64,
    /// Maximum distance in km between a picked report location and the
    /// current position
    #[arg(long, global = true, env = "URBAN_SHIELD_RADIUS_KM", default_value_t = urban_shield_geography::DEFAULT_RADIUS_KM)]
    radius_km: f64,
}

impl PositionArgs {
    const fn point(self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    const fn location(self) -> LocationData {
        LocationData::new(self.lat, self.lon)
    }
}

/// Email and password for commands that act as a user.
#[derive(Args)]
struct Credentials {
    /// Account email
    #[arg(long, env = "URBAN_SHIELD_EMAIL")]
    email: String,
    /// Account password
    #[arg(long, env = "URBAN_SHIELD_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the configuration and permissions of a user type
    UserType {
        /// User type (e.g., "resident"); unknown values show the guest tier
        user_type: String,
    },
    /// Great-circle distance between two points in km
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },
    /// Check whether a point is within the report radius of the current
    /// position
    CheckRadius {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },
    /// Reverse geocode a point, falling back to its coordinates
    ResolveAddress {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },
    /// Search for places near the current position
    Search {
        /// Place name or address (at least 3 characters)
        query: String,
    },
    /// Show the current position with its address
    Locate,
    /// Submit an incident report
    Report(Box<report::ReportArgs>),
    /// List incidents, nearest first
    Incidents {
        /// Maximum number of incidents to show
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Sign in and show the account
    SignIn(Credentials),
    /// Create an account
    SignUp(Box<account::SignUpArgs>),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();
    let position = cli.position;

    match cli.command {
        Commands::UserType { user_type } => print_user_type(&user_type),
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            let km = urban_shield_geography::haversine_km(lat1, lon1, lat2, lon2)?;
            println!("{km:.3} km");
        }
        Commands::CheckRadius { lat, lon } => {
            let check = check_bounds(GeoPoint::new(lat, lon), position.point(), position.radius_km)?;
            println!("{} ({:.2} km away)", check.message(), check.distance_km);
        }
        Commands::ResolveAddress { lat, lon } => {
            let chain = GeocoderChain::from_registry()?;
            let resolved = chain.resolve_address(lat, lon).await;
            println!("{} [{}]", resolved.address, resolved.quality);
        }
        Commands::Search { query } => search(&query, position).await?,
        Commands::Locate => {
            let service = LocationService::new(
                FixedPosition::new(position.location()),
                GeocoderChain::from_registry()?,
            );
            let location = service.location_with_address().await?;
            println!(
                "{:.6}, {:.6}: {}",
                location.latitude,
                location.longitude,
                location.display_label()
            );
        }
        Commands::Report(args) => report::run(*args, position).await?,
        Commands::Incidents { limit } => report::list(limit, position).await?,
        Commands::SignIn(credentials) => account::sign_in(credentials).await?,
        Commands::SignUp(args) => account::sign_up(*args).await?,
    }

    Ok(())
}

fn print_user_type(raw: &str) {
    let config = urban_shield_permissions::get_config_raw(raw);

    println!("{} ({})", config.name, config.user_type);
    println!("  {}", config.description);
    println!("  Posting:       {}", config.posting_privilege);
    println!("  Verification:  {}", if config.verification_required { "required" } else { "not required" });
    if config.verified_area_only {
        println!("  Restricted to the verified area");
    }
    println!("  Priority:      {}", config.permissions.priority_level);
    println!("  Permissions:");
    for permission in config.permissions.granted() {
        println!("    - {permission}");
    }
    println!("  Features:");
    for feature in config.features {
        println!("    - {feature}");
    }
    println!("  To verify:");
    for requirement in config.verification_requirements {
        println!("    - {requirement}");
    }
}

async fn search(query: &str, position: PositionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let Some(client) = urban_shield_geocoder::search_client()? else {
        println!("No search provider is enabled");
        return Ok(());
    };

    let places = client.search(query, position.point(), position.radius_km).await?;
    if places.is_empty() {
        println!("No places found within {} km", position.radius_km);
    }
    for place in places {
        println!("{:>5.1} km  {}", place.distance_km, place.name);
        println!("          {}", place.address);
    }
    Ok(())
}

/// Parses a user type given on the command line. Unlike stored values,
/// unknown input is an error here.
fn parse_user_type(raw: &str) -> Result<UserType, String> {
    raw.parse()
        .map_err(|_| format!("unknown user type {raw:?}; expected one of {}", user_type_names()))
}

fn user_type_names() -> String {
    UserType::all()
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(", ")
}

fn parse_category(raw: &str) -> Result<IncidentCategory, String> {
    raw.parse().map_err(|_| format!("unknown category {raw:?}"))
}

fn parse_severity(raw: &str) -> Result<IncidentSeverity, String> {
    raw.parse().map_err(|_| format!("unknown severity {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_coordinates_parse_as_values() {
        let cli = Cli::try_parse_from(["urban_shield", "distance", "-33.8688", "151.2093", "-37.8136", "144.9631"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Distance { lat1, lon2, .. } if (lat1 + 33.8688).abs() < 1e-9 && (lon2 - 144.9631).abs() < 1e-9
        ));
    }

    #[test]
    fn position_flags_are_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "urban_shield",
            "check-radius",
            "10.32",
            "123.89",
            "--lat",
            "10.30",
            "--radius-km",
            "2.5",
        ])
        .unwrap();
        assert!((cli.position.lat - 10.30).abs() < 1e-9);
        assert!((cli.position.radius_km - 2.5).abs() < 1e-9);
    }

    #[test]
    fn report_requires_both_picked_coordinates() {
        let result = Cli::try_parse_from([
            "urban_shield",
            "report",
            "--title",
            "Broken streetlight",
            "--description",
            "Dark corner near the market",
            "--pick-lat",
            "10.31",
            "--dry-run",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_user_types_reject_unknown_values() {
        assert_eq!(parse_user_type("Resident"), Ok(UserType::Resident));
        let err = parse_user_type("community_member").unwrap_err();
        assert!(err.contains("guest"));
    }

    #[test]
    fn report_categories_and_severities_parse_case_insensitively() {
        assert_eq!(parse_severity("HIGH"), Ok(IncidentSeverity::High));
        assert!(parse_category("not-a-category").is_err());
    }
}
