//! `report` and `incidents`.

use clap::Args;
use urban_shield_backend::SupabaseClient;
use urban_shield_geocoder::GeocoderChain;
use urban_shield_geography::distance_km;
use urban_shield_geography_models::LocationData;
use urban_shield_incident::map::{ListRenderer, MapRenderer, markers_for};
use urban_shield_incident::{IncidentStore, SubmissionContext, compose, submit};
use urban_shield_incident_models::{IncidentCategory, IncidentDraft, IncidentSeverity};
use urban_shield_user_models::UserType;
use uuid::Uuid;

use crate::{Credentials, PositionArgs, parse_category, parse_severity, parse_user_type};

#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct ReportArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long, value_parser = parse_category, default_value = "other")]
    category: IncidentCategory,
    #[arg(long, value_parser = parse_severity, default_value = "medium")]
    severity: IncidentSeverity,
    /// Street address; resolved from the location when omitted
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    landmark: Option<String>,
    #[arg(long)]
    anonymous: bool,
    #[arg(long)]
    urgent: bool,
    /// The reporter needs rescue
    #[arg(long)]
    rescue: bool,
    /// Uploaded image URL (repeatable)
    #[arg(long = "image")]
    images: Vec<String>,
    /// Latitude of a location picked away from the current position
    #[arg(long, requires = "pick_lon", allow_negative_numbers = true)]
    pick_lat: Option<f64>,
    /// Longitude of a location picked away from the current position
    #[arg(long, requires = "pick_lat", allow_negative_numbers = true)]
    pick_lon: Option<f64>,
    /// Print the insert payload instead of submitting
    #[arg(long)]
    dry_run: bool,
    /// Reporter user type for --dry-run; a real submission uses the
    /// signed-in profile's type
    #[arg(long, value_parser = parse_user_type, default_value = "guest")]
    user_type: UserType,
    #[command(flatten)]
    credentials: Option<Credentials>,
}

impl ReportArgs {
    fn draft(&self) -> IncidentDraft {
        IncidentDraft {
            category: self.category,
            severity: self.severity,
            title: self.title.clone(),
            description: self.description.clone(),
            address: self.address.clone().unwrap_or_default(),
            landmark: self.landmark.clone(),
            is_anonymous: self.anonymous,
            is_urgent: self.urgent,
            is_rescue: self.rescue,
            image_urls: self.images.clone(),
        }
    }

    fn picked(&self) -> Option<LocationData> {
        self.pick_lat
            .zip(self.pick_lon)
            .map(|(lat, lon)| LocationData::new(lat, lon))
    }
}

pub async fn run(args: ReportArgs, position: PositionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let draft = args.draft();

    // Without a typed address the picked (or current) location is
    // geocoded so the report carries a readable address.
    let mut picked = args.picked();
    let mut current = position.location();
    if draft.address.trim().is_empty() {
        let chain = GeocoderChain::from_registry()?;
        let target = picked.as_mut().unwrap_or(&mut current);
        let resolved = chain.resolve_address(target.latitude, target.longitude).await;
        target.address = Some(resolved.address);
    }

    if args.dry_run {
        let ctx = SubmissionContext::new(Uuid::nil(), args.user_type)
            .with_current_location(Some(&current))
            .with_picked_location(picked.as_ref())
            .with_radius_km(Some(position.radius_km));
        let incident = compose(&draft, &ctx)?;
        println!("{}", serde_json::to_string_pretty(&incident)?);
        return Ok(());
    }

    let Some(credentials) = args.credentials else {
        return Err("Signing in is required to submit; pass --email and --password or use --dry-run".into());
    };

    let client = SupabaseClient::from_env()?;
    let session = client.sign_in(&credentials.into()).await?;
    let client = client.with_session(session.clone());
    let user_type = client
        .profile(session.user.id)
        .await?
        .map_or(UserType::LOWEST_PRIVILEGE, |p| p.user_type());

    let ctx = SubmissionContext::new(session.user.id, user_type)
        .with_current_location(Some(&current))
        .with_picked_location(picked.as_ref())
        .with_radius_km(Some(position.radius_km));
    let stored = submit(&client, &draft, &ctx).await?;

    if stored.is_approved {
        println!("Your report has been submitted! ({})", stored.id);
    } else {
        println!("Your report has been submitted and is awaiting moderation. ({})", stored.id);
    }
    Ok(())
}

pub async fn list(limit: Option<usize>, position: PositionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = SupabaseClient::from_env()?;
    let incidents = IncidentStore::list_incidents(&client).await?;
    let mut markers = markers_for(&incidents);
    let skipped = incidents.len() - markers.len();

    let mut renderer = ListRenderer::new(std::io::stdout().lock());
    renderer.center_on(position.point())?;
    if let Some(limit) = limit {
        let center = position.point();
        markers.sort_by(|a, b| {
            let da = distance_km(center, a.point).unwrap_or(f64::INFINITY);
            let db = distance_km(center, b.point).unwrap_or(f64::INFINITY);
            da.total_cmp(&db)
        });
        markers.truncate(limit);
    }
    renderer.render_markers(&markers)?;

    if skipped > 0 {
        log::info!("{skipped} incident(s) without a usable location are not shown");
    }
    Ok(())
}
