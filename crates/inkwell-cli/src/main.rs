//! Inkwell CLI - Check the numbers the site widgets compute

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use inkwell_core::config::{ReaderConfig, SiteConfig, WriterConfig};
use inkwell_core::flipbook::{centering_offset, Bounds, Geometry, Orientation};
use inkwell_core::theme::{is_daytime, sun_times, Location, Theme};
use inkwell_core::ViewState;

#[derive(Parser)]
#[command(name = "inkwell-cli")]
#[command(author, version, about = "Inkwell site widget diagnostics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show sunrise, sunset and the solar default theme
    Sun {
        /// Calendar date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Latitude in degrees north
        #[arg(long, env = "INKWELL_LAT", default_value_t = Location::BELGRADE.latitude, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in degrees east
        #[arg(long, env = "INKWELL_LNG", default_value_t = Location::BELGRADE.longitude, allow_hyphen_values = true)]
        lng: f64,
    },

    /// Compute page size and centering offsets for a container
    Geometry {
        /// Container width in CSS pixels
        #[arg(long)]
        width: f64,

        /// Container height in CSS pixels
        #[arg(long)]
        height: f64,

        /// Page width / height ratio
        #[arg(long, default_value_t = ReaderConfig::default().aspect_ratio)]
        aspect: f64,

        /// Single-page layout
        #[arg(long)]
        portrait: bool,
    },

    /// Validate a config file and print it with defaults filled in
    Config {
        /// Path to a JSON config file
        path: PathBuf,

        /// Which config the file holds; guessed from the file name when omitted
        #[arg(long, value_enum)]
        kind: Option<ConfigKind>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ConfigKind {
    Reader,
    Site,
    Writer,
}

impl ConfigKind {
    fn guess(path: &Path) -> Self {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if name.contains("writer") {
            ConfigKind::Writer
        } else if name.contains("site") {
            ConfigKind::Site
        } else {
            ConfigKind::Reader
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("inkwell=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sun { date, lat, lng } => {
            cmd_sun(date, Location { latitude: lat, longitude: lng })?;
        }
        Commands::Geometry {
            width,
            height,
            aspect,
            portrait,
        } => {
            cmd_geometry(width, height, aspect, portrait)?;
        }
        Commands::Config { path, kind } => {
            cmd_config(&path, kind)?;
        }
    }

    Ok(())
}

fn cmd_sun(date: Option<NaiveDate>, location: Location) -> Result<()> {
    if !(-90.0..=90.0).contains(&location.latitude) {
        anyhow::bail!("latitude {} is outside -90..=90", location.latitude);
    }
    let today = Local::now().date_naive();
    let date = date.unwrap_or(today);
    let times = sun_times(date, location);

    println!("Date:     {}", date);
    println!("Location: {:.2}, {:.2}", location.latitude, location.longitude);
    println!();
    println!(
        "Sunrise:  {} UTC ({} local)",
        times.sunrise.format("%H:%M"),
        times.sunrise.with_timezone(&Local).format("%H:%M")
    );
    println!(
        "Sunset:   {} UTC ({} local)",
        times.sunset.format("%H:%M"),
        times.sunset.with_timezone(&Local).format("%H:%M")
    );
    if times.sunrise == times.sunset {
        println!("          (no sunrise: polar night)");
    }

    if date == today {
        let theme = Theme::for_daylight(is_daytime(&Utc::now(), location));
        println!();
        println!("Default theme now: {}", theme.as_str());
    }
    Ok(())
}

fn cmd_geometry(width: f64, height: f64, aspect: f64, portrait: bool) -> Result<()> {
    if !aspect.is_finite() || aspect <= 0.0 {
        anyhow::bail!("aspect ratio must be positive, got {aspect}");
    }
    let orientation = if portrait {
        Orientation::Portrait
    } else {
        Orientation::Landscape
    };
    let geometry = Geometry::compute(Bounds::new(width, height), aspect, orientation);
    info!(width, height, aspect, ?orientation, "Computed page geometry");

    println!("Container: {} x {} ({:?})", width, height, orientation);
    println!("Page:      {} x {}", geometry.width, geometry.height);
    println!();
    println!("Offsets:");
    for (label, view) in [
        ("front cover", ViewState::FrontCover),
        ("spread", ViewState::Spread),
        ("back cover", ViewState::BackCover),
    ] {
        println!("  {:<12} {:+}", label, centering_offset(view, geometry, orientation));
    }
    Ok(())
}

fn cmd_config(path: &Path, kind: Option<ConfigKind>) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let kind = kind.unwrap_or_else(|| ConfigKind::guess(path));
    info!(path = %path.display(), ?kind, "Checking config");

    let effective = match kind {
        ConfigKind::Reader => serde_json::to_string_pretty(
            &ReaderConfig::from_json(&json).context("Invalid reader config")?,
        )?,
        ConfigKind::Site => serde_json::to_string_pretty(
            &SiteConfig::from_json(&json).context("Invalid site config")?,
        )?,
        ConfigKind::Writer => serde_json::to_string_pretty(
            &WriterConfig::from_json(&json).context("Invalid writer config")?,
        )?,
    };
    println!("{effective}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_kind_from_file_name() {
        assert_eq!(ConfigKind::guess(Path::new("config/writerSimulator.json")), ConfigKind::Writer);
        assert_eq!(ConfigKind::guess(Path::new("config/site.json")), ConfigKind::Site);
        assert_eq!(ConfigKind::guess(Path::new("config/bookReader.json")), ConfigKind::Reader);
    }

    #[test]
    fn test_parse_geometry_args() {
        let cli = Cli::try_parse_from([
            "inkwell-cli", "geometry", "--width", "1000", "--height", "800", "--portrait",
        ])
        .unwrap();
        match cli.command {
            Commands::Geometry {
                width,
                height,
                aspect,
                portrait,
            } => {
                assert_eq!((width, height), (1000.0, 800.0));
                assert_eq!(aspect, 0.65);
                assert!(portrait);
            }
            _ => panic!("expected geometry"),
        }
    }

    #[test]
    fn test_parse_sun_with_negative_longitude() {
        let cli = Cli::try_parse_from([
            "inkwell-cli", "sun", "--date", "2026-06-21", "--lat", "51.5", "--lng", "-0.12",
        ])
        .unwrap();
        match cli.command {
            Commands::Sun { date, lat, lng } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 6, 21));
                assert_eq!((lat, lng), (51.5, -0.12));
            }
            _ => panic!("expected sun"),
        }
    }
}
