//! ESPA geolocation tool.
//!
//! Command line access to scene geolocation, coordinate mapping, HDF-EOS
//! structural metadata and land/water mask generation.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "espa-geo")]
#[command(about = "Scene geolocation and land/water masking for ESPA products")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Geographic bounds of the scene's representative band
    Bounds {
        /// Scene metadata YAML
        #[arg(long)]
        scene: PathBuf,
    },

    /// Latitude/longitude of an image position
    Locate {
        #[arg(long)]
        scene: PathBuf,

        #[arg(long)]
        line: f64,

        #[arg(long)]
        sample: f64,
    },

    /// Image position of a latitude/longitude
    Project {
        #[arg(long)]
        scene: PathBuf,

        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },

    /// Pack decimal degrees as DMS
    Dms {
        #[arg(allow_negative_numbers = true)]
        degrees: f64,

        /// Range the angle is checked against
        #[arg(long, value_enum, default_value = "other")]
        check: CheckArg,
    },

    /// Print HDF-EOS structural metadata for the scene
    StructMeta {
        #[arg(long)]
        scene: PathBuf,
    },

    /// Rasterize the land/water mask and write it as raw bytes
    Mask {
        #[arg(long)]
        scene: PathBuf,

        /// Land-mass polygon file
        #[arg(long, env = "ESPA_LAND_MASS_POLYGON")]
        polygons: Option<PathBuf>,

        /// Output path for the raw mask
        #[arg(long)]
        output: PathBuf,

        /// Log the image and projection summary before rasterizing
        #[arg(long)]
        summary: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CheckArg {
    Lat,
    Lon,
    Other,
}

fn main() -> ExitCode {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let result = match args.command {
        Command::Bounds { scene } => commands::bounds(&scene),
        Command::Locate {
            scene,
            line,
            sample,
        } => commands::locate(&scene, line, sample),
        Command::Project { scene, lat, lon } => commands::project(&scene, lat, lon),
        Command::Dms { degrees, check } => commands::dms(degrees, check.into()),
        Command::StructMeta { scene } => commands::struct_meta(&scene),
        Command::Mask {
            scene,
            polygons,
            output,
            summary,
        } => commands::mask(&scene, polygons, &output, summary),
    };

    match result {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

impl From<CheckArg> for projection::AngleCheck {
    fn from(arg: CheckArg) -> Self {
        match arg {
            CheckArg::Lat => projection::AngleCheck::Lat,
            CheckArg::Lon => projection::AngleCheck::Lon,
            CheckArg::Other => projection::AngleCheck::Other,
        }
    }
}
