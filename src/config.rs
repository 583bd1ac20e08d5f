use std::path::PathBuf;

use clap::Parser;
use eframe::egui::Color32;

/// Dataset opened when no path is given.
pub const DEFAULT_DATA_PATH: &str = "Airbnb_Open_Data.csv";

/// Number of bars in the price histogram.
pub const HISTOGRAM_BINS: usize = 50;

/// Fill colour of the price histogram (#FF5733).
pub const HISTOGRAM_COLOR: Color32 = Color32::from_rgb(0xFF, 0x57, 0x33);

/// Colour of the listing markers on the map.
pub const MAP_POINT_COLOR: Color32 = Color32::from_rgb(0xFF, 0x5A, 0x5F);

pub const WINDOW_SIZE: [f32; 2] = [1280.0, 860.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [720.0, 480.0];

/// Command line options.
#[derive(Debug, Parser)]
#[command(
    name = "listings-dashboard",
    about = "Interactive dashboard over short-term rental listings",
    version
)]
pub struct Cli {
    /// Listings file (.csv or .json)
    #[arg(env = "LISTINGS_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Print the summary for the given filters and exit without a window
    #[arg(long)]
    pub headless: bool,

    /// Lower price bound for --headless (default: lowest price)
    #[arg(long, requires = "headless")]
    pub min_price: Option<f64>,

    /// Upper price bound for --headless (default: highest price)
    #[arg(long, requires = "headless")]
    pub max_price: Option<f64>,

    /// Room type to keep for --headless; repeat for several (default: all)
    #[arg(long = "room-type", requires = "headless")]
    pub room_types: Vec<String>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default log filter for the chosen verbosity; `RUST_LOG` overrides it.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn,listings_dashboard=info",
            1 => "info,listings_dashboard=debug",
            2 => "debug",
            _ => "trace",
        }
    }
}
