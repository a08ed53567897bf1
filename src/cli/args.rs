//! Command line argument parsing for the cafescout CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::cafe::{CafeId, Currency, PriceRange};
use crate::filter::FilterKey;
use crate::ranking::SortMode;
use crate::recommend::{Amenity, CafeType, MaxDistance};
use crate::review::ReviewSort;

/// cafescout - find cafés near you
#[derive(Parser, Debug, Clone)]
#[command(name = "cafescout")]
#[command(about = "Search, rank and recommend cafés around you")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct CafeScoutArgs {
    /// Verbosity level (-v normal, -vv verbose, -vvv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(long, value_name = "FILE", env = "CAFESCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for saved favorites, reviews and preferences
    #[arg(long, value_name = "DIR", env = "CAFESCOUT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl CafeScoutArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search cafés by text, filters and sort order
    Search(SearchArgs),

    /// Recommend cafés from saved preferences
    Recommend(RecommendArgs),

    /// Great-circle distance between two coordinates
    #[command(allow_negative_numbers = true)]
    Distance(DistanceArgs),

    /// Submit a new café
    #[command(name = "add-cafe")]
    AddCafe(AddCafeArgs),

    /// Manage favorites
    #[command(subcommand)]
    Favorite(FavoriteCommand),

    /// Read and write reviews
    #[command(subcommand)]
    Review(ReviewCommand),

    /// Show or change recommendation preferences
    #[command(subcommand)]
    Preferences(PreferencesCommand),

    /// Show or change the profile and price currency
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Print the café context handed to the chat assistant
    #[command(name = "chat-context")]
    ChatContext(ChatContextArgs),
}

/// Where the user is.
#[derive(Args, Debug, Clone, Default)]
pub struct LocationArgs {
    /// User latitude
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// User longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Do not use any location, not even the default one
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub no_location: bool,
}

/// Arguments for searching
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Text to match against name, address and tags
    #[arg(value_name = "QUERY", default_value = "")]
    pub query: String,

    /// Active filter (dogFriendly, catFriendly, wifi, powerOutlets, outdoor,
    /// cheap, moderate, expensive)
    #[arg(long = "filter", value_name = "KEY")]
    pub filters: Vec<FilterKey>,

    /// Sort order (rating, distance, price-low)
    #[arg(short, long, default_value = "rating")]
    pub sort: SortMode,

    /// Maximum number of results to print
    #[arg(short, long)]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub location: LocationArgs,
}

/// Arguments for recommendations
#[derive(Args, Debug, Clone)]
pub struct RecommendArgs {
    /// Number of cafés (defaults to the configured limit)
    #[arg(short, long)]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub location: LocationArgs,
}

/// Arguments for the distance calculator
#[derive(Args, Debug, Clone)]
pub struct DistanceArgs {
    #[arg(value_name = "LAT1")]
    pub lat1: f64,

    #[arg(value_name = "LNG1")]
    pub lng1: f64,

    #[arg(value_name = "LAT2")]
    pub lat2: f64,

    #[arg(value_name = "LNG2")]
    pub lng2: f64,
}

/// Arguments for submitting a café
#[derive(Args, Debug, Clone)]
pub struct AddCafeArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub address: String,

    /// Price tier (cheap, moderate, expensive)
    #[arg(long, default_value = "moderate")]
    pub price: PriceRange,

    /// Tag, repeatable
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub hours: String,

    /// Café latitude; placed near the default location when omitted
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Café longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FavoriteCommand {
    /// Add or remove a favorite
    Toggle {
        #[arg(value_name = "CAFE_ID")]
        id: CafeId,
    },

    /// List favorite cafés
    List,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ReviewCommand {
    /// Post a review
    Add(ReviewAddArgs),

    /// Like or unlike a review
    Like {
        #[arg(value_name = "REVIEW_ID")]
        review_id: String,

        #[arg(long, default_value = "local")]
        user: String,
    },

    /// List a café's reviews
    List {
        #[arg(value_name = "CAFE_ID")]
        id: CafeId,

        /// Order (most-liked, newest)
        #[arg(long, default_value = "most-liked")]
        sort: ReviewSort,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ReviewAddArgs {
    #[arg(value_name = "CAFE_ID")]
    pub id: CafeId,

    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Author name; defaults to the profile name, then ゲスト
    #[arg(long)]
    pub user: Option<String>,

    #[arg(long, default_value = "5")]
    pub drinks: f64,

    #[arg(long, default_value = "5")]
    pub food: f64,

    #[arg(long, default_value = "5")]
    pub service: f64,

    #[arg(long, default_value = "5")]
    pub atmosphere: f64,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PreferencesCommand {
    /// Print saved preferences
    Show,

    /// Replace saved preferences
    Set(PreferencesSetArgs),

    /// Forget saved preferences
    Clear,
}

#[derive(Args, Debug, Clone)]
pub struct PreferencesSetArgs {
    /// Café type (dog, cat, work, quiet), repeatable
    #[arg(long = "type", value_name = "TYPE")]
    pub cafe_types: Vec<CafeType>,

    /// Price tier, repeatable
    #[arg(long = "price", value_name = "PRICE")]
    pub prices: Vec<PriceRange>,

    /// Maximum distance in km, or "any"
    #[arg(long, default_value = "5")]
    pub max_distance: MaxDistance,

    /// Amenity (wifi, outlets, outdoor), repeatable
    #[arg(long = "amenity", value_name = "AMENITY")]
    pub amenities: Vec<Amenity>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommand {
    /// Print the saved profile
    Show,

    /// Update profile fields; omitted fields keep their value
    Set(ProfileSetArgs),

    /// Set the price currency (VND, JPY), or switch to the other one
    Currency {
        #[arg(value_name = "CURRENCY")]
        currency: Option<Currency>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ProfileSetArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// Avatar image URL or path
    #[arg(long)]
    pub avatar: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ChatContextArgs {
    #[command(flatten)]
    pub location: LocationArgs,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    Human,
    /// JSON
    Json,
}
