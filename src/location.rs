//! Where the user is.
//!
//! A [`LocationProvider`] stands in for the device position API. The
//! [`LocationService`] asks it for a coordinate and, whenever that fails
//! or is not permitted, falls back to the configured default so that
//! distances can always be shown.

use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CafeScoutConfig;
use crate::error::Result;
use crate::geo::GeoPoint;

pub mod translate;

pub use translate::{CURRENT_LOCATION, translate_location_to_japanese};

/// Permission state of the position source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Prompt,
    /// The source cannot report a permission state at all.
    Unavailable,
}

impl fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PermissionStatus::Granted => "granted",
            PermissionStatus::Denied => "denied",
            PermissionStatus::Prompt => "prompt",
            PermissionStatus::Unavailable => "unavailable",
        };
        f.write_str(s)
    }
}

/// Why a position could not be obtained. Messages are shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("位置情報へのアクセスが拒否されました。ブラウザの設定で位置情報を許可してください。")]
    PermissionDenied,

    #[error("位置情報が利用できません。デバイスの位置情報サービスをオンにしてください。")]
    PositionUnavailable,

    #[error("位置情報の取得がタイムアウトしました。もう一度お試しください。")]
    Timeout,

    #[error("位置情報を取得できませんでした")]
    Unknown,
}

/// Source of the user's coordinate.
pub trait LocationProvider: fmt::Debug {
    fn permission(&self) -> PermissionStatus;

    fn current_position(&self) -> std::result::Result<GeoPoint, LocationError>;
}

/// A provider that always reports the same coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation(pub GeoPoint);

impl LocationProvider for FixedLocation {
    fn permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    fn current_position(&self) -> std::result::Result<GeoPoint, LocationError> {
        Ok(self.0)
    }
}

/// A provider that never has a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct NoLocation {
    status: PermissionStatus,
    error: LocationError,
}

impl NoLocation {
    /// Nothing asked yet.
    pub fn prompt() -> Self {
        NoLocation {
            status: PermissionStatus::Prompt,
            error: LocationError::Unknown,
        }
    }

    pub fn denied() -> Self {
        NoLocation {
            status: PermissionStatus::Denied,
            error: LocationError::PermissionDenied,
        }
    }

    pub fn failing(status: PermissionStatus, error: LocationError) -> Self {
        NoLocation { status, error }
    }
}

impl LocationProvider for NoLocation {
    fn permission(&self) -> PermissionStatus {
        self.status
    }

    fn current_position(&self) -> std::result::Result<GeoPoint, LocationError> {
        Err(self.error.clone())
    }
}

/// Address components returned by a reverse geocoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParts {
    pub road: Option<String>,
    /// Suburb, neighbourhood or quarter.
    pub suburb: Option<String>,
    /// City, town, village or state.
    pub city: Option<String>,
}

/// Coordinate to address lookup, provided by the embedding application.
pub trait ReverseGeocoder {
    fn reverse(&self, point: &GeoPoint) -> Result<Option<AddressParts>>;
}

impl<F> ReverseGeocoder for F
where
    F: Fn(&GeoPoint) -> Result<Option<AddressParts>>,
{
    fn reverse(&self, point: &GeoPoint) -> Result<Option<AddressParts>> {
        self(point)
    }
}

/// Display name for an address: up to three parts joined with `", "`, in Japanese.
pub fn format_location_name(parts: &AddressParts) -> String {
    let joined = [&parts.road, &parts.suburb, &parts.city]
        .into_iter()
        .flatten()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .take(3)
        .collect::<Vec<_>>()
        .join(", ");
    translate_location_to_japanese(&joined)
}

/// The coordinate the rest of the app works with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLocation {
    pub point: GeoPoint,
    pub status: PermissionStatus,
    pub name: String,
    /// User-facing message when acquisition failed.
    pub error: Option<String>,
    pub is_fallback: bool,
}

/// Resolves the user's coordinate with fallback to a default.
pub struct LocationService {
    provider: Box<dyn LocationProvider>,
    geocoder: Option<Box<dyn ReverseGeocoder>>,
    default_location: GeoPoint,
    default_name: String,
}

impl fmt::Debug for LocationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationService")
            .field("provider", &self.provider)
            .field("has_geocoder", &self.geocoder.is_some())
            .field("default_location", &self.default_location)
            .field("default_name", &self.default_name)
            .finish()
    }
}

impl LocationService {
    pub fn new<P: LocationProvider + 'static>(provider: P, config: &CafeScoutConfig) -> Self {
        LocationService {
            provider: Box::new(provider),
            geocoder: None,
            default_location: config.default_location,
            default_name: config.default_location_name.clone(),
        }
    }

    pub fn with_geocoder<G: ReverseGeocoder + 'static>(mut self, geocoder: G) -> Self {
        self.geocoder = Some(Box::new(geocoder));
        self
    }

    /// Startup resolution: only a granted source is asked for a position.
    pub fn resolve(&self) -> ResolvedLocation {
        match self.provider.permission() {
            PermissionStatus::Granted => self.request(),
            status => {
                debug!("location permission is {status}, using default location");
                self.fallback(status, None)
            }
        }
    }

    /// Ask the source for a position regardless of the permission state.
    pub fn request(&self) -> ResolvedLocation {
        match self.provider.current_position() {
            Ok(point) => ResolvedLocation {
                point,
                status: PermissionStatus::Granted,
                name: self.name_for(&point),
                error: None,
                is_fallback: false,
            },
            Err(error) => {
                warn!("could not get location: {error}");
                let status = match error {
                    LocationError::PermissionDenied => PermissionStatus::Denied,
                    _ => self.provider.permission(),
                };
                self.fallback(status, Some(error))
            }
        }
    }

    fn fallback(&self, status: PermissionStatus, error: Option<LocationError>) -> ResolvedLocation {
        ResolvedLocation {
            point: self.default_location,
            status,
            name: self.default_name.clone(),
            error: error.map(|e| e.to_string()),
            is_fallback: true,
        }
    }

    fn name_for(&self, point: &GeoPoint) -> String {
        let Some(geocoder) = &self.geocoder else {
            return CURRENT_LOCATION.to_string();
        };
        match geocoder.reverse(point) {
            Ok(Some(parts)) => format_location_name(&parts),
            Ok(None) => CURRENT_LOCATION.to_string(),
            Err(e) => {
                warn!("reverse geocoding failed: {e}");
                CURRENT_LOCATION.to_string()
            }
        }
    }
}
