//! Runtime configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cafe::Currency;
use crate::error::{CafeScoutError, Result};
use crate::geo::{DEFAULT_LOCATION, GeoPoint};
use crate::ranking::DISTANCE_TIE_TOLERANCE_KM;
use crate::recommend::DEFAULT_TOP_N;

/// Settings shared by the library and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CafeScoutConfig {
    /// Coordinate used whenever the user's own position is unknown.
    pub default_location: GeoPoint,
    /// Display name for the default coordinate.
    pub default_location_name: String,
    /// Distances closer than this sort as a tie (km).
    pub distance_tie_tolerance_km: f64,
    /// Number of recommendations to return.
    pub recommendation_limit: usize,
    /// Radius shown for the "any distance" preference (km).
    pub any_distance_km: f64,
    /// Cafés included in a chat context.
    pub chat_context_limit: usize,
    /// Reviews included per café in a chat context.
    pub chat_review_limit: usize,
    /// Review text length in a chat context, in characters.
    pub chat_review_chars: usize,
    /// Currency for price tier labels.
    pub currency: Currency,
    /// Directory for file-backed storage; in-memory when unset.
    pub data_dir: Option<PathBuf>,
}

impl Default for CafeScoutConfig {
    fn default() -> Self {
        Self {
            default_location: DEFAULT_LOCATION,
            default_location_name: "ハノイ (デフォルト)".to_string(),
            distance_tie_tolerance_km: DISTANCE_TIE_TOLERANCE_KM,
            recommendation_limit: DEFAULT_TOP_N,
            any_distance_km: 100.0,
            chat_context_limit: 10,
            chat_review_limit: 3,
            chat_review_chars: 100,
            currency: Currency::Vnd,
            data_dir: None,
        }
    }
}

impl CafeScoutConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            CafeScoutError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: CafeScoutConfig = serde_json::from_str(&raw).map_err(|e| {
            CafeScoutError::config(format!("invalid config {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        GeoPoint::checked(self.default_location.lat, self.default_location.lng)
            .map_err(|e| CafeScoutError::config(format!("default_location: {e}")))?;

        if !self.distance_tie_tolerance_km.is_finite() || self.distance_tie_tolerance_km < 0.0 {
            return Err(CafeScoutError::config(
                "distance_tie_tolerance_km must be a non-negative number",
            ));
        }
        if !self.any_distance_km.is_finite() || self.any_distance_km <= 0.0 {
            return Err(CafeScoutError::config("any_distance_km must be positive"));
        }

        let limits = [
            ("recommendation_limit", self.recommendation_limit),
            ("chat_context_limit", self.chat_context_limit),
            ("chat_review_limit", self.chat_review_limit),
            ("chat_review_chars", self.chat_review_chars),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(CafeScoutError::config(format!("{name} must be at least 1")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = CafeScoutConfig::default();
        assert_eq!(config.default_location, DEFAULT_LOCATION);
        assert_eq!(config.distance_tie_tolerance_km, 0.1);
        assert_eq!(config.recommendation_limit, 5);
        assert_eq!(config.chat_context_limit, 10);
        assert_eq!(config.currency, Currency::Vnd);
        assert!(config.data_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"recommendation_limit": 8, "currency": "JPY", "data_dir": "/tmp/cafes"}}"#
        )
        .unwrap();

        let config = CafeScoutConfig::load(file.path()).unwrap();
        assert_eq!(config.recommendation_limit, 8);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/cafes")));
        assert_eq!(config.currency, Currency::Jpy);
        assert_eq!(config.chat_review_chars, 100);
    }

    #[test]
    fn test_load_missing_file() {
        let result = CafeScoutConfig::load("/definitely/not/here.json");
        assert!(matches!(result, Err(CafeScoutError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CafeScoutConfig::default();
        config.distance_tie_tolerance_km = -0.5;
        assert!(config.validate().is_err());

        let mut config = CafeScoutConfig::default();
        config.chat_review_limit = 0;
        assert!(config.validate().is_err());

        let mut config = CafeScoutConfig::default();
        config.default_location = GeoPoint::new(f64::NAN, 105.0);
        assert!(config.validate().is_err());
    }
}
