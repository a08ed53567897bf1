use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::cafe::Currency;
use crate::error::Result;
use crate::repository::{SharedStore, load_json, save_json};
use crate::storage::keys;

/// Who the local user is. The name and avatar sign posted reviews.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserProfile {
    /// The name to sign reviews with, `None` when blank.
    pub fn display_name(&self) -> Option<&str> {
        Some(self.name.trim()).filter(|name| !name.is_empty())
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar
            .as_deref()
            .map(str::trim)
            .filter(|avatar| !avatar.is_empty())
    }
}

/// The saved profile and the price currency toggle.
///
/// The currency is stored as a bare `VND`/`JPY` string rather than JSON.
#[derive(Debug)]
pub struct ProfileStore {
    store: SharedStore,
    profile: UserProfile,
    currency: Option<Currency>,
}

impl ProfileStore {
    pub fn load(store: SharedStore) -> Result<Self> {
        let profile = load_json(store.as_ref(), keys::USER_PROFILE)?.unwrap_or_default();

        let currency = match store.get(keys::CURRENCY_PREFERENCE)? {
            Some(raw) => match raw.trim().trim_matches('"').parse::<Currency>() {
                Ok(currency) => Some(currency),
                Err(e) => {
                    warn!("ignoring stored currency preference: {e}");
                    None
                }
            },
            None => None,
        };

        Ok(ProfileStore {
            store,
            profile,
            currency,
        })
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn save_profile(&mut self, profile: UserProfile) -> Result<()> {
        let profile = UserProfile {
            name: profile.name.trim().to_string(),
            email: profile.email.trim().to_string(),
            phone: profile.phone.trim().to_string(),
            avatar: profile.avatar().map(str::to_string),
        };
        save_json(self.store.as_ref(), keys::USER_PROFILE, &profile)?;
        info!("saved profile");
        self.profile = profile;
        Ok(())
    }

    /// The saved currency, or `fallback` when the user never picked one.
    pub fn currency(&self, fallback: Currency) -> Currency {
        self.currency.unwrap_or(fallback)
    }

    pub fn set_currency(&mut self, currency: Currency) -> Result<()> {
        self.store.set(keys::CURRENCY_PREFERENCE, currency.as_str())?;
        self.currency = Some(currency);
        Ok(())
    }

    /// Switch to the other currency and return it.
    pub fn toggle_currency(&mut self, fallback: Currency) -> Result<Currency> {
        let next = self.currency(fallback).toggled();
        self.set_currency(next)?;
        Ok(next)
    }
}
