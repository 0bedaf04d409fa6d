//! User profile state.
//!
//! Profile fields prefill drafted documents. Unlike the session stores the
//! profile outlives any single session: it is hydrated from disk once at
//! startup and written back on every mutation (see [`store`]).

pub mod store;

use serde::{Deserialize, Serialize};

pub use store::ProfileStore;

/// Country assumed when the user has not set one.
pub const DEFAULT_COUNTRY: &str = "France";
/// Role assumed when the user has not set one.
pub const DEFAULT_ROLE: &str = "entrepreneur";

/// Persisted user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub role: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            role: DEFAULT_ROLE.to_string(),
            address: String::new(),
            postal_code: String::new(),
            city: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

/// A partial profile update; `None` fields are left as they were.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub role: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// User profile store.
#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    pub profile: UserProfile,
    /// True once the persisted profile has been restored from storage.
    /// Consumers should not trust the field values before this is set.
    pub loaded: bool,
}

impl ProfileState {
    /// Merges the patch into the profile. Additive only.
    pub fn update_profile(&mut self, patch: ProfilePatch) {
        let p = &mut self.profile;
        if let Some(v) = patch.first_name {
            p.first_name = v;
        }
        if let Some(v) = patch.last_name {
            p.last_name = v;
        }
        if let Some(v) = patch.email {
            p.email = v;
        }
        if let Some(v) = patch.phone {
            p.phone = v;
        }
        if let Some(v) = patch.company {
            p.company = v;
        }
        if let Some(v) = patch.role {
            p.role = v;
        }
        if let Some(v) = patch.address {
            p.address = v;
        }
        if let Some(v) = patch.postal_code {
            p.postal_code = v;
        }
        if let Some(v) = patch.city {
            p.city = v;
        }
        if let Some(v) = patch.country {
            p.country = v;
        }
    }

    /// Restores the fixed default profile.
    pub fn reset_profile(&mut self) {
        self.profile = UserProfile::default();
    }

    /// Signals that hydration from storage has finished.
    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }
}

/// Formats the profile's mailing address.
///
/// Line 1 is the street address; line 2 is postal code and city (trimmed,
/// space-joined) when either is present; the country gets its own line only
/// when it differs from [`DEFAULT_COUNTRY`]. Empty lines are omitted.
pub fn format_full_address(profile: &UserProfile) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(3);

    if !profile.address.is_empty() {
        lines.push(profile.address.clone());
    }

    let locality = format!("{} {}", profile.postal_code, profile.city)
        .trim()
        .to_string();
    if !locality.is_empty() {
        lines.push(locality);
    }

    if !profile.country.is_empty() && profile.country != DEFAULT_COUNTRY {
        lines.push(profile.country.clone());
    }

    lines.join("\n")
}
