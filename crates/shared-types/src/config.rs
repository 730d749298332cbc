use serde::{Deserialize, Serialize};

/// Feature flags controlling which optional integrations are active.
///
/// Loaded from `config.toml` at server startup. Every field defaults to
/// `false` so that a missing or incomplete config file disables all
/// optional integrations.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeatureFlags {
    /// Send email copies of case notifications through Mailgun.
    #[serde(default)]
    pub mailgun: bool,
}

/// Display details of the barangay running the portal, used in email bodies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BarangayInfo {
    #[serde(default = "default_barangay_name")]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province: String,
}

fn default_barangay_name() -> String {
    "Barangay".to_string()
}

impl Default for BarangayInfo {
    fn default() -> Self {
        Self {
            name: default_barangay_name(),
            city: String::new(),
            province: String::new(),
        }
    }
}

impl BarangayInfo {
    /// "Name, City, Province" with empty parts skipped.
    pub fn display_name(&self) -> String {
        [self.name.as_str(), self.city.as_str(), self.province.as_str()]
            .iter()
            .filter(|s| !s.trim().is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub barangay: BarangayInfo,
}
