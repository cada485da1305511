//! Scan configuration.
//!
//! Defaults match a stock Windows install. Each field can be overridden from
//! the environment so the tool can be pointed at an exported catalog store.

use crate::error::{MetadataError, MetadataResult};
use crate::trust_list::CATALOG_NAME_VALUE_OID;
use std::path::PathBuf;

/// Catalog store for driver packages installed via the driver store
pub const DEFAULT_CATALOG_ROOT: &str =
    r"C:\Windows\System32\CatRoot\{F750E6C3-38EE-11D1-85E5-00C04FC295EE}";

pub const ENV_TARGET_OID: &str = "CATMETA_TARGET_OID";
pub const ENV_CATALOG_ROOT: &str = "CATMETA_CATALOG_ROOT";
pub const ENV_MANUFACTURER: &str = "CATMETA_MANUFACTURER";

/// Settings shared by catalog and inventory scans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// OID of the trust-list extensions that carry attributes
    pub target_oid: String,

    /// Directory catalogs are looked up in, by INF base name
    pub catalog_root: PathBuf,

    /// Catalog file extension, without the dot
    pub catalog_extension: String,

    /// Attributes whose label starts with this (case-insensitive) are left
    /// out of device metadata
    pub excluded_label_prefix: String,

    /// Only drivers whose manufacturer contains this (case-insensitive)
    pub manufacturer_filter: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            target_oid: CATALOG_NAME_VALUE_OID.to_string(),
            catalog_root: PathBuf::from(DEFAULT_CATALOG_ROOT),
            catalog_extension: "cat".to_string(),
            excluded_label_prefix: "HWID".to_string(),
            manufacturer_filter: None,
        }
    }
}

impl ScanConfig {
    /// Defaults with any `CATMETA_*` environment overrides applied
    pub fn from_env() -> MetadataResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Blank values are ignored.
    pub fn from_lookup<F>(lookup: F) -> MetadataResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(oid) = get(ENV_TARGET_OID) {
            config.target_oid = oid.trim().to_string();
        }
        if let Some(root) = get(ENV_CATALOG_ROOT) {
            config.catalog_root = PathBuf::from(root.trim());
        }
        if let Some(manufacturer) = get(ENV_MANUFACTURER) {
            config.manufacturer_filter = Some(manufacturer.trim().to_string());
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MetadataResult<()> {
        if !is_dotted_oid(&self.target_oid) {
            return Err(MetadataError::Configuration(format!(
                "target OID '{}' is not a dotted numeric identifier",
                self.target_oid
            )));
        }
        if self.catalog_extension.trim().is_empty() {
            return Err(MetadataError::Configuration(
                "catalog extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether an attribute label is excluded from device metadata
    pub fn is_excluded_label(&self, label: &str) -> bool {
        !self.excluded_label_prefix.is_empty()
            && crate::utils::starts_with_ignore_case(label, &self.excluded_label_prefix)
    }

    /// Whether a driver's manufacturer passes the configured filter
    pub fn accepts_manufacturer(&self, manufacturer: &str) -> bool {
        match &self.manufacturer_filter {
            Some(filter) => manufacturer
                .to_uppercase()
                .contains(&filter.to_uppercase()),
            None => true,
        }
    }
}

fn is_dotted_oid(oid: &str) -> bool {
    let arcs: Vec<&str> = oid.split('.').collect();
    arcs.len() >= 2
        && arcs
            .iter()
            .all(|arc| !arc.is_empty() && arc.bytes().all(|b| b.is_ascii_digit()))
}
