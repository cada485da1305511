//! Inputs supplied by the OS: the signed-driver inventory and the catalog store.

use crate::error::MetadataResult;
use crate::hwid::HardwareIdSet;
use std::path::{Path, PathBuf};

/// One installed driver as reported by the signed-driver inventory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedDriver {
    pub device_name: String,
    pub version: String,
    pub manufacturer: String,
    pub inf_name: String,
    pub pnp_device_id: String,
    /// Hardware ID recorded by the driver-signing record
    pub signed_hardware_id: String,
    pub hardware_ids: Vec<String>,
    pub compatible_ids: Vec<String>,
}

impl SignedDriver {
    /// Captures the driver's identifiers for resolution
    pub fn hardware_id_set(&self) -> HardwareIdSet {
        HardwareIdSet::new(
            self.signed_hardware_id.clone(),
            self.hardware_ids.iter().cloned(),
            self.compatible_ids.iter().cloned(),
        )
    }
}

/// Source of installed drivers
pub trait DriverInventory {
    fn drivers(&self) -> MetadataResult<Vec<SignedDriver>>;
}

/// Inventory backed by a fixed list, for snapshots and tests
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    drivers: Vec<SignedDriver>,
}

impl StaticInventory {
    pub fn new(drivers: Vec<SignedDriver>) -> Self {
        Self { drivers }
    }
}

impl DriverInventory for StaticInventory {
    fn drivers(&self) -> MetadataResult<Vec<SignedDriver>> {
        Ok(self.drivers.clone())
    }
}

/// Finds a driver package's catalog by INF name
#[derive(Debug, Clone)]
pub struct CatalogLocator {
    root: PathBuf,
    extension: String,
}

impl CatalogLocator {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `oem42.inf` resolves to `<root>/oem42.cat`. Returns None when the INF
    /// name is empty or no such catalog exists.
    pub fn locate(&self, inf_name: &str) -> Option<PathBuf> {
        let inf_name = inf_name.trim();
        if inf_name.is_empty() {
            return None;
        }

        let catalog_name = Path::new(inf_name).with_extension(&self.extension);
        let path = self.root.join(catalog_name.file_name()?);
        if path.is_file() {
            Some(path)
        } else {
            log::debug!("No catalog for {inf_name} at {}", path.display());
            None
        }
    }
}
