//! End-to-end scans: inventory drivers to device records, and catalog files
//! to metadata reports.

use crate::config::ScanConfig;
use crate::error::{MetadataError, MetadataResult};
use crate::inventory::{CatalogLocator, DriverInventory, SignedDriver};
use crate::record::{CatalogReport, DeviceRecord, MetadataMap, MetadataState};
use crate::trust_list::{TrustListExtensionReader, TrustListStore};
use std::path::{Path, PathBuf};

/// Counts from a catalog batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub total: usize,
    pub ok: usize,
    pub empty: usize,
    pub failed: usize,
}

impl ScanSummary {
    fn record(&mut self, state: &MetadataState) {
        self.total += 1;
        match state {
            MetadataState::Found => self.ok += 1,
            MetadataState::NoMetadata | MetadataState::NoCatalog => self.empty += 1,
            MetadataState::Failed(_) => self.failed += 1,
        }
    }
}

impl std::fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total: {}, OK: {}, Empty: {}, Failed: {}",
            self.total, self.ok, self.empty, self.failed
        )
    }
}

/// Ties configuration, catalog store and reader together
#[derive(Debug)]
pub struct MetadataScanner<S> {
    config: ScanConfig,
    reader: TrustListExtensionReader<S>,
    locator: CatalogLocator,
}

impl<S: TrustListStore> MetadataScanner<S> {
    pub fn new(config: ScanConfig, store: S) -> Self {
        let locator = CatalogLocator::new(&config.catalog_root, &config.catalog_extension);
        Self {
            config,
            reader: TrustListExtensionReader::new(store),
            locator,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Decodes a catalog's attributes into a metadata map.
    ///
    /// Only I/O failures are errors. Malformed attributes are skipped.
    pub fn read_catalog(&self, catalog_path: &Path) -> MetadataResult<CatalogReport> {
        let contents = self
            .reader
            .read_catalog(catalog_path, &self.config.target_oid)?;
        let attributes = contents.attributes();
        let metadata = MetadataMap::from_attributes(&attributes, |label| {
            self.config.is_excluded_label(label)
        });

        Ok(CatalogReport {
            catalog_path: catalog_path.to_path_buf(),
            catalog_updated: contents.this_update,
            state: MetadataState::for_map(&metadata),
            metadata,
        })
    }

    /// Like [`Self::read_catalog`] but folds errors into a `Failed` report.
    pub fn scan_catalog(&self, catalog_path: &Path) -> CatalogReport {
        self.read_catalog(catalog_path).unwrap_or_else(|e| {
            log::warn!("Failed to read {}: {e}", catalog_path.display());
            CatalogReport {
                catalog_path: catalog_path.to_path_buf(),
                catalog_updated: None,
                metadata: MetadataMap::new(),
                state: MetadataState::Failed(e.to_string()),
            }
        })
    }

    /// Scans a single catalog file, or every catalog below a directory.
    pub fn scan_path(&self, path: &Path) -> MetadataResult<(Vec<CatalogReport>, ScanSummary)> {
        let metadata = std::fs::metadata(path).map_err(|e| MetadataError::io(path, e))?;

        let catalogs = if metadata.is_dir() {
            let mut found = Vec::new();
            self.collect_catalogs(path, &mut found)?;
            found.sort();
            found
        } else if self.is_catalog_file(path) {
            vec![path.to_path_buf()]
        } else {
            return Err(MetadataError::Configuration(format!(
                "{} is a file but not a .{} catalog",
                path.display(),
                self.config.catalog_extension
            )));
        };

        let mut summary = ScanSummary::default();
        let reports: Vec<CatalogReport> = catalogs
            .iter()
            .map(|catalog| {
                let report = self.scan_catalog(catalog);
                summary.record(&report.state);
                report
            })
            .collect();

        log::info!("Scanned {}: {summary}", path.display());
        Ok((reports, summary))
    }

    /// Builds the output record for one installed driver.
    pub fn describe_driver(&self, driver: &SignedDriver) -> DeviceRecord {
        let ids = driver.hardware_id_set();
        let resolved = ids.resolve();
        if resolved.raw_matched.is_empty() {
            log::debug!(
                "No usable hardware ID for {} ({})",
                driver.device_name,
                driver.pnp_device_id
            );
        }

        let catalog_path = self.locator.locate(&driver.inf_name);
        let (catalog_updated, metadata, metadata_state) = match &catalog_path {
            None => (None, MetadataMap::new(), MetadataState::NoCatalog),
            Some(path) => {
                let report = self.scan_catalog(path);
                (report.catalog_updated, report.metadata, report.state)
            }
        };

        DeviceRecord {
            device_name: driver.device_name.clone(),
            version: driver.version.clone(),
            manufacturer: driver.manufacturer.clone(),
            inf_name: driver.inf_name.clone(),
            pnp_device_id: driver.pnp_device_id.clone(),
            signed_hardware_id: driver.signed_hardware_id.clone(),
            catalog_path,
            catalog_updated,
            raw_matched_hardware_id: resolved.raw_matched,
            display_matched_hardware_id: resolved.display_matched,
            hardware_ids: ids.hardware_ids,
            compatible_ids: ids.compatible_ids,
            metadata,
            metadata_state,
        }
    }

    /// Describes every driver the inventory reports that passes the manufacturer filter.
    pub fn scan_inventory(&self, inventory: &dyn DriverInventory) -> MetadataResult<Vec<DeviceRecord>> {
        let records: Vec<DeviceRecord> = inventory
            .drivers()?
            .iter()
            .filter(|driver| self.config.accepts_manufacturer(&driver.manufacturer))
            .map(|driver| self.describe_driver(driver))
            .collect();

        log::info!("Described {} drivers", records.len());
        Ok(records)
    }

    fn is_catalog_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.config.catalog_extension))
    }

    fn collect_catalogs(&self, dir: &Path, found: &mut Vec<PathBuf>) -> MetadataResult<()> {
        let entries = std::fs::read_dir(dir).map_err(|e| MetadataError::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| MetadataError::io(dir, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| MetadataError::io(&path, e))?;
            if file_type.is_dir() {
                self.collect_catalogs(&path, found)?;
            } else if file_type.is_file() && self.is_catalog_file(&path) {
                found.push(path);
            }
        }
        Ok(())
    }
}
