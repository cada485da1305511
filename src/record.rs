//! Output records combining resolved identifiers with catalog metadata.

use crate::attribute::DecodedAttribute;
use crate::hwid::is_display_hit;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

/// Width of the label column when printing metadata
const LABEL_WIDTH: usize = 22;

/// Label to value mapping that keeps first-seen order.
///
/// Labels compare case-insensitively. Inserting an existing label replaces
/// its value in place, so the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataMap {
    entries: Vec<(String, String)>,
}

impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds decoded attributes in order, dropping labels rejected by `exclude`.
    pub fn from_attributes<'a, I, F>(attributes: I, exclude: F) -> Self
    where
        I: IntoIterator<Item = &'a DecodedAttribute>,
        F: Fn(&str) -> bool,
    {
        let mut map = Self::new();
        for attribute in attributes {
            if !exclude(&attribute.label) {
                map.insert(attribute.label.clone(), attribute.value.clone());
            }
        }
        map
    }

    pub fn insert(&mut self, label: String, value: String) {
        let key = label.to_uppercase();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.to_uppercase() == key)
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        let key = label.to_uppercase();
        self.entries
            .iter()
            .find(|(existing, _)| existing.to_uppercase() == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// What came of looking for a device's or file's catalog metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataState {
    /// No catalog could be located
    NoCatalog,
    /// Catalog read, but no attribute survived decoding and filtering
    NoMetadata,
    /// At least one attribute was decoded
    Found,
    /// Reading the catalog failed
    Failed(String),
}

impl MetadataState {
    pub fn for_map(map: &MetadataMap) -> Self {
        if map.is_empty() {
            MetadataState::NoMetadata
        } else {
            MetadataState::Found
        }
    }
}

/// Metadata pulled from a single catalog file
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogReport {
    pub catalog_path: PathBuf,
    pub catalog_updated: Option<DateTime<Utc>>,
    pub metadata: MetadataMap,
    pub state: MetadataState,
}

/// One device: identity, resolved IDs and catalog metadata
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRecord {
    pub device_name: String,
    pub version: String,
    pub manufacturer: String,
    pub inf_name: String,
    pub pnp_device_id: String,
    pub signed_hardware_id: String,
    pub catalog_path: Option<PathBuf>,
    pub catalog_updated: Option<DateTime<Utc>>,
    pub raw_matched_hardware_id: String,
    pub display_matched_hardware_id: String,
    pub hardware_ids: Vec<String>,
    pub compatible_ids: Vec<String>,
    pub metadata: MetadataMap,
    pub metadata_state: MetadataState,
}

fn write_metadata(
    f: &mut fmt::Formatter<'_>,
    state: &MetadataState,
    metadata: &MetadataMap,
) -> fmt::Result {
    match state {
        MetadataState::NoCatalog => writeln!(f, " └─ Catalog: Not found or not signed."),
        MetadataState::NoMetadata => writeln!(
            f,
            " └─ No metadata found (not signed / unsupported format / no target OID)."
        ),
        MetadataState::Failed(reason) => writeln!(f, " └─ Parse failed: {reason}"),
        MetadataState::Found => {
            for (label, value) in metadata.iter() {
                writeln!(f, "    > {label:<width$} : {value}", width = LABEL_WIDTH)?;
            }
            Ok(())
        }
    }
}

impl fmt::Display for CatalogReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[CAT] {}", self.catalog_path.display())?;
        if let Some(updated) = self.catalog_updated {
            writeln!(f, " ├─ Updated: {}", updated.format("%Y-%m-%d %H:%M:%S UTC"))?;
        }
        write_metadata(f, &self.state, &self.metadata)
    }
}

impl fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[DEVICE] {}", self.device_name)?;
        writeln!(
            f,
            " ├─ Version: {} | Manufacturer: {}",
            self.version, self.manufacturer
        )?;
        if !self.pnp_device_id.is_empty() {
            writeln!(f, " ├─ PnP DeviceID: {}", self.pnp_device_id)?;
        }
        if !self.signed_hardware_id.is_empty() {
            writeln!(f, " ├─ SignedDriver HardWareID: {}", self.signed_hardware_id)?;
        }
        let shown = if self.display_matched_hardware_id.is_empty() {
            &self.raw_matched_hardware_id
        } else {
            &self.display_matched_hardware_id
        };
        writeln!(f, " ├─ Matched HWID (DISPLAY): {shown}")?;

        if self.hardware_ids.is_empty() {
            writeln!(f, " ├─ HardwareID(s): (N/A)")?;
        } else {
            writeln!(f, " ├─ HardwareID(s):")?;
            for id in &self.hardware_ids {
                if is_display_hit(
                    id,
                    &self.display_matched_hardware_id,
                    &self.raw_matched_hardware_id,
                ) {
                    writeln!(f, " │   ► {id}   [HIT ID]")?;
                } else {
                    writeln!(f, " │     {id}")?;
                }
            }
        }
        if !self.compatible_ids.is_empty() {
            writeln!(f, " ├─ CompatibleID(s):")?;
            for id in &self.compatible_ids {
                writeln!(f, " │     {id}")?;
            }
        }

        if let Some(path) = &self.catalog_path {
            writeln!(f, " └─ Catalog: {}", path.display())?;
        }
        write_metadata(f, &self.metadata_state, &self.metadata)
    }
}
