//! catmeta - Windows driver catalog metadata library
//!
//! This library reads the vendor name/value attributes signed into a driver
//! catalog's certificate trust list, and works out which hardware ID an
//! installed driver is bound to (and which one is nicest to show).
//!
//! # Examples
//!
//! ```no_run
//! use catmeta::{MetadataScanner, NativeTrustListStore, ScanConfig};
//! use std::path::Path;
//!
//! let scanner = MetadataScanner::new(ScanConfig::default(), NativeTrustListStore::default());
//! let report = scanner.scan_catalog(Path::new(r"C:\Drivers\oem42.cat"));
//! for (label, value) in report.metadata.iter() {
//!     println!("{label}: {value}");
//! }
//! ```

pub mod attribute;
pub mod config;
pub mod der;
pub mod error;
pub mod hwid;
pub mod inventory;
pub mod record;
pub mod scanner;
pub mod trust_list;
pub mod utils;

#[cfg(windows)]
pub mod crypt_store;
#[cfg(windows)]
pub mod win32_guards;


// Re-export commonly used types for convenience
pub use attribute::{decode_attribute, DecodedAttribute};
pub use config::ScanConfig;
pub use error::{MetadataError, MetadataResult};
pub use hwid::{pick_display_match, pick_raw_match, HardwareIdSet, ResolvedIdentifiers};
pub use inventory::{CatalogLocator, DriverInventory, SignedDriver, StaticInventory};
pub use record::{CatalogReport, DeviceRecord, MetadataMap, MetadataState};
pub use scanner::{MetadataScanner, ScanSummary};
pub use trust_list::{
    InMemoryTrustList, InMemoryTrustListStore, NativeTrustListStore, RawExtensionBlob,
    TrustListContext, TrustListExtensionReader, TrustListStore, CATALOG_NAME_VALUE_OID,
};
