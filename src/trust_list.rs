//! Access to the certificate trust list (CTL) embedded in a catalog file.
//!
//! The platform service that parses the signed container sits behind
//! [`TrustListStore`]. On Windows that is `CryptQueryObject`; tests and other
//! platforms plug in [`InMemoryTrustListStore`].

use crate::attribute::{decode_attribute, DecodedAttribute};
use crate::error::{MetadataError, MetadataResult};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// OID of the catalog name/value attribute extension
pub const CATALOG_NAME_VALUE_OID: &str = "1.3.6.1.4.1.311.12.2.1";

/// Raw value of one trust-list extension, captured together with its OID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExtensionBlob {
    pub object_id: String,
    pub bytes: Vec<u8>,
}

impl RawExtensionBlob {
    pub fn new(object_id: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            object_id: object_id.into(),
            bytes: bytes.into(),
        }
    }
}

/// An opened trust list. Dropping it releases the underlying handle.
pub trait TrustListContext {
    fn extension_count(&self) -> usize;

    fn extension_object_id(&self, index: usize) -> Option<String>;

    fn extension_value(&self, index: usize) -> Option<&[u8]>;

    /// Time the list was issued, when the container records one
    fn this_update(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Opens catalog files as trust lists.
///
/// `Ok(None)` means the file exists but is not a trust-list container
/// (unsigned, unsupported format). `Err` is reserved for I/O failures.
pub trait TrustListStore {
    type Context: TrustListContext;

    fn open(&self, path: &Path) -> MetadataResult<Option<Self::Context>>;
}

/// Extensions and timestamp pulled out of one catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogContents {
    pub blobs: Vec<RawExtensionBlob>,
    pub this_update: Option<DateTime<Utc>>,
}

impl CatalogContents {
    /// Decodes every blob, skipping the ones that are malformed.
    pub fn attributes(&self) -> Vec<DecodedAttribute> {
        self.blobs
            .iter()
            .filter_map(|blob| decode_attribute(&blob.bytes))
            .collect()
    }
}

/// Scans a catalog's trust list for extensions with a given OID
#[derive(Debug, Clone, Default)]
pub struct TrustListExtensionReader<S> {
    store: S,
}

impl<S: TrustListStore> TrustListExtensionReader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns every extension whose OID equals `target_oid`, in storage order.
    ///
    /// A file that is not a trust list yields an empty vector.
    pub fn extract_extension_blobs(
        &self,
        catalog_path: &Path,
        target_oid: &str,
    ) -> MetadataResult<Vec<RawExtensionBlob>> {
        Ok(self.read_catalog(catalog_path, target_oid)?.blobs)
    }

    /// Like [`Self::extract_extension_blobs`] but also reports the list's issue time.
    pub fn read_catalog(
        &self,
        catalog_path: &Path,
        target_oid: &str,
    ) -> MetadataResult<CatalogContents> {
        // The context is dropped, and its handle released, on every return below.
        let context = match self.store.open(catalog_path)? {
            Some(context) => context,
            None => {
                let unavailable = MetadataError::TrustListUnavailable {
                    path: catalog_path.to_path_buf(),
                };
                log::debug!("{unavailable}");
                return Ok(CatalogContents::default());
            }
        };

        let count = context.extension_count();
        if count == 0 {
            return Ok(CatalogContents {
                blobs: Vec::new(),
                this_update: context.this_update(),
            });
        }

        let mut blobs = Vec::new();
        for index in 0..count {
            // OIDs are fixed ASCII strings, compared exactly.
            let Some(oid) = context.extension_object_id(index) else {
                continue;
            };
            if oid != target_oid {
                continue;
            }
            if let Some(bytes) = context.extension_value(index) {
                blobs.push(RawExtensionBlob::new(oid, bytes));
            }
        }

        log::debug!(
            "{}: {} of {} extensions match {}",
            catalog_path.display(),
            blobs.len(),
            count,
            target_oid
        );

        Ok(CatalogContents {
            blobs,
            this_update: context.this_update(),
        })
    }
}

/// Trust lists held in memory, keyed by path
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrustListStore {
    catalogs: HashMap<PathBuf, InMemoryTrustList>,
}

impl InMemoryTrustListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, list: InMemoryTrustList) {
        self.catalogs.insert(path.into(), list);
    }

    pub fn with_catalog(mut self, path: impl Into<PathBuf>, list: InMemoryTrustList) -> Self {
        self.insert(path, list);
        self
    }
}

impl TrustListStore for InMemoryTrustListStore {
    type Context = InMemoryTrustList;

    fn open(&self, path: &Path) -> MetadataResult<Option<Self::Context>> {
        Ok(self.catalogs.get(path).cloned())
    }
}

/// A trust list whose extensions are plain in-memory values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryTrustList {
    pub extensions: Vec<RawExtensionBlob>,
    pub this_update: Option<DateTime<Utc>>,
}

impl InMemoryTrustList {
    pub fn new(extensions: Vec<RawExtensionBlob>) -> Self {
        Self {
            extensions,
            this_update: None,
        }
    }
}

impl TrustListContext for InMemoryTrustList {
    fn extension_count(&self) -> usize {
        self.extensions.len()
    }

    fn extension_object_id(&self, index: usize) -> Option<String> {
        self.extensions.get(index).map(|e| e.object_id.clone())
    }

    fn extension_value(&self, index: usize) -> Option<&[u8]> {
        self.extensions.get(index).map(|e| e.bytes.as_slice())
    }

    fn this_update(&self) -> Option<DateTime<Utc>> {
        self.this_update
    }
}

/// Fallback for platforms without a native trust-list service.
///
/// Files are still opened so I/O failures surface, but no list is ever
/// returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedTrustListStore;

impl TrustListStore for UnsupportedTrustListStore {
    type Context = InMemoryTrustList;

    fn open(&self, path: &Path) -> MetadataResult<Option<Self::Context>> {
        std::fs::File::open(path).map_err(|e| MetadataError::io(path, e))?;
        log::debug!(
            "No native trust-list service on this platform; {} treated as unsigned",
            path.display()
        );
        Ok(None)
    }
}

#[cfg(windows)]
pub type NativeTrustListStore = crate::crypt_store::CryptQueryStore;

#[cfg(not(windows))]
pub type NativeTrustListStore = UnsupportedTrustListStore;
