//! Trust-list store backed by the Win32 `CryptQueryObject` API.

use crate::error::{MetadataError, MetadataResult};
use crate::trust_list::{TrustListContext, TrustListStore};
use crate::utils::{filetime_to_datetime, filetime_ticks, to_wide_null_terminated};
use crate::win32_guards::CtlContextHandle;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::ptr;
use windows::Win32::Security::Cryptography::*;

/// Opens `.cat` files through crypt32 and exposes their CTL extensions
#[derive(Debug, Clone, Copy, Default)]
pub struct CryptQueryStore;

impl TrustListStore for CryptQueryStore {
    type Context = CtlTrustList;

    fn open(&self, path: &Path) -> MetadataResult<Option<Self::Context>> {
        // A missing or unreadable file is a hard failure, unlike a file that
        // simply is not a trust list.
        std::fs::File::open(path).map_err(|e| MetadataError::io(path, e))?;

        let wide_path = to_wide_null_terminated(&path.to_string_lossy());
        let mut context: *mut std::ffi::c_void = ptr::null_mut();

        // Catalogs are signed CTLs
        let content_flags = CERT_QUERY_CONTENT_TYPE_FLAGS(CERT_QUERY_CONTENT_FLAG_CTL.0);
        let format_flags = CERT_QUERY_FORMAT_TYPE_FLAGS(CERT_QUERY_FORMAT_FLAG_ALL.0);

        let result = unsafe {
            CryptQueryObject(
                CERT_QUERY_OBJECT_FILE,
                wide_path.as_ptr() as *const std::ffi::c_void,
                content_flags,
                format_flags,
                0,
                None,
                None,
                None,
                None,
                None,
                Some(&mut context),
            )
        };

        if let Err(e) = result {
            log::debug!("CryptQueryObject failed for {}: {e}", path.display());
            return Ok(None);
        }

        Ok(CtlContextHandle::new(context as *const CTL_CONTEXT).map(|handle| CtlTrustList { handle }))
    }
}

/// An open CTL context; freed when dropped
#[derive(Debug)]
pub struct CtlTrustList {
    handle: CtlContextHandle,
}

impl CtlTrustList {
    fn extension(&self, index: usize) -> Option<&CERT_EXTENSION> {
        let info = self.handle.info()?;
        if index >= info.cExtension as usize || info.rgExtension.is_null() {
            return None;
        }
        unsafe { info.rgExtension.add(index).as_ref() }
    }
}

impl TrustListContext for CtlTrustList {
    fn extension_count(&self) -> usize {
        match self.handle.info() {
            Some(info) if !info.rgExtension.is_null() => info.cExtension as usize,
            _ => 0,
        }
    }

    fn extension_object_id(&self, index: usize) -> Option<String> {
        let ext = self.extension(index)?;
        if ext.pszObjId.is_null() {
            return None;
        }
        unsafe { ext.pszObjId.to_string() }.ok()
    }

    fn extension_value(&self, index: usize) -> Option<&[u8]> {
        let ext = self.extension(index)?;
        let blob = &ext.Value;
        if blob.pbData.is_null() || blob.cbData == 0 {
            return Some(&[]);
        }
        Some(unsafe { std::slice::from_raw_parts(blob.pbData, blob.cbData as usize) })
    }

    fn this_update(&self) -> Option<DateTime<Utc>> {
        let info = self.handle.info()?;
        filetime_to_datetime(filetime_ticks(
            info.ThisUpdate.dwLowDateTime,
            info.ThisUpdate.dwHighDateTime,
        ))
    }
}
