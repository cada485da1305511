// RAII-style guards for Win32 crypto handles
// These release the handle when dropped, so early returns cannot leak it

use std::ops::Deref;
use windows::Win32::Security::Cryptography::*;

/// RAII guard for CTL context pointers returned by CryptQueryObject
/// Automatically calls CertFreeCTLContext on drop
pub struct CtlContextHandle(*const CTL_CONTEXT);

impl CtlContextHandle {
    /// Takes ownership of a context pointer. Returns None for null.
    pub fn new(ptr: *const CTL_CONTEXT) -> Option<Self> {
        if ptr.is_null() {
            None
        } else {
            Some(CtlContextHandle(ptr))
        }
    }

    pub fn as_ptr(&self) -> *const CTL_CONTEXT {
        self.0
    }

    /// Borrows the decoded CTL_INFO, if the context has one
    pub fn info(&self) -> Option<&CTL_INFO> {
        unsafe { (*self.0).pCtlInfo.as_ref() }
    }
}

impl Deref for CtlContextHandle {
    type Target = *const CTL_CONTEXT;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Drop for CtlContextHandle {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe {
                let _ = CertFreeCTLContext(Some(self.0));
            }
        }
    }
}

impl std::fmt::Debug for CtlContextHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CtlContextHandle").field(&self.0).finish()
    }
}
