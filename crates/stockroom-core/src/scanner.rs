//! # Barcode Capture
//!
//! Manual EAN entry and the scoped capture-device session that wraps it.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ScanSession                                     │
//! │                                                                         │
//! │   open ──► acquire() ──┬── Ok  ──► capturing ──┬── confirm(valid) ──┐   │
//! │                        │                       ├── cancel()         ├─► release()
//! │                        │                       └── drop / unwind ───┘   │
//! │                        │                                                │
//! │                        └── Err ──► manual only (error kept) ──► no release
//! │                                                                         │
//! │   Manual entry works in both states.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The device handle lives in an `Option` that is `take`n on release, so a
//! device is released at most once and only if it was acquired.

use crate::ean::{explain_ean_error, normalize_ean, EanError};

/// Validates a hand-typed barcode and returns it without whitespace.
///
/// ## Example
/// ```rust
/// use stockroom_core::scanner::accept_manual_entry;
///
/// assert_eq!(accept_manual_entry(" 4006381333931 ").unwrap(), "4006381333931");
/// assert!(accept_manual_entry("4006381333930").is_err());
/// ```
pub fn accept_manual_entry(input: &str) -> Result<String, EanError> {
    match explain_ean_error(input) {
        None => Ok(normalize_ean(input)),
        Some(reason) => Err(reason),
    }
}

// =============================================================================
// Capture Device
// =============================================================================

/// A camera (or other scanner) that must be explicitly released.
pub trait CaptureDevice {
    /// Proof of a successful acquisition; handed back on release.
    type Handle;
    type Error: std::error::Error;

    fn acquire(&mut self) -> Result<Self::Handle, Self::Error>;

    fn release(&mut self, handle: Self::Handle);
}

// =============================================================================
// Scan Session
// =============================================================================

/// An open barcode dialog holding the capture device.
pub struct ScanSession<D: CaptureDevice> {
    device: D,
    handle: Option<D::Handle>,
    error: Option<String>,
}

impl<D: CaptureDevice> ScanSession<D> {
    /// Opens a session, trying to acquire `device`.
    ///
    /// Acquisition failure is not an error here: the message is kept for
    /// display and the session falls back to manual entry.
    pub fn open(mut device: D) -> Self {
        let (handle, error) = match device.acquire() {
            Ok(handle) => (Some(handle), None),
            Err(err) => (None, Some(err.to_string())),
        };
        Self {
            device,
            handle,
            error,
        }
    }

    /// Checks if the device is currently held.
    pub fn is_capturing(&self) -> bool {
        self.handle.is_some()
    }

    /// Why the device could not be acquired, if it could not.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Accepts a barcode and closes the capture.
    ///
    /// Invalid input leaves the session exactly as it was, so the user can
    /// try again.
    pub fn confirm(&mut self, input: &str) -> Result<String, EanError> {
        let code = accept_manual_entry(input)?;
        self.release();
        Ok(code)
    }

    /// Closes the session without a barcode.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.device.release(handle);
        }
    }
}

impl<D: CaptureDevice> Drop for ScanSession<D> {
    fn drop(&mut self) {
        self.release();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
