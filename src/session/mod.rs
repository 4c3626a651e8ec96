//! Bounded pipeline sessions invoked from the interactive menu

pub mod scan;
pub mod sync;
pub mod upload;

pub use scan::{Detection, FrameScan, QrCapture, ScanKey, ScanOutcome, ScanSession};
pub use sync::{DeleteReport, SyncSession};
pub use upload::{UploadItem, UploadOutcome, UploadReport, UploadSession};
