//! # partscan
//!
//! Capture-and-staging pipeline for component-bag QR codes:
//! - QR payload parsing and per-session detection deduplication
//! - Vendor-catalog enrichment of scanned records
//! - Durable JSON staging between scan, upload, and sync sessions
//! - Batch upload to a PartsBox-style parts-inventory API

pub mod capture;
pub mod config;
pub mod detection;
pub mod error;
pub mod parser;
pub mod services;
pub mod session;
pub mod staging;
pub mod types;

pub use config::{Cli, Config};
pub use error::{Error, Result};
pub use types::{PartRecord, VendorInfo};
