//! External collaborator clients: vendor enrichment and remote inventory

pub mod inventory;
pub mod vendor;

pub use inventory::{InventoryService, PartsBoxClient};
pub use vendor::{LcscCatalog, VendorCatalog};
