//! Tri-source reconciliation engine.
//!
//! The catalog (`gamedata/FurnitureData.json`), the emulator database, and
//! the object store all describe the same set of furniture assets. This crate
//! computes where they disagree and converges the database, the storage
//! bucket, and the catalog itself toward the catalog's view:
//!
//! - [`catalog_io`]: load and rewrite the catalog document
//! - [`scanner`]: parallel enumeration of the bundle prefix
//! - [`integrity`]: the asset-centric three-way join
//! - [`detail`]: single-item deep check
//! - [`plan`]: deletion planning from an integrity report
//! - [`service`]: the sync orchestrator

pub mod catalog_io;
pub mod detail;
pub mod error;
pub mod integrity;
pub mod plan;
pub mod report;
pub mod scanner;
pub mod service;

pub use catalog_io::{CATALOG_CONTENT_TYPE, CATALOG_KEY, load_catalog, save_catalog};
pub use detail::{DetailReport, IntegrityStatus};
pub use error::{SyncError, SyncResult};
pub use integrity::build_asset_report;
pub use plan::{DeletionPlan, plan_deletions};
pub use report::{AssetEntry, IntegrityReport, SyncReport};
pub use scanner::{BUNDLE_PREFIX, scan_bundles};
pub use service::SyncService;
