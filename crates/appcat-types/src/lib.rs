//! Foundation types for appcat, the Linux application-signature catalog.
//!
//! This crate provides the domain model shared by the store, the HTTP
//! server, and the CLI. Every other appcat crate depends on `appcat-types`.
//!
//! # Key Types
//!
//! - [`AppEntry`]: A single (name, publisher) pair
//! - [`Application`]: A non-empty ordered list of pairs edited as one entry
//! - [`Category`]: A named group of applications
//! - [`CatalogDocument`]: The `linuxCategories` JSON document used on the wire and on disk
//! - [`CatalogStats`] / [`UploadSummary`]: Read-side and merge-side reports
//!
//! The wire format stores each application as two parallel arrays
//! (`app_name`, `publisher`). The domain model stores pairs instead, so a
//! length mismatch can only exist at the boundary, where
//! [`Application::try_from`] rejects it with a [`ShapeError`].

pub mod application;
pub mod category;
pub mod error;
pub mod names;
pub mod wire;

pub use application::{AppEntry, Application};
pub use category::Category;
pub use error::ShapeError;
pub use names::{category_eq, download_file_name, validate_category_name, FULL_EXPORT_FILE_NAME};
pub use wire::{ApplicationRecord, CatalogDocument, CatalogStats, CategoryRecord, UploadSummary};
