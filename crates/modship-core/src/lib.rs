#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod bundles;
pub mod config;
pub mod emit;
pub mod error;
pub mod paths;
pub mod resolve;
pub mod scan;
pub mod translate;

pub use bundles::{parse_declarations, plan_bundles, plans_to_json, BundleDecl, BundlePlan};
pub use config::{Config, MapTarget, Matcher};
pub use emit::{aggregate, wrap_module, WrappedModule};
pub use error::{Error, Result};
pub use resolve::{resolve_id, FileKind, ResolvedLocation, BUNDLE_MANIFEST_ID, LOADER_ID};
pub use scan::{dependencies, resolve_relative, scan_requires};
pub use translate::translate;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
