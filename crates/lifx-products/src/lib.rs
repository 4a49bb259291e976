//! LIFX product catalog
//!
//! Maps a device's (vendor, product, firmware) identity, obtained via
//! GetVersion and GetHostFirmware, to its feature set. The catalog
//! document has layered semantics: vendor-wide defaults, per-product
//! overrides, and firmware-gated upgrades, each layer only setting the
//! fields it names. [`Catalog::resolve`] flattens the layers into a
//! fully-specified [`Capabilities`].
//!
//! A snapshot of <https://github.com/LIFX/products> ships embedded; use
//! [`Catalog::from_json`] to load a newer document.

pub mod catalog;
pub mod error;
pub mod resolve;

pub use catalog::{Catalog, Features, Product, Upgrade, Vendor};
pub use error::{ProductsError, Result};
pub use resolve::{Capabilities, FirmwareVersion, ResolvedProduct};
