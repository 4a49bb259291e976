//! Catalog document model

use std::sync::OnceLock;

use serde::Deserialize;

use crate::error::Result;

/// Embedded snapshot of the LIFX products database,
/// from <https://github.com/LIFX/products>.
const RAW_PRODUCTS_JSON: &str = include_str!("../products.json");

/// A parsed products document: every vendor and their products.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub vendors: Vec<Vendor>,
}

impl Catalog {
    /// Parse a products document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The embedded snapshot, parsed once.
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: OnceLock<Catalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Catalog::from_json(RAW_PRODUCTS_JSON).expect("embedded products.json must parse")
        })
    }

    pub fn vendor(&self, vendor_id: u32) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.vid == vendor_id)
    }
}

/// A vendor and all their products.
#[derive(Debug, Clone, Deserialize)]
pub struct Vendor {
    /// Vendor identifier; 1 == LIFX.
    pub vid: u32,
    pub name: String,
    /// Vendor-wide capability defaults, merged below product overrides.
    #[serde(default)]
    pub defaults: Features,
    pub products: Vec<Product>,
}

impl Vendor {
    pub fn product(&self, product_id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.pid == product_id)
    }
}

/// One product entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub pid: u32,
    pub name: String,
    #[serde(default)]
    pub features: Features,
    #[serde(default)]
    pub upgrades: Vec<Upgrade>,
}

/// Capability overrides that apply from a firmware version onward.
#[derive(Debug, Clone, Deserialize)]
pub struct Upgrade {
    pub major: u16,
    pub minor: u16,
    #[serde(default)]
    pub features: Features,
}

/// One partial layer of the capability stack.
///
/// Every field is optional: a layer only overrides what it names.
/// Resolution (see [`crate::Catalog::resolve`]) guarantees that all
/// fields end up concrete, except `temperature_range`, which has no
/// vendor-level default.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Features {
    pub hev: Option<bool>,
    pub color: Option<bool>,
    pub matrix: Option<bool>,
    pub multizone: Option<bool>,
    pub extended_multizone: Option<bool>,
    pub temperature_range: Option<[u16; 2]>,
}
