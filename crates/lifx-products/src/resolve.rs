//! Capability resolution

use std::fmt;

use crate::catalog::{Catalog, Features};
use crate::error::{ProductsError, Result};

/// Firmware version components used by upgrade gates.
///
/// Built from a StateHostFirmware response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirmwareVersion {
    pub major: u16,
    pub minor: u16,
}

/// A fully-resolved capability set.
///
/// Unlike [`Features`], nothing here is optional except the color
/// temperature range, which some products simply don't publish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub hev: bool,
    pub color: bool,
    pub matrix: bool,
    pub multizone: bool,
    pub extended_multizone: bool,
    pub temperature_range: Option<[u16; 2]>,
}

impl Capabilities {
    /// Merge one layer: fields the layer names overwrite, the rest keep
    /// their current value.
    fn apply(&mut self, layer: &Features) {
        if let Some(v) = layer.hev {
            self.hev = v;
        }
        if let Some(v) = layer.color {
            self.color = v;
        }
        if let Some(v) = layer.matrix {
            self.matrix = v;
        }
        if let Some(v) = layer.multizone {
            self.multizone = v;
        }
        if let Some(v) = layer.extended_multizone {
            self.extended_multizone = v;
        }
        if let Some(range) = layer.temperature_range {
            self.temperature_range = Some(range);
        }
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        for (set, name) in [
            (self.hev, "hev"),
            (self.color, "color"),
            (self.matrix, "matrix"),
            (self.multizone, "multizone"),
            (self.extended_multizone, "extended_multizone"),
        ] {
            if set {
                parts.push(name.to_string());
            }
        }
        if let Some([min, max]) = self.temperature_range {
            parts.push(format!("temperature_range=[{min},{max}]"));
        }
        write!(f, "{{{}}}", parts.join(","))
    }
}

/// A product with its capabilities resolved for one firmware version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProduct {
    pub pid: u32,
    pub name: String,
    pub capabilities: Capabilities,
}

impl Catalog {
    /// Determine a product and its derived capabilities.
    ///
    /// `vendor_id` and `product_id` come from GetVersion;
    /// `firmware` from GetHostFirmware.
    ///
    /// Layering order: all-false baseline, vendor defaults, product
    /// features, then each upgrade in the catalog's listed order. An
    /// upgrade applies iff `firmware.major >= upgrade.major` and
    /// `firmware.minor >= upgrade.minor`, compared independently rather
    /// than as a version ordering (a 3.10 firmware fails a 2.77 gate).
    /// That is the documented behavior, preserved as-is.
    pub fn resolve(
        &self,
        vendor_id: u32,
        product_id: u32,
        firmware: FirmwareVersion,
    ) -> Result<ResolvedProduct> {
        let vendor = self
            .vendor(vendor_id)
            .ok_or(ProductsError::UnknownVendor(vendor_id))?;
        let product = vendor
            .product(product_id)
            .ok_or_else(|| ProductsError::UnknownProduct {
                vendor: vendor_id,
                vendor_name: vendor.name.clone(),
                product: product_id,
            })?;

        let mut capabilities = Capabilities::default();
        capabilities.apply(&vendor.defaults);
        capabilities.apply(&product.features);
        for upgrade in &product.upgrades {
            if firmware.major >= upgrade.major && firmware.minor >= upgrade.minor {
                capabilities.apply(&upgrade.features);
            }
        }

        Ok(ResolvedProduct {
            pid: product.pid,
            name: product.name.clone(),
            capabilities,
        })
    }
}
