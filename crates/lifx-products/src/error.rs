//! Catalog error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProductsError>;

#[derive(Error, Debug)]
pub enum ProductsError {
    #[error("unknown vendor ID {0}")]
    UnknownVendor(u32),

    #[error("unknown product ID {product} for vendor {vendor} ({vendor_name})")]
    UnknownProduct {
        vendor: u32,
        vendor_name: String,
        product: u32,
    },

    #[error("invalid catalog document: {0}")]
    Parse(#[from] serde_json::Error),
}
