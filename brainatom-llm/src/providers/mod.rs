//! Provider-specific clients and model catalogs (feature-gated)

#[cfg(feature = "together")]
pub mod together;
