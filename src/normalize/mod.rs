//! Pure mappings from provider-native payloads to the canonical records.

pub mod air_quality;
pub mod environment;
pub mod error;
pub(crate) mod json;
pub mod indicator;
pub mod vegetation;
pub mod weather;
