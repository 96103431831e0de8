//! Per-field result type used by the composite record.

use crate::clients::error::ProviderError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a field of the composite record holds no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableKind {
    /// The upstream could not be reached or answered with an error.
    ProviderUnavailable,
    /// The upstream answered, but the queried entity does not exist there.
    NotFound,
    /// The upstream answered with an empty series.
    NoData,
}

impl fmt::Display for UnavailableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UnavailableKind::ProviderUnavailable => "provider unavailable",
            UnavailableKind::NotFound => "not found",
            UnavailableKind::NoData => "no data",
        };
        f.write_str(label)
    }
}

/// One independently degradable field of a [`crate::CompositeInsight`].
///
/// Serialized with a `status` tag so API consumers can branch without
/// inspecting strings:
///
/// ```
/// use city_insight::{Field, UnavailableKind};
///
/// let field: Field<f64> = Field::unavailable(UnavailableKind::NoData, "empty series");
/// let json = serde_json::to_value(&field).unwrap();
/// assert_eq!(json["status"], "unavailable");
/// assert_eq!(json["kind"], "no_data");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Field<T> {
    Available { data: T },
    Unavailable { kind: UnavailableKind, reason: String },
}

impl<T> Field<T> {
    pub fn available(data: T) -> Self {
        Field::Available { data }
    }

    pub fn unavailable(kind: UnavailableKind, reason: impl Into<String>) -> Self {
        Field::Unavailable {
            kind,
            reason: reason.into(),
        }
    }

    /// Converts a provider outcome into a field, keeping the error's message as the reason.
    pub fn from_result(result: Result<T, ProviderError>) -> Self {
        match result {
            Ok(data) => Field::available(data),
            Err(e) => Field::unavailable(e.kind(), e.to_string()),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Field::Available { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Field::Available { data } => Some(data),
            Field::Unavailable { .. } => None,
        }
    }

    pub fn kind(&self) -> Option<UnavailableKind> {
        match self {
            Field::Available { .. } => None,
            Field::Unavailable { kind, .. } => Some(*kind),
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Field::Available { .. } => None,
            Field::Unavailable { reason, .. } => Some(reason),
        }
    }
}
