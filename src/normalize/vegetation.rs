use crate::normalize::error::NormalizeError;
use crate::normalize::json::{get_opt_f64, get_opt_i64};
use crate::types::readings::VegetationIndexSummary;
use chrono::{DateTime, NaiveDate};
use log::{debug, warn};
use serde_json::Value;

const SOURCE_NAME: &str = "vegetation";

/// Band name the reduction dictionary is keyed by.
pub const NDVI_BAND: &str = "NDVI";

/// Maps a region reduction result onto a [`VegetationIndexSummary`].
///
/// * `reduction` - the dictionary returned by the mean reducer, e.g. `{"NDVI": 0.4821}`,
///   already scaled to `[-1, 1]`. `null` or a missing band means no cloud-free
///   pixels covered the region.
/// * `time_start` - acquisition time of the composite in epoch milliseconds.
pub fn normalize_vegetation(
    region_label: &str,
    reduction: &Value,
    time_start: &Value,
) -> Result<VegetationIndexSummary, NormalizeError> {
    if !(reduction.is_object() || reduction.is_null()) {
        return Err(NormalizeError::malformed(
            SOURCE_NAME,
            format!("expected a band dictionary, got {reduction}"),
        ));
    }

    let mean_ndvi = get_opt_f64(reduction, &format!("/{NDVI_BAND}")).and_then(|ndvi| {
        if (-1.0..=1.0).contains(&ndvi) {
            Some(ndvi)
        } else {
            warn!("Discarding NDVI {} for {} outside [-1, 1]", ndvi, region_label);
            None
        }
    });
    if mean_ndvi.is_none() {
        debug!("No NDVI mean for {} in the latest composite", region_label);
    }

    let as_of_date = get_opt_i64(time_start, "")
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.date_naive());

    Ok(VegetationIndexSummary {
        mean_ndvi,
        as_of_date,
        region_label: region_label.to_string(),
    })
}

/// Formats a date the way the catalog's date filters expect it.
pub fn catalog_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
