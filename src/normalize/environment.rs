use crate::normalize::error::NormalizeError;
use crate::types::readings::EnvironmentProfileStats;
use log::debug;
use polars::prelude::*;

const SOURCE_NAME: &str = "environment_profile";

pub const CANOPY_HEIGHT: &str = "canopy_height_m";
pub const CANOPY_OPENNESS: &str = "canopy_openness_percent";
pub const URBAN_FLAG: &str = "urban_flag";

/// Observations at or above this height are sensor noise.
pub const MAX_CANOPY_HEIGHT_M: f64 = 100.0;

/// Aggregates a canopy dataset into [`EnvironmentProfileStats`].
///
/// Rows with `canopy_height_m` outside `[0, 100)` are dropped before any
/// aggregate is taken. `urban_area_pct` is the share of remaining rows
/// flagged urban. Only sums and counts are involved, so the result does
/// not depend on row order. An aggregate whose column holds no value on any
/// remaining row is `None`; the others are still reported.
pub fn summarize_environment(frame: LazyFrame) -> Result<EnvironmentProfileStats, NormalizeError> {
    let height = col(CANOPY_HEIGHT).cast(DataType::Float64);
    let urban = col(URBAN_FLAG).cast(DataType::Float64);
    let rows = len().cast(DataType::Float64);

    let stats = frame
        .filter(
            height
                .clone()
                .gt_eq(lit(0.0))
                .and(height.clone().lt(lit(MAX_CANOPY_HEIGHT_M))),
        )
        .select([
            height.mean().alias("avg_canopy_height_m"),
            col(CANOPY_OPENNESS)
                .cast(DataType::Float64)
                .mean()
                .alias("avg_canopy_openness_pct"),
            (urban.clone().sum() / rows.clone() * lit(100.0)).alias("urban_area_pct"),
            urban.count().cast(DataType::Float64).alias("urban_flag_count"),
            rows.alias("sample_count"),
        ])
        .collect()?;

    let sample_count = get_scalar(&stats, "sample_count").unwrap_or(0.0) as u64;
    if sample_count == 0 {
        return Err(NormalizeError::no_data(SOURCE_NAME));
    }

    // A sum over nothing but nulls is 0, not null.
    let urban_area_pct = match get_scalar(&stats, "urban_flag_count") {
        Some(count) if count > 0.0 => get_scalar(&stats, "urban_area_pct"),
        _ => None,
    };

    let stats = EnvironmentProfileStats {
        avg_canopy_height_m: get_scalar(&stats, "avg_canopy_height_m"),
        avg_canopy_openness_pct: get_scalar(&stats, "avg_canopy_openness_pct"),
        urban_area_pct,
        sample_count,
    };
    if stats.avg_canopy_openness_pct.is_none() || stats.urban_area_pct.is_none() {
        debug!("Canopy dataset has an aggregate without values: {:?}", stats);
    }
    Ok(stats)
}

fn get_scalar(df: &DataFrame, name: &str) -> Option<f64> {
    df.column(name).ok()?.f64().ok()?.get(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(heights: &[f64], openness: &[f64], urban: &[i64]) -> PolarsResult<LazyFrame> {
        Ok(df!(
            CANOPY_HEIGHT => heights,
            CANOPY_OPENNESS => openness,
            URBAN_FLAG => urban,
        )?
        .lazy())
    }

    #[test]
    fn test_filters_invalid_heights() -> Result<(), Box<dyn std::error::Error>> {
        let stats = summarize_environment(frame(
            &[-1.0, 10.0, 20.0, 100.0, 250.0, 0.0],
            &[99.0, 40.0, 60.0, 99.0, 99.0, 20.0],
            &[1, 1, 0, 1, 1, 0],
        )?)?;

        assert_eq!(stats.sample_count, 3);
        assert_eq!(stats.avg_canopy_height_m, Some(10.0));
        assert_eq!(stats.avg_canopy_openness_pct, Some(40.0));
        assert!(stats.urban_area_pct.is_some_and(|pct| (pct - 100.0 / 3.0).abs() < 1e-9));
        Ok(())
    }

    #[test]
    fn test_row_order_does_not_matter() -> Result<(), Box<dyn std::error::Error>> {
        let heights = [12.5, 3.25, 99.5, 150.0, 0.5, -4.0, 40.0];
        let openness = [10.0, 80.0, 5.5, 1.0, 95.0, 50.0, 30.25];
        let urban = [0, 1, 0, 1, 1, 1, 0];

        let forward = summarize_environment(frame(&heights, &openness, &urban)?)?;

        let mut rev_h = heights;
        let mut rev_o = openness;
        let mut rev_u = urban;
        rev_h.reverse();
        rev_o.reverse();
        rev_u.reverse();
        let backward = summarize_environment(frame(&rev_h, &rev_o, &rev_u)?)?;

        assert_eq!(forward, backward);
        assert_eq!(forward.sample_count, 5);
        Ok(())
    }

    #[test]
    fn test_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
        let lf = frame(&[5.0, 15.0], &[50.0, 70.0], &[0, 1])?;
        let first = summarize_environment(lf.clone())?;
        let second = summarize_environment(lf)?;
        assert_eq!(first, second);
        assert_eq!(first.urban_area_pct, Some(50.0));
        Ok(())
    }

    #[test]
    fn test_no_valid_rows_is_no_data() -> Result<(), Box<dyn std::error::Error>> {
        let result = summarize_environment(frame(&[-1.0, 120.0], &[1.0, 2.0], &[0, 0])?);
        assert!(matches!(result, Err(NormalizeError::NoData { .. })));
        Ok(())
    }

    #[test]
    fn test_empty_openness_keeps_other_aggregates() -> Result<(), Box<dyn std::error::Error>> {
        let lf = df!(
            CANOPY_HEIGHT => &[10.0, 20.0],
            CANOPY_OPENNESS => &[None::<f64>, None],
            URBAN_FLAG => &[1i64, 0],
        )?
        .lazy();
        let stats = summarize_environment(lf)?;

        assert_eq!(stats.sample_count, 2);
        assert_eq!(stats.avg_canopy_height_m, Some(15.0));
        assert_eq!(stats.avg_canopy_openness_pct, None);
        assert_eq!(stats.urban_area_pct, Some(50.0));
        Ok(())
    }

    #[test]
    fn test_empty_urban_flags_are_unknown_not_zero() -> Result<(), Box<dyn std::error::Error>> {
        let lf = df!(
            CANOPY_HEIGHT => &[10.0, 20.0],
            CANOPY_OPENNESS => &[30.0, 50.0],
            URBAN_FLAG => &[None::<i64>, None],
        )?
        .lazy();
        let stats = summarize_environment(lf)?;

        assert_eq!(stats.avg_canopy_openness_pct, Some(40.0));
        assert_eq!(stats.urban_area_pct, None);
        Ok(())
    }

    #[test]
    fn test_missing_column_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let lf = df!(CANOPY_HEIGHT => &[1.0, 2.0], URBAN_FLAG => &[0i64, 1])?.lazy();
        assert!(summarize_environment(lf).is_err());
        Ok(())
    }
}
