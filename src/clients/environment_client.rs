use crate::clients::error::ProviderError;
use crate::clients::DataSource;
use crate::config::ProviderConfig;
use crate::normalize::environment::summarize_environment;
use crate::types::city_profile::CityProfile;
use crate::types::readings::EnvironmentProfileStats;
use crate::utils::resolve_dataset_path;
use async_trait::async_trait;
use log::info;
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Summarizes a city's precomputed canopy dataset from local CSV files.
pub struct EnvironmentClient {
    data_dir: PathBuf,
}

impl EnvironmentClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
        }
    }

    /// Reads and aggregates the dataset at `path`.
    ///
    /// Parsing and aggregation run on the blocking pool.
    pub async fn summarize_file(&self, path: &Path) -> Result<EnvironmentProfileStats, ProviderError> {
        if tokio::fs::metadata(path).await.is_err() {
            return Err(ProviderError::DatasetMissing(path.to_path_buf()));
        }
        info!("Summarizing environment dataset {}", path.display());

        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || -> Result<EnvironmentProfileStats, ProviderError> {
            let df = CsvReadOptions::default()
                .with_has_header(true)
                .try_into_reader_with_file_path(Some(path.clone()))
                .map_err(|e| ProviderError::DatasetRead(path.clone(), e))?
                .finish()
                .map_err(|e| ProviderError::DatasetRead(path.clone(), e))?;
            Ok(summarize_environment(df.lazy())?)
        })
        .await?
    }
}

#[async_trait]
impl DataSource for EnvironmentClient {
    type Output = EnvironmentProfileStats;

    fn name(&self) -> &'static str {
        "environment_profile"
    }

    async fn fetch(&self, city: &CityProfile) -> Result<EnvironmentProfileStats, ProviderError> {
        let path = resolve_dataset_path(&self.data_dir, &city.dataset_reference);
        self.summarize_file(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities::directory::CityDirectory;
    use crate::types::field::UnavailableKind;
    use std::io::Write;

    #[tokio::test]
    async fn test_summarizes_city_dataset() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let mut file = std::fs::File::create(dir.path().join("jeju_atl08_analysis.csv"))?;
        writeln!(file, "lat,lon,canopy_height_m,canopy_openness_percent,urban_flag")?;
        writeln!(file, "33.45,126.55,12.0,40.0,0")?;
        writeln!(file, "33.46,126.56,8.0,60.0,1")?;
        writeln!(file, "33.47,126.57,340.2,10.0,0")?;
        writeln!(file, "33.48,126.58,-3.0,10.0,1")?;
        drop(file);

        let config = ProviderConfig::builder().data_dir(dir.path()).build();
        let city = CityDirectory::builtin().resolve("jeju-si")?.clone();
        let stats = EnvironmentClient::new(&config).fetch(&city).await?;

        assert_eq!(stats.sample_count, 2);
        assert_eq!(stats.avg_canopy_height_m, Some(10.0));
        assert_eq!(stats.avg_canopy_openness_pct, Some(50.0));
        assert_eq!(stats.urban_area_pct, Some(50.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_blank_openness_column_keeps_record() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("seoul_atl08_analysis.csv");
        std::fs::write(
            &path,
            "canopy_height_m,canopy_openness_percent,urban_flag\n10.0,,1\n20.0,,0\n",
        )?;

        let config = ProviderConfig::builder().data_dir(dir.path()).build();
        let city = CityDirectory::builtin().resolve("서울")?.clone();
        let stats = EnvironmentClient::new(&config).fetch(&city).await?;

        assert_eq!(stats.sample_count, 2);
        assert_eq!(stats.avg_canopy_height_m, Some(15.0));
        assert_eq!(stats.avg_canopy_openness_pct, None);
        assert_eq!(stats.urban_area_pct, Some(50.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_dataset_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let config = ProviderConfig::builder().data_dir(dir.path()).build();
        let city = CityDirectory::builtin().resolve("daegu")?.clone();

        let err = EnvironmentClient::new(&config)
            .fetch(&city)
            .await
            .err()
            .ok_or("expected an error")?;
        assert!(matches!(err, ProviderError::DatasetMissing(_)));
        assert_eq!(err.kind(), UnavailableKind::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn test_fully_filtered_dataset_is_no_data() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "canopy_height_m,canopy_openness_percent,urban_flag\n999.0,5.0,0\n")?;

        let config = ProviderConfig::builder().data_dir(dir.path()).build();
        let err = EnvironmentClient::new(&config)
            .summarize_file(&path)
            .await
            .err()
            .ok_or("expected an error")?;
        assert_eq!(err.kind(), UnavailableKind::NoData);
        Ok(())
    }
}
