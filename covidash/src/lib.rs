use anyhow::Result;
use log::debug;

use crate::census::DailyCensus;
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::dataset::Datasets;

// Re-exports
pub use column_names as COL;

// Modules
pub mod census;
pub mod charts;
pub mod column_names;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod figure;
pub mod server;

/// Type holding the loaded datasets and the covidash configuration
pub struct Covidash {
    pub datasets: Datasets,
    pub config: Config,
}

impl Covidash {
    /// Setup the Covidash object with default configuration
    pub async fn new() -> Result<Self> {
        Self::new_with_config(Config::default()).await
    }

    /// Setup the Covidash object with custom configuration. This is the only
    /// startup routine: both datasets are read here and never re-read, so a
    /// restart is required to pick up new source files.
    pub async fn new_with_config(config: Config) -> Result<Self> {
        debug!("config: {config:?}");
        let datasets = Datasets::load(&config).await?;
        Ok(Self { datasets, config })
    }

    /// Reduces the raw hospitalisation rows to one row per day
    pub fn census(&self) -> Vec<DailyCensus> {
        census::daily_census(&self.datasets.hospitalisations)
    }

    /// Composes the dashboard page from the loaded datasets
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::assemble(&self.census(), &self.datasets.centres)
    }

    /// Serves the composed dashboard page; blocks for the process lifetime
    pub async fn serve(&self) -> Result<()> {
        server::serve(&self.dashboard(), &self.config.listen_addr).await
    }
}
