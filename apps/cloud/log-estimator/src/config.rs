//! Configuration for the log estimator

use std::path::PathBuf;

use core_config::{
    env_bool_or, env_optional, env_or_default, env_parse_or, ConfigError, Environment, FromEnv,
};
use domain_log_pricing::{BillingCadence, Region};

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    /// Directory holding one `pricing-{site}.json` snapshot per region
    pub data_dir: PathBuf,
    pub region: Region,
    /// Price column used for unit prices
    pub cadence: BillingCadence,
    /// Where committed quotes are written; stdout when unset
    pub quote_output: Option<PathBuf>,
    pub pretty_json: bool,
}

fn default_data_dir() -> String {
    "data/pricing".to_string()
}

impl FromEnv for Config {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            environment: Environment::from_env(),
            data_dir: PathBuf::from(env_or_default("PRICING_DATA_DIR", &default_data_dir())),
            region: env_parse_or("PRICING_REGION", Region::default())?,
            cadence: env_parse_or("PRICING_CADENCE", BillingCadence::default())?,
            quote_output: env_optional("QUOTE_OUTPUT").map(PathBuf::from),
            pretty_json: env_bool_or("QUOTE_PRETTY", true)?,
        })
    }
}

impl Config {
    /// Path of the catalog snapshot for the configured region
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(self.region.catalog_file_name())
    }
}
