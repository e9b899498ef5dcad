use core_config::{AppInfo, FromEnv, app_info, env_required, server::ServerConfig};
use domain_pricing::PricingConfig;
use std::path::PathBuf;

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub pricing: PricingConfig,
    /// JSON catalog snapshot (`PRICING_CATALOG_PATH`, required)
    pub catalog_path: PathBuf,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let pricing = PricingConfig::from_env()?;
        let catalog_path = PathBuf::from(env_required("PRICING_CATALOG_PATH")?);

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            pricing,
            catalog_path,
        })
    }
}
