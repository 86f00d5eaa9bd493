use anyhow::{Context, Result, anyhow};
use libcenote::{
    map::{MapView, TileLayer},
    survey::SurveyConfig,
};
use serde::{Deserialize, Deserializer};
use std::{collections::HashMap, path::Path};
use tracing::debug;

#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ListenConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
}

const DEFAULT_HTTP_PORT: u16 = 80;
const DEFAULT_HOST: &str = "0.0.0.0";
fn default_listen() -> ListenConfig {
    ListenConfig {
        host: DEFAULT_HOST.to_string(),
        port: DEFAULT_HTTP_PORT,
    }
}

// This handles the case where the `listen` block is PRESENT, but a field may be missing.
fn deserialize_listen_with_default_port<'de, D>(deserializer: D) -> Result<ListenConfig, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct PartialListenConfig {
        host: Option<String>,
        port: Option<u16>,
    }

    let partial_config = PartialListenConfig::deserialize(deserializer)?;

    Ok(ListenConfig {
        host: partial_config
            .host
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: partial_config.port.unwrap_or(DEFAULT_HTTP_PORT),
    })
}

#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct EnvConfig {
    #[serde(default = "default_listen")]
    #[serde(deserialize_with = "deserialize_listen_with_default_port")]
    pub(crate) listen: ListenConfig,
    pub(crate) survey: SurveyConfig,
    #[serde(default)]
    pub(crate) map: MapView,
    #[serde(default)]
    pub(crate) tiles: TileLayer,
}

impl EnvConfig {
    /// Loads the environment named `envname` from a yaml file that maps environment names to
    /// configurations
    pub(crate) fn load(path: &Path, envname: &str) -> Result<Self> {
        debug!(?path, envname, "Loading environment configuration");
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read config file '{}'", path.display()))?;
        let mut configs: HashMap<String, EnvConfig> = serde_yaml::from_str(&contents)
            .with_context(|| format!("Unable to parse config file '{}'", path.display()))?;
        let mut env = configs
            .remove(envname)
            .ok_or_else(|| anyhow!("No environment named '{envname}' in '{}'", path.display()))?;
        env.init()?;
        Ok(env)
    }

    pub(crate) fn init(&mut self) -> Result<()> {
        self.survey
            .validate()
            .with_context(|| "Invalid survey configuration")?;
        Ok(())
    }
}
