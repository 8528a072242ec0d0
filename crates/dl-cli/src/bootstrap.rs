use anyhow::Context;
use dl_config::DataLinkConfig;
use figment::Figment;
use figment::providers::Serialized;

use crate::cli::GlobalFlags;

/// Load `.env`, then the layered config, with `--database` on top.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<DataLinkConfig> {
    load_dotenv()?;
    config_from(DataLinkConfig::figment(), flags)
}

fn config_from(figment: Figment, flags: &GlobalFlags) -> anyhow::Result<DataLinkConfig> {
    let figment = match &flags.database {
        Some(url) => figment.merge(Serialized::default("database.url", url)),
        None => figment,
    };
    DataLinkConfig::from_figment(&figment).context("failed to load datalink configuration")
}

fn load_dotenv() -> anyhow::Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded .env");
            Ok(())
        }
        Err(error) if error.not_found() => Ok(()),
        Err(error) => Err(error).context("failed to load .env file"),
    }
}
