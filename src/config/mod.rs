//! Configuration management for laplace
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Embedded defaults (`default-config.toml`)
//! 2. User config `~/.config/laplace/config.{toml,json,yaml,yml}`
//! 3. `laplace.{toml,json,yaml,yml}` in the working directory, or only the
//!    file passed with `--config`
//! 4. `LAPLACE_*` environment variables (`LAPLACE_FILTER__THREADS=8`)
//! 5. Command-line overrides

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::jobs::OutputNaming;

mod smart_load;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaplaceConfig {
    pub filter: FilterConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterConfig {
    /// Row workers per image (0 = one per CPU core)
    pub threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// Directory filtered images are written to
    pub directory: PathBuf,
    /// File name prefix; outputs are `<prefix><k>.ppm`
    pub prefix: String,
    /// Header comment for output images (empty = none)
    #[serde(default)]
    pub comment: String,
}

/// Values given on the command line; unset fields leave lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub threads: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub prefix: Option<String>,
}

impl ConfigOverrides {
    fn into_value(self) -> serde_json::Value {
        let mut filter = serde_json::Map::new();
        let mut output = serde_json::Map::new();
        if let Some(threads) = self.threads {
            filter.insert("threads".into(), threads.into());
        }
        if let Some(dir) = self.output_dir {
            output.insert("directory".into(), dir.to_string_lossy().into_owned().into());
        }
        if let Some(prefix) = self.prefix {
            output.insert("prefix".into(), prefix.into());
        }
        serde_json::json!({ "filter": filter, "output": output })
    }
}

impl LaplaceConfig {
    pub fn load_with(custom_config: Option<&str>, overrides: ConfigOverrides) -> Result<Self> {
        let config: LaplaceConfig = Self::figment(custom_config, overrides)
            .extract()
            .context("Failed to load configuration")?;
        config.validate()?;
        tracing::debug!("loaded configuration: {:?}", config);
        Ok(config)
    }

    fn figment(custom_config: Option<&str>, overrides: ConfigOverrides) -> Figment {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            figment = figment.merge(smart_load::auto(custom_path));
        } else {
            let user = Self::user_config_dir();
            figment = figment
                .merge(Toml::file(user.join("config.toml")))
                .merge(Json::file(user.join("config.json")))
                .merge(Yaml::file(user.join("config.yaml")))
                .merge(Yaml::file(user.join("config.yml")))
                .merge(Toml::file("laplace.toml"))
                .merge(Json::file("laplace.json"))
                .merge(Yaml::file("laplace.yaml"))
                .merge(Yaml::file("laplace.yml"));
        }

        figment
            .merge(Env::prefixed("LAPLACE_").split("__"))
            .merge(Serialized::defaults(overrides.into_value()))
    }

    /// Reject settings that would produce unusable output paths.
    pub fn validate(&self) -> Result<()> {
        let prefix = &self.output.prefix;
        if prefix.is_empty() {
            anyhow::bail!("output.prefix cannot be empty");
        }
        if prefix.contains(['/', '\\']) {
            anyhow::bail!("output.prefix must be a file name, not a path: {prefix:?}");
        }
        if self.output.directory.as_os_str().is_empty() {
            anyhow::bail!("output.directory cannot be empty");
        }
        Ok(())
    }

    pub fn naming(&self) -> OutputNaming {
        OutputNaming {
            directory: self.output.directory.clone(),
            prefix: self.output.prefix.clone(),
        }
    }

    /// Header comment, if one is configured.
    pub fn comment(&self) -> Option<&str> {
        let comment = self.output.comment.trim();
        (!comment.is_empty()).then_some(comment)
    }

    fn user_config_dir() -> PathBuf {
        match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(".config").join("laplace"),
            None => PathBuf::from("~/.config/laplace"),
        }
    }
}
