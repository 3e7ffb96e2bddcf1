use serde::de::DeserializeOwned;

use clap::ArgMatches;
use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};

use crate::error::*;

/// Layered application settings.
///
/// Built-in defaults, then `conf/default`, then either `--config FILE` or
/// `conf/$RUN_MODE`, then `APP_*` environment variables (`APP_DB__URL`).
#[derive(Debug, Clone)]
pub struct AppConfig {
  pub conf: Config
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
  Ok(Config::builder()
    .set_default("debug", false)?
    .set_default("db.url", "postgresql://localhost/blogly")?
    .set_default("db.init_schema", true)?
    .set_default("web.listen", "127.0.0.1:5000")?
    .set_default("web.templates", "templates")?
    .set_default("web.static_dir", "static")?
    .set_default("web.services", vec!["User", "Post", "Tag"])?)
}

impl AppConfig {
  pub fn new_clap(cli: &ArgMatches) -> Result<Self> {
    let config_file = cli.get_one::<String>("config").map(String::as_str);
    Self::load(config_file)
  }

  pub fn load(config_file: Option<&str>) -> Result<Self> {
    let mut builder = defaults()?
      .add_source(File::with_name("conf/default").required(false));

    if let Some(config_file) = config_file {
      builder = builder.add_source(File::with_name(config_file));
    } else {
      // Get RUN_MODE from environment
      let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
      builder = builder.add_source(File::with_name(&format!("conf/{}", env)).required(false));
    }

    // Allow overrides from environment
    builder = builder.add_source(Environment::with_prefix("app")
      .prefix_separator("_")
      .separator("__"));

    Ok(AppConfig {
      conf: builder.build()?,
    })
  }

  /// Defaults plus explicit values, no files or environment.
  pub fn with_overrides(values: &[(&str, &str)]) -> Result<Self> {
    let mut builder = defaults()?;
    for (key, value) in values {
      builder = builder.set_override(*key, *value)?;
    }
    Ok(AppConfig {
      conf: builder.build()?,
    })
  }

  pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
    Ok(self.conf.get(key).map(Some).or_else(|e| {
      match e {
        ConfigError::NotFound(_) => Ok(None),
        err => Err(err),
      }
    })?)
  }

  pub fn get_str(&self, key: &str) -> Result<Option<String>> {
    self.get(key)
  }

  pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
    self.get(key)
  }

  pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
    self.get(key)
  }

  pub fn get_array(&self, key: &str) -> Result<Option<Vec<String>>> {
    self.get(key)
  }

  /// Like `get_str` but the key has to be set.
  pub fn require_str(&self, key: &str) -> Result<String> {
    self.get_str(key)?
      .ok_or_else(|| Error::ConfigError { source: ConfigError::NotFound(key.to_string()) })
  }
}
