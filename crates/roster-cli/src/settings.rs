//! Runtime settings: defaults, then an optional TOML file, then `ROSTER_*`
//! environment variables. Command-line flags are applied on top in `main`.

use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use roster_core::query::ViewMode;
use roster_fetch::{CacheConfig, users::USERS_ENDPOINT};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// Collection endpoint.
  pub url:                     String,
  pub dedup_interval_secs:     u64,
  pub revalidate_on_focus:     bool,
  pub revalidate_on_reconnect: bool,
  /// How often the connectivity probe runs.
  pub probe_interval_secs:     u64,
  /// Initial layout.
  pub view:                    ViewMode,
}

impl Default for Settings {
  fn default() -> Self {
    let cache = CacheConfig::default();
    Self {
      url:                     USERS_ENDPOINT.to_string(),
      dedup_interval_secs:     cache.dedup_interval.as_secs(),
      revalidate_on_focus:     cache.revalidate_on_focus,
      revalidate_on_reconnect: cache.revalidate_on_reconnect,
      probe_interval_secs:     10,
      view:                    ViewMode::default(),
    }
  }
}

impl Settings {
  /// Layer the optional config file and the environment over the defaults.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    Self::layered(path, None)
  }

  /// `env` replaces the process environment when given.
  pub(crate) fn layered(
    path: Option<&Path>,
    env: Option<config::Map<String, String>>,
  ) -> Result<Self> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
      builder = builder.add_source(config::File::from(path).required(true));
    }
    let settings = builder
      .add_source(
        config::Environment::with_prefix("ROSTER")
          .try_parsing(true)
          .source(env),
      )
      .build()
      .context("failed to read configuration")?;

    settings
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  pub fn cache_config(&self) -> CacheConfig {
    CacheConfig {
      dedup_interval:          Duration::from_secs(self.dedup_interval_secs),
      revalidate_on_focus:     self.revalidate_on_focus,
      revalidate_on_reconnect: self.revalidate_on_reconnect,
    }
  }

  pub fn probe_interval(&self) -> Duration {
    Duration::from_secs(self.probe_interval_secs.max(1))
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  #[test]
  fn defaults_match_cache_policy() {
    let settings = Settings::default();
    assert_eq!(settings.url, USERS_ENDPOINT);

    let cache = settings.cache_config();
    assert_eq!(cache.dedup_interval, Duration::from_secs(60));
    assert!(!cache.revalidate_on_focus);
    assert!(cache.revalidate_on_reconnect);
  }

  #[test]
  fn file_overrides_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
      file,
      r#"
url = "http://localhost:3000/users"
dedup_interval_secs = 5
revalidate_on_focus = true
view = "table"
"#
    )
    .unwrap();

    let settings = Settings::load(Some(file.path())).unwrap();
    assert_eq!(settings.url, "http://localhost:3000/users");
    assert_eq!(settings.dedup_interval_secs, 5);
    assert!(settings.revalidate_on_focus);
    assert!(settings.revalidate_on_reconnect, "unset keys keep defaults");
    assert_eq!(settings.view, ViewMode::Table);
  }

  fn env(vars: &[(&str, &str)]) -> Option<config::Map<String, String>> {
    Some(
      vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect(),
    )
  }

  #[test]
  fn environment_overrides_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
      file,
      r#"
url = "http://localhost:3000/users"
dedup_interval_secs = 5
revalidate_on_focus = true
"#
    )
    .unwrap();

    let settings = Settings::layered(
      Some(file.path()),
      env(&[
        ("ROSTER_DEDUP_INTERVAL_SECS", "7"),
        ("ROSTER_REVALIDATE_ON_FOCUS", "false"),
        ("ROSTER_VIEW", "table"),
        ("OTHER_DEDUP_INTERVAL_SECS", "99"),
      ]),
    )
    .unwrap();
    assert_eq!(settings.url, "http://localhost:3000/users");
    assert_eq!(settings.dedup_interval_secs, 7);
    assert!(!settings.revalidate_on_focus);
    assert_eq!(settings.view, ViewMode::Table);
  }

  #[test]
  fn environment_alone_overrides_defaults() {
    let settings = Settings::layered(None, env(&[("ROSTER_PROBE_INTERVAL_SECS", "30")])).unwrap();
    assert_eq!(settings.probe_interval(), Duration::from_secs(30));
    assert_eq!(settings.url, USERS_ENDPOINT);
  }

  #[test]
  fn missing_file_is_an_error() {
    let err = Settings::load(Some(Path::new("/nonexistent/roster.toml")));
    assert!(err.is_err());
  }

  #[test]
  fn probe_interval_is_never_zero() {
    let settings = Settings {
      probe_interval_secs: 0,
      ..Settings::default()
    };
    assert_eq!(settings.probe_interval(), Duration::from_secs(1));
  }
}
