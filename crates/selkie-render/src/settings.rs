//! Registration options and the settings derived from them.

use crate::{Error, Result};
use selkie_core::ChartConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use url::Url;

pub const DEFAULT_CHART_LIBRARY_URL: &str =
    "https://cdn.jsdelivr.net/npm/echarts/dist/echarts.min.js";

/// Caller-supplied overrides, as passed at registration.
///
/// Deserializes from the camelCase option mapping (`echarts` / `chartLibraryUrl`,
/// `throwOnError`, `verbose`, `defaults`); unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    #[serde(alias = "chartLibraryUrl", skip_serializing_if = "Option::is_none")]
    pub echarts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throw_on_error: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<ChartConfig>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chart_library_url(mut self, url: impl Into<String>) -> Self {
        self.echarts = Some(url.into());
        self
    }

    pub fn with_throw_on_error(mut self, throw_on_error: bool) -> Self {
        self.throw_on_error = Some(throw_on_error);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn with_defaults(mut self, defaults: ChartConfig) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Reads options from a file; `.yaml` / `.yml` are parsed as YAML, anything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        if is_yaml {
            Self::from_yaml_str(&text)
        } else {
            Self::from_json_str(&text)
        }
    }
}

/// Effective configuration, fixed at registration time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub chart_library_url: String,
    pub throw_on_failure: bool,
    pub verbose: bool,
    pub defaults: ChartConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chart_library_url: DEFAULT_CHART_LIBRARY_URL.to_string(),
            throw_on_failure: false,
            verbose: false,
            defaults: ChartConfig::empty_object(),
        }
    }
}

impl Settings {
    /// Applies `options` over the built-in settings and validates the result.
    pub fn from_options(options: Options) -> Result<Self> {
        let mut settings = Self::default();
        if let Some(url) = options.echarts {
            settings.chart_library_url = url.trim().to_string();
        }
        if let Some(throw_on_error) = options.throw_on_error {
            settings.throw_on_failure = throw_on_error;
        }
        if let Some(verbose) = options.verbose {
            settings.verbose = verbose;
        }
        if let Some(defaults) = options.defaults {
            settings.defaults = defaults;
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        validate_library_url(&self.chart_library_url)?;
        if !self.defaults.is_object() {
            return Err(Error::InvalidDefaults {
                message: format!("expected a mapping, got {}", self.defaults.as_value()),
            });
        }
        if let Some(dark) = self.defaults.get(selkie_core::config::DARK_MODE_KEY) {
            if !dark.is_object() {
                return Err(Error::InvalidDefaults {
                    message: format!("`darkMode` must be a mapping, got {dark}"),
                });
            }
        }
        if let Some(series) = self.defaults.get(selkie_core::config::SERIES_KEY) {
            if !series.is_object() {
                return Err(Error::InvalidDefaults {
                    message: format!("`series` must be a mapping of per-series defaults, got {series}"),
                });
            }
        }
        Ok(())
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Accepts relative references and absolute `http(s)` URLs.
fn validate_library_url(raw: &str) -> Result<()> {
    let invalid = |message: String| Error::InvalidLibraryUrl {
        url: raw.to_string(),
        message,
    };
    if raw.is_empty() {
        return Err(invalid("empty URL".to_string()));
    }
    match Url::parse(raw) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(invalid(format!("unsupported scheme `{other}`"))),
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(()),
        Err(err) => Err(invalid(err.to_string())),
    }
}
