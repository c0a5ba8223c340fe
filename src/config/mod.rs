//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{path::PathBuf, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use time::{Date, macros::format_description};
use tracing::level_filters::LevelFilter;
use url::Url;

pub use cli::{BuildArgs, CliArgs, Command, FeedArgs, GlobalOverrides, RenderArgs};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "atelier";
const ENV_PREFIX: &str = "ATELIER";
const DEFAULT_SITE_URL: &str = "http://localhost:4321";
const DEFAULT_SITE_TITLE: &str = "Portfolio";
const DEFAULT_SITE_DESCRIPTION: &str = "Work, experiments and thoughts.";
const DEFAULT_SITE_LANGUAGE: &str = "en";
const DEFAULT_SANITY_DATASET: &str = "production";
const DEFAULT_SANITY_API_VERSION: &str = "2024-01-01";
const DEFAULT_SANITY_CDN_BASE: &str = "https://cdn.sanity.io";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_OUTPUT_DIR: &str = "dist";

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub site: PublicSiteSettings,
    pub sanity: SanitySettings,
    pub logging: LoggingSettings,
    pub build: BuildSettings,
}

/// The public site the generated content is published under.
#[derive(Debug, Clone)]
pub struct PublicSiteSettings {
    pub url: Url,
    /// Links containing this are treated as internal.
    pub domain: String,
    pub title: String,
    pub description: String,
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct SanitySettings {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub token: Option<String>,
    /// Query API root, `https://<project>.apicdn.sanity.io/` unless overridden.
    pub api_base: Url,
    /// Asset CDN root for image and file URLs.
    pub cdn_base: Url,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub output_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_global_overrides(&cli.overrides);
    if let Command::Build(args) = &cli.command {
        raw.apply_build_overrides(args);
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    site: RawSiteSettings,
    sanity: RawSanitySettings,
    logging: RawLoggingSettings,
    build: RawBuildSettings,
}

impl RawSettings {
    fn apply_global_overrides(&mut self, overrides: &GlobalOverrides) {
        if let Some(url) = overrides.site_url.as_ref() {
            self.site.url = Some(url.clone());
        }
        if let Some(project_id) = overrides.sanity_project_id.as_ref() {
            self.sanity.project_id = Some(project_id.clone());
        }
        if let Some(dataset) = overrides.sanity_dataset.as_ref() {
            self.sanity.dataset = Some(dataset.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }

    fn apply_build_overrides(&mut self, args: &BuildArgs) {
        if let Some(output) = args.output.as_ref() {
            self.build.output_dir = Some(output.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            site,
            sanity,
            logging,
            build,
        } = raw;

        Ok(Self {
            site: build_site_settings(site)?,
            sanity: build_sanity_settings(sanity)?,
            logging: build_logging_settings(logging)?,
            build: build_build_settings(build)?,
        })
    }
}

fn build_site_settings(site: RawSiteSettings) -> Result<PublicSiteSettings, LoadError> {
    let raw_url = non_empty(site.url).unwrap_or_else(|| DEFAULT_SITE_URL.to_string());
    let url = Url::parse(&raw_url)
        .map_err(|err| LoadError::invalid("site.url", format!("failed to parse: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(LoadError::invalid("site.url", "scheme must be http or https"));
    }

    let domain = match non_empty(site.domain) {
        Some(domain) => domain,
        None => url
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| LoadError::invalid("site.url", "url must have a host"))?,
    };

    Ok(PublicSiteSettings {
        url,
        domain,
        title: non_empty(site.title).unwrap_or_else(|| DEFAULT_SITE_TITLE.to_string()),
        description: non_empty(site.description)
            .unwrap_or_else(|| DEFAULT_SITE_DESCRIPTION.to_string()),
        language: non_empty(site.language).unwrap_or_else(|| DEFAULT_SITE_LANGUAGE.to_string()),
    })
}

fn build_sanity_settings(sanity: RawSanitySettings) -> Result<SanitySettings, LoadError> {
    let project_id = non_empty(sanity.project_id)
        .ok_or_else(|| LoadError::invalid("sanity.project_id", "project id is required"))?;
    if !is_identifier(&project_id) {
        return Err(LoadError::invalid(
            "sanity.project_id",
            "may only contain lowercase letters, digits and dashes",
        ));
    }

    let dataset =
        non_empty(sanity.dataset).unwrap_or_else(|| DEFAULT_SANITY_DATASET.to_string());
    if !dataset
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(LoadError::invalid(
            "sanity.dataset",
            "may only contain lowercase letters, digits, dashes and underscores",
        ));
    }

    let api_version =
        non_empty(sanity.api_version).unwrap_or_else(|| DEFAULT_SANITY_API_VERSION.to_string());
    Date::parse(&api_version, format_description!("[year]-[month]-[day]")).map_err(|err| {
        LoadError::invalid("sanity.api_version", format!("expected YYYY-MM-DD: {err}"))
    })?;

    let use_cdn = sanity.use_cdn.unwrap_or(true);
    let api_base = match non_empty(sanity.api_host) {
        Some(host) => parse_base_url(&host, "sanity.api_host")?,
        None => {
            let subdomain = if use_cdn { "apicdn" } else { "api" };
            parse_base_url(
                &format!("https://{project_id}.{subdomain}.sanity.io"),
                "sanity.project_id",
            )?
        }
    };
    let cdn_base = parse_base_url(
        &non_empty(sanity.cdn_base).unwrap_or_else(|| DEFAULT_SANITY_CDN_BASE.to_string()),
        "sanity.cdn_base",
    )?;

    let timeout_secs = sanity
        .request_timeout_seconds
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "sanity.request_timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(SanitySettings {
        project_id,
        dataset,
        api_version,
        use_cdn,
        token: non_empty(sanity.token),
        api_base,
        cdn_base,
        request_timeout: Duration::from_secs(timeout_secs),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_build_settings(build: RawBuildSettings) -> Result<BuildSettings, LoadError> {
    let output_dir = build
        .output_dir
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    if output_dir.as_os_str().is_empty() {
        return Err(LoadError::invalid(
            "build.output_dir",
            "path must not be empty",
        ));
    }
    Ok(BuildSettings { output_dir })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    url: Option<String>,
    domain: Option<String>,
    title: Option<String>,
    description: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSanitySettings {
    project_id: Option<String>,
    dataset: Option<String>,
    api_version: Option<String>,
    use_cdn: Option<bool>,
    token: Option<String>,
    api_host: Option<String>,
    cdn_base: Option<String>,
    request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawBuildSettings {
    output_dir: Option<PathBuf>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn is_identifier(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Parse a base URL so that relative joins append rather than replace the
/// last path segment.
fn parse_base_url(value: &str, key: &'static str) -> Result<Url, LoadError> {
    let mut url =
        Url::parse(value).map_err(|err| LoadError::invalid(key, format!("failed to parse: {err}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests;
