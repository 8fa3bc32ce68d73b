use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once, OnceLock, PoisonError};

use thiserror::Error;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;

mod diagnostics;
mod schema;
mod validation;

pub use diagnostics::{
    ConfigDiagnostics, ConfigValidationError, ConfigWarning, ValidationDiagnostics,
};
pub use schema::json_schema;
pub use validation::ConfigValidationContext;

/// Root of `bindery.toml`.
///
/// ```toml
/// [logging]
/// level = "info"
/// json = false
///
/// [resolution]
/// ambiguity = "fail"
/// max_type_depth = 64
/// box_primitives = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct BinderyConfig {
    /// Global logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Behaviour of the resolution engine.
    #[serde(default)]
    pub resolution: ResolutionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level, either a simple level (`info`, `debug`, ...) or an `EnvFilter` directive
    /// string such as `bindery.registry=trace,info`.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Write logs to stderr.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Append logs to the given file path.
    ///
    /// If the file cannot be opened, file logging is disabled while stderr stays active.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            // Anything else is treated as an `EnvFilter` directive string.
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// The effective `EnvFilter`: `level` merged with `RUST_LOG` when it is set.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
            file: None,
        }
    }
}

/// What `resolve` does when several candidates survive reduction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AmbiguityMode {
    /// Report an ambiguous-resolution error.
    #[default]
    Fail,
    /// Resolve to "no candidate".
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct ResolutionConfig {
    #[serde(default)]
    pub ambiguity: AmbiguityMode,

    /// Maximum descriptor nesting the assignability engine will descend into.
    #[serde(default = "ResolutionConfig::default_max_type_depth")]
    #[schemars(range(min = 1))]
    pub max_type_depth: usize,

    /// Box primitive required types when building selection criteria.
    #[serde(default = "ResolutionConfig::default_box_primitives")]
    pub box_primitives: bool,
}

impl ResolutionConfig {
    pub const DEFAULT_MAX_TYPE_DEPTH: usize = 64;

    fn default_max_type_depth() -> usize {
        Self::DEFAULT_MAX_TYPE_DEPTH
    }

    fn default_box_primitives() -> bool {
        true
    }

    /// `max_type_depth` with the invalid value `0` replaced by the default.
    pub fn effective_max_type_depth(&self) -> usize {
        if self.max_type_depth == 0 {
            tracing::warn!(
                target: "bindery.config",
                "ignoring resolution.max_type_depth = 0 (must be >= 1)"
            );
            return Self::DEFAULT_MAX_TYPE_DEPTH;
        }
        self.max_type_depth
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            ambiguity: AmbiguityMode::default(),
            max_type_depth: Self::default_max_type_depth(),
            box_primitives: Self::default_box_primitives(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

/// Redact user-provided values from a TOML/serde error message.
///
/// Messages like `invalid type: string "secret", expected a boolean` echo the offending scalar;
/// quoted segments and backticked unknown keys/variants are replaced with `<redacted>`.
fn sanitize_toml_error_message(message: &str) -> String {
    static QUOTED_STRING_RE: OnceLock<Option<regex::Regex>> = OnceLock::new();
    static SINGLE_QUOTED_STRING_RE: OnceLock<Option<regex::Regex>> = OnceLock::new();

    // Escaped quotes (`\"`) may appear inside the quoted segment.
    let double = QUOTED_STRING_RE.get_or_init(|| regex::Regex::new(r#""(?:\\.|[^"\\])*""#).ok());
    let single =
        SINGLE_QUOTED_STRING_RE.get_or_init(|| regex::Regex::new(r#"'(?:\\.|[^'\\])*'"#).ok());
    let (Some(double), Some(single)) = (double, single) else {
        return "<redacted>".to_owned();
    };

    let out = double.replace_all(message, r#""<redacted>""#);
    let mut out = single.replace_all(&out, "'<redacted>'").into_owned();

    // `missing field `foo`` names a schema field and is kept; the backticked part of
    // `unknown field`/`unknown variant` and `invalid type/value` comes from the input.
    let mut start = ["unknown field `", "unknown variant `"]
        .iter()
        .filter_map(|pattern| out.find(pattern).map(|pos| pos + pattern.len() - 1))
        .min();
    if start.is_none() && (out.contains("invalid type:") || out.contains("invalid value:")) {
        let boundary = out.find(", expected").unwrap_or(out.len());
        start = out[..boundary].find('`');
    }
    if let Some(start) = start {
        let after_start = &out[start + 1..];
        let end_rel = after_start
            .rfind("`, expected")
            .or_else(|| after_start.rfind('`'));
        if let Some(end_rel) = end_rel {
            out.replace_range(start + 1..start + 1 + end_rel, "<redacted>");
        }
    }

    out
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // `Display` for `toml::de::Error` includes a snippet of the input; keep only the message.
        ConfigError::Toml(sanitize_toml_error_message(err.message()))
    }
}

impl BinderyConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = read_config(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Load a config file from TOML and return diagnostics (unknown keys and semantic validation
    /// failures).
    pub fn load_from_path_with_diagnostics(
        path: impl AsRef<Path>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let path = path.as_ref();
        let text = read_config(path)?;
        let ctx = ConfigValidationContext {
            root: None,
            config_dir: path.parent(),
        };
        Self::load_from_str_with_diagnostics_inner(&text, ctx)
    }

    /// Load a config from a TOML string and return diagnostics.
    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        Self::load_from_str_with_diagnostics_inner(text, ConfigValidationContext::default())
    }

    fn load_from_str_with_diagnostics_inner(
        text: &str,
        ctx: ConfigValidationContext<'_>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<BinderyConfig>(text)?;

        let mut diagnostics = ConfigDiagnostics {
            unknown_keys,
            ..ConfigDiagnostics::default()
        };
        diagnostics.extend_validation(config.validate_with_context(ctx));

        if !diagnostics.is_empty() {
            tracing::debug!(
                target: "bindery.config",
                unknown_keys = diagnostics.unknown_keys.len(),
                warnings = diagnostics.warnings.len(),
                errors = diagnostics.errors.len(),
                "config loaded with diagnostics"
            );
        }

        Ok((config, diagnostics))
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Discover the configuration file below `root`.
///
/// Search order: `bindery.toml`, then `.bindery.toml`.
pub fn discover_config_path(root: &Path) -> Option<PathBuf> {
    ["bindery.toml", ".bindery.toml"]
        .into_iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

/// Load the configuration for `root`.
///
/// If no config is present, returns [`BinderyConfig::default`] and `None`.
pub fn load_for_root(root: &Path) -> Result<(BinderyConfig, Option<PathBuf>), ConfigError> {
    let Some(path) = discover_config_path(root) else {
        return Ok((BinderyConfig::default(), None));
    };

    let config = BinderyConfig::load_from_path(&path)?;
    Ok((config, Some(path)))
}

/// Like [`load_for_root`] but also returns diagnostics.
pub fn load_for_root_with_diagnostics(
    root: &Path,
) -> Result<(BinderyConfig, Option<PathBuf>, ConfigDiagnostics), ConfigError> {
    let Some(path) = discover_config_path(root) else {
        return Ok((BinderyConfig::default(), None, ConfigDiagnostics::default()));
    };

    let text = read_config(&path)?;
    let ctx = ConfigValidationContext {
        root: Some(root),
        config_dir: path.parent(),
    };
    let (config, diagnostics) = BinderyConfig::load_from_str_with_diagnostics_inner(&text, ctx)?;
    Ok((config, Some(path), diagnostics))
}

struct MutexFileMakeWriter {
    file: Arc<Mutex<std::fs::File>>,
}

impl<'a> MakeWriter<'a> for MutexFileMakeWriter {
    type Writer = MutexFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        MutexFileWriter {
            guard: self.file.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }
}

struct MutexFileWriter<'a> {
    guard: std::sync::MutexGuard<'a, std::fs::File>,
}

impl Write for MutexFileWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.guard.flush()
    }
}

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber described by `config`.
///
/// Only the first call has an effect; later calls (and calls made after another global subscriber
/// was installed) are no-ops.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let file = config
            .file
            .as_ref()
            .and_then(|path| {
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .ok()
            })
            .map(|file| Arc::new(Mutex::new(file)));
        let file_open_failed = config.file.is_some() && file.is_none();

        let mut make_writer = BoxMakeWriter::new(io::sink);
        if config.stderr {
            // `cargo test` output capture only works for the stdlib's `print!/eprint!` macros.
            if cfg!(debug_assertions) {
                make_writer = BoxMakeWriter::new(
                    make_writer.and(tracing_subscriber::fmt::writer::TestWriter::with_stderr),
                );
            } else {
                make_writer = BoxMakeWriter::new(make_writer.and(io::stderr));
            }
        }
        if let Some(file) = file {
            make_writer = BoxMakeWriter::new(make_writer.and(MutexFileMakeWriter { file }));
        }

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_ok() && file_open_failed {
            if let Some(path) = config.file.as_ref() {
                tracing::warn!(
                    target: "bindery.config",
                    path = %path.display(),
                    "failed to open log file; file logging disabled"
                );
            }
        }
    });
}
