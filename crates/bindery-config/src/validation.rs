use std::path::Path;

use crate::diagnostics::{ConfigValidationError, ConfigWarning, ValidationDiagnostics};
use crate::{BinderyConfig, LoggingConfig};

/// Context for semantic config validation.
///
/// Relative paths in the config are resolved against `root`, falling back to the directory that
/// contains the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigValidationContext<'a> {
    pub root: Option<&'a Path>,
    pub config_dir: Option<&'a Path>,
}

impl<'a> ConfigValidationContext<'a> {
    fn base_dir(self) -> Option<&'a Path> {
        self.root.or(self.config_dir)
    }
}

impl BinderyConfig {
    /// Validate semantic invariants, reporting as many problems as possible in one pass.
    #[must_use]
    pub fn validate(&self) -> ValidationDiagnostics {
        self.validate_with_context(ConfigValidationContext::default())
    }

    #[must_use]
    pub fn validate_with_context(&self, ctx: ConfigValidationContext<'_>) -> ValidationDiagnostics {
        let mut out = ValidationDiagnostics::default();

        validate_logging(self, ctx, &mut out);
        validate_resolution(self, &mut out);

        out
    }
}

fn validate_logging(
    config: &BinderyConfig,
    ctx: ConfigValidationContext<'_>,
    out: &mut ValidationDiagnostics,
) {
    let normalized = LoggingConfig::normalize_level_directives(&config.logging.level);
    if !config.logging.level.trim().is_empty()
        && tracing_subscriber::EnvFilter::try_new(normalized.clone()).is_err()
    {
        out.warnings.push(ConfigWarning::LoggingLevelInvalid {
            value: config.logging.level.clone(),
            normalized,
        });
    }

    let Some(file) = config.logging.file.as_ref() else {
        return;
    };
    let resolved = if file.is_absolute() {
        file.clone()
    } else if let Some(base_dir) = ctx.base_dir() {
        base_dir.join(file)
    } else {
        return;
    };
    let parent_missing = resolved
        .parent()
        .is_some_and(|parent| !parent.as_os_str().is_empty() && !parent.is_dir());
    if parent_missing {
        out.warnings.push(ConfigWarning::LoggingFileDirMissing {
            toml_path: "logging.file".to_string(),
            resolved,
        });
    }
}

fn validate_resolution(config: &BinderyConfig, out: &mut ValidationDiagnostics) {
    if config.resolution.max_type_depth == 0 {
        out.errors
            .push(ConfigValidationError::ResolutionMaxTypeDepthZero);
    }
}
