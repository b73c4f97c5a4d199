//! Mapping from configured rule names to validated ruler factories.

use crate::{
    AllowHardTabsRuler, AllowTrailingLineSpacesRuler, IndentationSpacesRuler, MaxLineLengthRuler,
    SpacesAfterCommaRuler, SpacesBeforeLBraceRuler, TrailingNewlinesRuler,
};
use linewise_core::{
    Config, ConfigError, FileSet, FileSetConfig, RuleSetting, RulerBox, RulerSpec, Severity,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Static description of a built-in ruler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulerInfo {
    /// Rule code (e.g., "LW001").
    pub code: &'static str,
    /// Rule name as used in the `style` table.
    pub name: &'static str,
    /// What the ruler checks.
    pub description: &'static str,
    /// Default option value, as written in TOML.
    pub default_value: &'static str,
    /// Default severity.
    pub default_severity: Severity,
}

/// Every built-in ruler, in the order they run.
pub const RULERS: &[RulerInfo] = &[
    RulerInfo {
        code: crate::indentation_spaces::CODE,
        name: crate::indentation_spaces::NAME,
        description: "Lines are indented by the expected number of spaces",
        default_value: "2",
        default_severity: Severity::Error,
    },
    RulerInfo {
        code: crate::spaces_before_lbrace::CODE,
        name: crate::spaces_before_lbrace::NAME,
        description: "Spaces before an opening brace",
        default_value: "1",
        default_severity: Severity::Error,
    },
    RulerInfo {
        code: crate::max_line_length::CODE,
        name: crate::max_line_length::NAME,
        description: "Maximum characters per line",
        default_value: "80",
        default_severity: Severity::Error,
    },
    RulerInfo {
        code: crate::trailing_newlines::CODE,
        name: crate::trailing_newlines::NAME,
        description: "Newlines at the end of a file",
        default_value: "1",
        default_severity: Severity::Error,
    },
    RulerInfo {
        code: crate::allow_hard_tabs::CODE,
        name: crate::allow_hard_tabs::NAME,
        description: "Whether whitespace may contain hard tabs",
        default_value: "false",
        default_severity: Severity::Error,
    },
    RulerInfo {
        code: crate::allow_trailing_line_spaces::CODE,
        name: crate::allow_trailing_line_spaces::NAME,
        description: "Whether lines may end with whitespace",
        default_value: "false",
        default_severity: Severity::Error,
    },
    RulerInfo {
        code: crate::spaces_after_comma::CODE,
        name: crate::spaces_after_comma::NAME,
        description: "Spaces after a comma",
        default_value: "1",
        default_severity: Severity::Error,
    },
];

/// Looks up a built-in ruler by name.
#[must_use]
pub fn ruler_info(name: &str) -> Option<&'static RulerInfo> {
    RULERS.iter().find(|info| info.name == name)
}

/// The default style: every ruler on with its default value.
#[must_use]
pub fn default_style() -> BTreeMap<String, RuleSetting> {
    let mut style = BTreeMap::new();
    style.insert(crate::indentation_spaces::NAME.to_string(), RuleSetting::from(2));
    style.insert(crate::spaces_before_lbrace::NAME.to_string(), RuleSetting::from(1));
    style.insert(crate::max_line_length::NAME.to_string(), RuleSetting::from(80));
    style.insert(crate::trailing_newlines::NAME.to_string(), RuleSetting::from(1));
    style.insert(crate::allow_hard_tabs::NAME.to_string(), RuleSetting::from(false));
    style.insert(
        crate::allow_trailing_line_spaces::NAME.to_string(),
        RuleSetting::from(false),
    );
    style.insert(crate::spaces_after_comma::NAME.to_string(), RuleSetting::from(1));
    style
}

/// Validates one rule setting into a ruler factory.
///
/// Returns `Ok(None)` when the rule is switched off.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownRule`] for an unknown name and
/// [`ConfigError::InvalidOption`] for a value of the wrong type.
pub fn build_ruler(name: &str, setting: &RuleSetting) -> Result<Option<RulerSpec>, ConfigError> {
    let info = ruler_info(name).ok_or_else(|| ConfigError::UnknownRule {
        rule: name.to_string(),
    })?;
    if setting.is_off() {
        debug!("Rule {} is off", name);
        return Ok(None);
    }

    let severity = setting.level().unwrap_or(info.default_severity);
    let spec = match info.name {
        crate::indentation_spaces::NAME => {
            let spaces = setting.as_count(name)?;
            if spaces == 0 {
                return Err(ConfigError::InvalidOption {
                    rule: name.to_string(),
                    message: "indent width must be at least 1".to_string(),
                });
            }
            spec(info, move || {
                Box::new(IndentationSpacesRuler::new(spaces).severity(severity))
            })
        }
        crate::spaces_before_lbrace::NAME => {
            let spaces = setting.as_count(name)?;
            spec(info, move || {
                Box::new(SpacesBeforeLBraceRuler::new(spaces).severity(severity))
            })
        }
        crate::max_line_length::NAME => {
            let max = setting.as_count(name)?;
            spec(info, move || Box::new(MaxLineLengthRuler::new(max).severity(severity)))
        }
        crate::trailing_newlines::NAME => {
            let count = setting.as_count(name)?;
            spec(info, move || {
                Box::new(TrailingNewlinesRuler::new(count).severity(severity))
            })
        }
        crate::allow_hard_tabs::NAME => {
            let allow = setting.as_bool(name)?;
            spec(info, move || Box::new(AllowHardTabsRuler::new(allow).severity(severity)))
        }
        crate::allow_trailing_line_spaces::NAME => {
            let allow = setting.as_bool(name)?;
            spec(info, move || {
                Box::new(AllowTrailingLineSpacesRuler::new(allow).severity(severity))
            })
        }
        crate::spaces_after_comma::NAME => {
            let spaces = setting.as_count(name)?;
            spec(info, move || {
                Box::new(SpacesAfterCommaRuler::new(spaces).severity(severity))
            })
        }
        _ => {
            return Err(ConfigError::UnknownRule {
                rule: name.to_string(),
            })
        }
    };

    Ok(Some(spec))
}

fn spec<F>(info: &RulerInfo, build: F) -> RulerSpec
where
    F: Fn() -> RulerBox + Send + Sync + 'static,
{
    RulerSpec::new(info.name, build)
}

/// Builds the active rulers for a style table, in [`RULERS`] order.
///
/// Settings override the default style; rules not mentioned keep their
/// default. `None` selects the default style.
///
/// # Errors
///
/// Returns an error for unknown rules or invalid options.
pub fn build_rulers(
    style: Option<&BTreeMap<String, RuleSetting>>,
) -> Result<Vec<RulerSpec>, ConfigError> {
    let mut merged = default_style();
    if let Some(style) = style {
        for (name, setting) in style {
            if ruler_info(name).is_none() {
                return Err(ConfigError::UnknownRule { rule: name.clone() });
            }
            merged.insert(name.clone(), setting.clone());
        }
    }

    let mut rulers = Vec::new();
    for info in RULERS {
        if let Some(setting) = merged.get(info.name) {
            if let Some(spec) = build_ruler(info.name, setting)? {
                rulers.push(spec);
            }
        }
    }
    Ok(rulers)
}

/// Builds a [`FileSet`] from its configuration.
///
/// # Errors
///
/// Returns an error for unknown rules or invalid options.
pub fn file_set(config: &FileSetConfig) -> Result<FileSet, ConfigError> {
    let rulers = build_rulers(config.style.as_ref())?;
    debug!(
        "File set {:?}: {} active rulers",
        config.label,
        rulers.len()
    );
    Ok(FileSet::new(
        config.label.clone(),
        config.paths.clone(),
        config.recursive,
        rulers,
    ))
}

/// Builds every file set of a configuration.
///
/// # Errors
///
/// Returns the first configuration error found; no file is processed
/// when this fails.
pub fn file_sets(config: &Config) -> Result<Vec<FileSet>, ConfigError> {
    config.file_sets.iter().map(file_set).collect()
}
