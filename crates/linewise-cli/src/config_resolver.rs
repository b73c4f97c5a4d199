//! Locating `linewise.toml`.
//!
//! Candidates are tried in order:
//!
//! 1. `--config` flag (or `$LINEWISE_CONFIG`)
//! 2. `{root}/linewise.toml` or `{root}/.linewise.toml`
//! 3. `~/.linewise/config.toml`
//! 4. built-in defaults

use std::path::{Path, PathBuf};

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named on the command line.
    Explicit(PathBuf),
    /// Found in the project root.
    Project(PathBuf),
    /// Found in the user's global config directory.
    Global(PathBuf),
    /// Nothing found; the default file set and style apply.
    Default,
}

impl ConfigSource {
    /// The config file, unless defaults apply.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Whether the file came from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

/// File names looked up in the project root, first match wins.
const PROJECT_CONFIG_NAMES: &[&str] = &["linewise.toml", ".linewise.toml"];

/// File name inside the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Environment variable overriding the global config directory.
pub const CONFIG_DIR_ENV: &str = "LINEWISE_CONFIG_DIR";

/// Resolves the configuration for a project rooted at `root`.
#[must_use]
pub fn resolve(root: &Path, explicit: Option<&Path>) -> ConfigSource {
    let source = resolve_in(root, explicit, global_config_dir());
    tracing::debug!("Config source: {:?}", source);
    source
}

fn resolve_in(root: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    if let Some(found) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|candidate| candidate.is_file())
    {
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, ConfigSource::Global)
}

/// The global config directory: `$LINEWISE_CONFIG_DIR`, else `~/.linewise`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home::home_dir().map(|home| home.join(".linewise")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, "").unwrap();
    }

    #[test]
    fn explicit_path_wins_and_is_not_checked() {
        let project = TempDir::new().unwrap();
        touch(&project.path().join("linewise.toml"));

        let result = resolve_in(project.path(), Some(Path::new("/missing.toml")), None);
        assert_eq!(result, ConfigSource::Explicit(PathBuf::from("/missing.toml")));
    }

    #[test]
    fn project_names_are_tried_in_order() {
        let project = TempDir::new().unwrap();
        touch(&project.path().join(".linewise.toml"));
        assert_eq!(
            resolve_in(project.path(), None, None),
            ConfigSource::Project(project.path().join(".linewise.toml"))
        );

        touch(&project.path().join("linewise.toml"));
        assert_eq!(
            resolve_in(project.path(), None, None),
            ConfigSource::Project(project.path().join("linewise.toml"))
        );
    }

    #[test]
    fn global_config_is_the_fallback() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        let global_dir = Some(global.path().to_path_buf());

        assert_eq!(
            resolve_in(project.path(), None, global_dir.clone()),
            ConfigSource::Default
        );

        touch(&global.path().join("config.toml"));
        let result = resolve_in(project.path(), None, global_dir.clone());
        assert!(result.is_global());
        assert_eq!(result.path(), Some(global.path().join("config.toml").as_path()));

        touch(&project.path().join("linewise.toml"));
        assert!(matches!(
            resolve_in(project.path(), None, global_dir),
            ConfigSource::Project(_)
        ));
    }

    #[test]
    fn default_has_no_path() {
        let project = TempDir::new().unwrap();
        let result = resolve_in(project.path(), None, None);
        assert_eq!(result, ConfigSource::Default);
        assert!(result.path().is_none());
        assert!(!result.is_global());
    }
}
