//! Internal runner for `check!()` macro integration.
//!
//! This module is `#[doc(hidden)]` and not part of the public API.
//! It is called by the generated test function from `linewise::check!()`.

use linewise_core::{Config, Critic, Severity};
use linewise_lexer::RubyLexer;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file names to search for, in priority order.
const CONFIG_CANDIDATES: &[&str] = &["linewise.toml", ".linewise.toml"];

/// Runs linewise as part of `cargo test`.
///
/// # Panics
///
/// Panics with a formatted report if problems at or above the fail
/// threshold are found, or if the configuration is unusable.
pub fn run_check(config_path: Option<&str>, fail_on: Option<&str>) {
    run_check_at(&find_project_root(), config_path, fail_on);
}

fn run_check_at(root: &Path, config_path: Option<&str>, fail_on: Option<&str>) {
    let config = load_config(root, config_path);
    let fail_on = resolve_fail_on(fail_on, &config);

    let file_sets = linewise_rules::registry::file_sets(&config)
        .unwrap_or_else(|e| panic!("linewise: invalid style configuration: {e}"));

    let mut critic = Critic::builder()
        .root(root)
        .tokenizer(RubyLexer::new())
        .file_sets(file_sets)
        .build()
        .unwrap_or_else(|e| panic!("linewise: failed to build critic: {e}"));

    let found = critic
        .critique(|path, problems, label| {
            debug!("{} [{label}]: {} problem(s)", path.display(), problems.len());
        })
        .unwrap_or_else(|e| panic!("linewise: check failed: {e}"));
    debug!("{found} problem(s) under {}", root.display());

    let result = critic.into_result();
    if result.has_problems_at(fail_on) {
        panic!("{}", result.format_report(fail_on));
    }
}

/// Loads the explicit config, else the first candidate in `root`, else defaults.
fn load_config(root: &Path, explicit_path: Option<&str>) -> Config {
    let path = match explicit_path {
        Some(path) => Some(root.join(path)),
        None => CONFIG_CANDIDATES
            .iter()
            .map(|name| root.join(name))
            .find(|candidate| candidate.is_file()),
    };

    match path {
        Some(path) => Config::from_file(&path).unwrap_or_else(|e| {
            panic!("linewise: failed to load config from {}: {e}", path.display());
        }),
        None => Config::default(),
    }
}

/// Macro argument, then config file, then "error".
fn resolve_fail_on(macro_arg: Option<&str>, config: &Config) -> Severity {
    match macro_arg {
        Some(name) => name
            .parse()
            .unwrap_or_else(|e| panic!("linewise: {e}")),
        None => config.fail_on,
    }
}

/// Whether a `Cargo.toml` declares a `[workspace]` table.
fn has_workspace_section(cargo_toml: &Path) -> bool {
    std::fs::read_to_string(cargo_toml)
        .ok()
        .and_then(|content| content.parse::<toml::Table>().ok())
        .is_some_and(|table| table.contains_key("workspace"))
}

/// The workspace root above `CARGO_MANIFEST_DIR`, else the manifest dir
/// itself, else the current directory.
fn find_project_root() -> PathBuf {
    let Some(manifest_dir) = std::env::var_os("CARGO_MANIFEST_DIR").map(PathBuf::from) else {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    };

    manifest_dir
        .ancestors()
        .find(|dir| has_workspace_section(&dir.join("Cargo.toml")))
        .map_or_else(|| manifest_dir.clone(), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for (name, content) in files {
            let path = tmp.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        tmp
    }

    #[test]
    fn resolve_fail_on_prefers_macro_arg() {
        let mut config = Config::default();
        assert_eq!(resolve_fail_on(None, &config), Severity::Error);

        config.fail_on = Severity::Warning;
        assert_eq!(resolve_fail_on(None, &config), Severity::Warning);
        assert_eq!(resolve_fail_on(Some("error"), &config), Severity::Error);
    }

    #[test]
    #[should_panic(expected = "unknown severity")]
    fn resolve_fail_on_invalid_panics() {
        resolve_fail_on(Some("critical"), &Config::default());
    }

    #[test]
    fn load_config_finds_candidates() {
        let tmp = project(&[(".linewise.toml", "fail_on = \"warning\"\n")]);
        assert_eq!(load_config(tmp.path(), None).fail_on, Severity::Warning);

        let empty = TempDir::new().unwrap();
        assert_eq!(load_config(empty.path(), None).fail_on, Severity::Error);
    }

    #[test]
    #[should_panic(expected = "failed to load config")]
    fn missing_explicit_config_panics() {
        let tmp = TempDir::new().unwrap();
        load_config(tmp.path(), Some("nope.toml"));
    }

    #[test]
    fn clean_project_passes() {
        let tmp = project(&[("lib/a.rb", "module A\n  B = [1, 2]\nend\n")]);
        run_check_at(tmp.path(), None, None);
    }

    #[test]
    #[should_panic(expected = "LW002")]
    fn problems_panic_with_report() {
        let tmp = project(&[("lib/a.rb", "x = [1].map{ |i| i }\n")]);
        run_check_at(tmp.path(), None, None);
    }

    #[test]
    fn warnings_pass_unless_fail_on_warning() {
        let tmp = project(&[
            ("lib/a.rb", "x = [1,2]\n"),
            (
                "linewise.toml",
                "[[file_set]]\n[file_set.style]\nspaces_after_comma = { value = 1, level = \"warn\" }\n",
            ),
        ]);
        run_check_at(tmp.path(), None, None);

        let root = tmp.path().to_path_buf();
        let result = std::panic::catch_unwind(move || run_check_at(&root, None, Some("warning")));
        assert!(result.is_err());
    }

    #[test]
    fn workspace_root_detection() {
        let tmp = project(&[
            ("Cargo.toml", "[workspace]\nmembers = [\"member\"]\n"),
            ("member/Cargo.toml", "[package]\nname = \"member\"\n"),
        ]);
        assert!(has_workspace_section(&tmp.path().join("Cargo.toml")));
        assert!(!has_workspace_section(&tmp.path().join("member/Cargo.toml")));
        assert!(!has_workspace_section(&tmp.path().join("missing/Cargo.toml")));
    }
}
