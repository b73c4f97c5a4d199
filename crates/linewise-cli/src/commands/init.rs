//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

/// Config file written by `linewise init`.
pub const CONFIG_FILE_NAME: &str = "linewise.toml";

const DEFAULT_CONFIG: &str = r#"# linewise configuration

# Lowest severity that fails `linewise check` ("error" or "warning")
fail_on = "error"

[[file_set]]
label = "default"
# Glob selectors, relative to the project root
paths = ["lib/**/*.rb"]
# Set to true to treat each selector as a directory walked for *.rb files
recursive = false

# Every rule is on by default. Set a rule to "off" to disable it, or use
# { value = ..., level = "warning" } to change its severity.
[file_set.style]
indentation_spaces = 2
spaces_before_lbrace = 1
max_line_length = 80
trailing_newlines = 1
allow_hard_tabs = false
allow_trailing_line_spaces = false
spaces_after_comma = 1

# Additional file sets get their own style:
# [[file_set]]
# label = "specs"
# paths = ["spec/**/*.rb"]
# [file_set.style]
# max_line_length = { value = 120, level = "warning" }
"#;

/// Runs the init command in the current directory.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("."), force)?;

    println!("Created {CONFIG_FILE_NAME}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE_NAME} to configure rules");
    println!("  2. Run: linewise check");

    Ok(())
}

fn write_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    Ok(())
}
