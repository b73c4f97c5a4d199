//! List rules command implementation.

use linewise_rules::registry::RULERS;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!(
        "{:<8} {:<28} {:<9} {:<8} Description",
        "Code", "Name", "Default", "Level"
    );
    println!("{}", "-".repeat(96));

    for info in RULERS {
        println!(
            "{:<8} {:<28} {:<9} {:<8} {}",
            info.code,
            info.name,
            info.default_value,
            info.default_severity.to_string(),
            info.description
        );
    }

    println!("\nConfigure rules in the [file_set.style] table of linewise.toml, e.g.:");
    println!("  indentation_spaces = 4");
    println!("  max_line_length = {{ value = 100, level = \"warning\" }}");
    println!("  allow_hard_tabs = \"off\"");
}
