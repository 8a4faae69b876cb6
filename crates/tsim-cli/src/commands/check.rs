use std::path::Path;

use colored::Colorize;

pub fn run(content: Option<&Path>) -> Result<(), String> {
    let catalog = super::load_catalog_unchecked(content)?;
    let issues = catalog.validate();

    for issue in &issues {
        let line = issue.to_string();
        if issue.is_error {
            eprintln!("  {}", line.red());
        } else {
            eprintln!("  {}", line.yellow());
        }
    }

    let errors = issues.iter().filter(|i| i.is_error).count();
    let warnings = issues.len() - errors;
    if errors > 0 {
        return Err(format!(
            "{errors} error{}, {warnings} warning{}",
            if errors == 1 { "" } else { "s" },
            if warnings == 1 { "" } else { "s" },
        ));
    }

    println!("  All checks passed.");
    println!(
        "  {} classes, {} locations, {} clients, {} items, {} endings",
        catalog.classes.len(),
        catalog.locations.len(),
        catalog.clients.len(),
        catalog.items.len(),
        catalog.endings.len()
    );
    if warnings > 0 {
        println!("  {warnings} warning{}", if warnings == 1 { "" } else { "s" });
    }

    Ok(())
}
