use std::path::Path;

use comfy_table::{ContentArrangement, Table};

use tsim_core::Stat;

pub fn run(content: Option<&Path>) -> Result<(), String> {
    let catalog = super::load_catalog(content)?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Id", "Name", "Patience", "Empathy", "Insight", "Composure", "Ability",
    ]);

    for class in &catalog.classes {
        let mut row = vec![class.id.clone(), class.name.clone()];
        row.extend(Stat::ALL.iter().map(|s| class.base_stats.get(*s).to_string()));
        row.push(if class.ability.is_empty() {
            "-".to_string()
        } else {
            class.ability.clone()
        });
        table.add_row(row);
    }

    println!("{table}");
    println!();
    println!("  {} classes", catalog.classes.len());

    Ok(())
}
