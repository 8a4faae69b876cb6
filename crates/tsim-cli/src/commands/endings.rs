use std::path::Path;

use comfy_table::{ContentArrangement, Table};

use tsim_core::EndingResolver;

pub fn run(content: Option<&Path>) -> Result<(), String> {
    let catalog = super::load_catalog(content)?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Title", "Tier", "Condition"]);

    let resolver = EndingResolver::new(&catalog.endings);
    for (i, rule) in resolver.ordered().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            rule.title.clone(),
            rule.tier.to_string(),
            rule.condition.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  First matching rule wins; no match ends in \"The Quiet Exit\".");

    Ok(())
}
