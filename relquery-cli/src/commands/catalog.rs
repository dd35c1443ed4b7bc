//! Print the entity catalog

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use relquery_server::catalog::storefront;

/// Arguments for the catalog command
#[derive(Parser, Debug)]
pub struct CatalogArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run_catalog(args: CatalogArgs) -> Result<()> {
    let catalog = storefront::catalog().context("Failed to build catalog")?;

    if args.json {
        let body = json!({
            "entities": catalog.entities().collect::<Vec<_>>(),
            "relationships": catalog.relationships(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    for entity in catalog.entities() {
        println!("{} ({})", entity.name, entity.table);
        for field in &entity.fields {
            println!("  {:<14} {}", field.name, field.ty.as_str());
        }
        for rel in catalog.relationships_of(entity.name) {
            println!(
                "  {:<14} -> {} ({:?} via {})",
                rel.name, rel.to, rel.cardinality, rel.fk_column
            );
        }
        println!();
    }

    Ok(())
}
