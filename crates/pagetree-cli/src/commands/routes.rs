use anyhow::{Context, Result};
use colored::Colorize;
use pagetree::{generate_routes, Config, FsSource, RouteNode, RouteRecord, RouteTable};

pub fn execute(config: &Config, json: bool) -> Result<()> {
    let table = generate_routes(config, FsSource)
        .with_context(|| format!("Failed to generate routes from {:?}", config.pages_dir()))?;

    if json {
        let records = table.records();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    match &table {
        RouteTable::Scanned(tree) => {
            println!(
                "{} {}",
                "Routes from".green().bold(),
                config.pages_dir().display().to_string().cyan()
            );
            println!();

            for node in &tree.routes {
                print_node(node, 0);
            }

            println!();
            println!("{} routes", tree.route_count());
            if !tree.conflicts.is_empty() {
                println!(
                    "{}",
                    format!(
                        "⚠ {} page(s) dropped because of path conflicts, run `pagetree check` for details",
                        tree.conflicts.len()
                    )
                    .yellow()
                );
            }
        }
        RouteTable::Override(routes) => {
            println!(
                "{}",
                "Routes from configuration (page scan skipped)".green().bold()
            );
            println!();

            for record in routes {
                print_record(record, 0);
            }
        }
    }

    Ok(())
}

fn print_node(node: &RouteNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let path = if node.is_layout() {
        format!("{} {}", node.path().bold(), "[layout]".magenta())
    } else {
        node.path().bold().to_string()
    };

    println!(
        "{}{}  {}  {}  {}",
        indent,
        path,
        node.name().cyan(),
        format!("rank {}", node.rank()).dimmed(),
        node.component().path().display()
    );

    for child in node.children() {
        print_node(child, depth + 1);
    }
}

fn print_record(record: &RouteRecord, depth: usize) {
    let indent = "  ".repeat(depth);
    let name = record.name.as_deref().unwrap_or("-");
    let component = record
        .component
        .as_ref()
        .map(|c| c.path().display().to_string())
        .unwrap_or_default();

    println!(
        "{}{}  {}  {}",
        indent,
        record.path.bold(),
        name.cyan(),
        component
    );

    for child in &record.children {
        print_record(child, depth + 1);
    }
}
