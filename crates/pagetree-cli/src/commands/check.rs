use anyhow::{bail, Context, Result};
use colored::Colorize;
use pagetree::{generate_routes, Config, FsSource, RouteTable};

pub fn execute(config: &Config) -> Result<()> {
    let table = generate_routes(config, FsSource)
        .with_context(|| format!("Failed to generate routes from {:?}", config.pages_dir()))?;

    let tree = match &table {
        RouteTable::Scanned(tree) => tree,
        RouteTable::Override(routes) => {
            println!(
                "{}",
                format!("✓ {} routes from configuration, nothing to check", routes.len()).green()
            );
            return Ok(());
        }
    };

    if tree.conflicts.is_empty() {
        println!(
            "{}",
            format!("✓ {} routes, no conflicts", tree.route_count()).green()
        );
        return Ok(());
    }

    for conflict in &tree.conflicts {
        eprintln!(
            "{} {}  {} (already defined by {})",
            "conflict".red().bold(),
            conflict.path.bold(),
            conflict.file.display(),
            conflict.claimed_by.display()
        );
    }

    bail!("{} route conflict(s) found", tree.conflicts.len())
}
