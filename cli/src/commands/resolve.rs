use anyhow::{Context, Result};
use colored::*;
use directory::{Directory, StaticDirectory};

/// Load a directory file, validate its invariants, and resolve a prefix.
///
/// Useful before rolling out directory changes: duplicate prefixes or
/// hosts fail here the same way they would fail gateway startup.
pub async fn execute(directory_path: &str, prefix: &str) -> Result<()> {
    let dir = StaticDirectory::from_file(directory_path)
        .with_context(|| format!("failed to load directory from {}", directory_path))?;

    println!(
        "Directory OK: {} application(s)",
        dir.count().await.unwrap_or(0)
    );

    match dir.resolve(prefix).await? {
        Some(record) => {
            println!("{}", format!("Prefix '{}' resolved", prefix).green());
            println!("  host:             {}", record.host);
            println!("  name:             {}", record.name);
            println!("  owner:            {}", record.owner);
            println!("  protected routes: {}", record.protected_routes.len());
            println!("  anonymous routes: {}", record.anonymous_routes.len());
            println!("  lookup rules:     {}", record.lookup_rules.len());
        }
        None => {
            println!(
                "{}",
                format!("Prefix '{}' is not registered", prefix).red()
            );
            std::process::exit(1);
        }
    }

    Ok(())
}
