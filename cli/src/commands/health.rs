use anyhow::{Context, Result};
use colored::*;

/// Execute the health check command
pub async fn execute(gateway: &str, format: &str) -> Result<()> {
    let url = format!("{}/health", gateway.trim_end_matches('/'));
    let response = reqwest::Client::new()
        .get(&url)
        .send()
        .await
        .with_context(|| format!("failed to reach gateway at {}", url))?;

    let status = response.status();
    let body: serde_json::Value = response
        .json()
        .await
        .context("gateway returned a non-JSON health response")?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        _ => {
            print_health_text(status.as_u16(), &body);
        }
    }

    Ok(())
}

fn print_health_text(status: u16, body: &serde_json::Value) {
    let health = body["status"].as_str().unwrap_or("unknown");
    let line = format!("Gateway health: {} (HTTP {})", health, status);
    if health == "healthy" {
        println!("{}", line.green());
    } else {
        println!("{}", line.yellow());
    }

    if let Some(apps) = body["directory"]["applications"].as_u64() {
        println!("  registered applications: {}", apps);
    }
    if let Some(version) = body["version"].as_str() {
        println!("  version: {}", version);
    }
}
