use anyhow::{Context, Result};

use prep_lib::resources::{Resource, ResourceKind, ResourceRequest, ResourceStatus};

use crate::app::App;
use crate::OutputFormat;

pub fn run_add(
    app: &App,
    title: String,
    kind: ResourceKind,
    content: Option<String>,
    url: Option<String>,
    wait: bool,
    format: &OutputFormat,
) -> Result<()> {
    let request = ResourceRequest {
        title,
        kind,
        content,
        url,
    };

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let (resource, status) = runtime.block_on(async {
        let (resource, mut handle) = app
            .engine
            .resources()
            .submit(&app.user, request)
            .context("Failed to add resource")?;
        // Processing only runs while this process is alive
        let status = if wait {
            handle.wait_for(ResourceStatus::Indexed).await
        } else {
            handle.current()
        };
        anyhow::Ok((resource, status))
    })?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": resource.id.to_string(),
                "title": resource.title,
                "kind": resource.kind,
                "status": status,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Added \"{}\" ({}): {}", resource.title, resource.kind, status);
            println!("  ID: {}", resource.id);
        }
    }
    Ok(())
}

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let resources = app
        .engine
        .resources()
        .list(&app.user)
        .context("Failed to list resources")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&resources)?);
        }
        OutputFormat::Plain => {
            if resources.is_empty() {
                println!("No resources.");
            }
            for resource in &resources {
                print_resource(resource);
            }
        }
    }
    Ok(())
}

fn print_resource(resource: &Resource) {
    println!(
        "{}  {:<12} {:<8} {}",
        resource.created_at.format("%Y-%m-%d"),
        resource.kind.as_str(),
        resource.status,
        resource.title
    );
    if let Some(url) = &resource.url {
        println!("            {}", url);
    }
}
