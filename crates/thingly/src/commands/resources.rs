//! Resource command handlers.

use tabled::Tabled;
use thingly_core::tree::ResourceTreeNode;
use thingly_core::{Hub, Resource};

use crate::cli::{GlobalOpts, OutputFormat, ResourcesArgs, ResourcesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Href")]
    href: String,
    #[tabled(rename = "Types")]
    types: String,
    #[tabled(rename = "Interfaces")]
    interfaces: String,
    #[tabled(rename = "Editable")]
    editable: String,
}

impl From<&Resource> for ResourceRow {
    fn from(r: &Resource) -> Self {
        Self {
            href: r.href.clone(),
            types: r.resource_types.join(", "),
            interfaces: r.interfaces.join(", "),
            editable: if r.is_editable() { "yes" } else { "no" }.into(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: ResourcesArgs, hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ResourcesCommand::List { device } => list(hub, global, &device).await,
        ResourcesCommand::Tree { device } => tree(hub, global, &device).await,
        ResourcesCommand::Get {
            device,
            href,
            interface,
        } => get(hub, global, &device, &href, interface.as_deref()).await,
        ResourcesCommand::Update {
            device,
            href,
            data,
            interface,
            ttl,
        } => {
            update(
                hub,
                global,
                &device,
                &href,
                &data,
                interface.as_deref(),
                ttl.as_deref(),
            )
            .await
        }
        ResourcesCommand::Create {
            device,
            href,
            data,
            ttl,
        } => create(hub, global, &device, &href, data.as_deref(), ttl.as_deref()).await,
        ResourcesCommand::Delete { device, href, ttl } => {
            delete(hub, global, &device, &href, ttl.as_deref()).await
        }
    }
}

async fn list(hub: &Hub, global: &GlobalOpts, device_id: &str) -> Result<(), CliError> {
    let resources = hub.resource_links(device_id).await?;
    let out = output::render_list(&global.output, &resources, |r| ResourceRow::from(r), |r| {
        r.href.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn tree(hub: &Hub, global: &GlobalOpts, device_id: &str) -> Result<(), CliError> {
    let nodes = hub.resource_tree(device_id).await?;
    let out = match global.output {
        OutputFormat::Table | OutputFormat::Plain => render_tree(&nodes),
        OutputFormat::Json => output::render_json_pretty(&nodes),
        OutputFormat::JsonCompact => output::render_json_compact(&nodes),
        OutputFormat::Yaml => output::render_yaml(&nodes),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn get(
    hub: &Hub,
    global: &GlobalOpts,
    device_id: &str,
    href: &str,
    interface: Option<&str>,
) -> Result<(), CliError> {
    let content = hub.read_resource(device_id, href, interface).await?;
    let out = match global.output {
        OutputFormat::JsonCompact => output::render_json_compact(&content),
        OutputFormat::Yaml => output::render_yaml(&content),
        _ => output::render_json_pretty(&content),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn update(
    hub: &Hub,
    global: &GlobalOpts,
    device_id: &str,
    href: &str,
    data: &str,
    interface: Option<&str>,
    ttl: Option<&str>,
) -> Result<(), CliError> {
    let body = util::parse_json_arg(data)?;
    let ttl = util::parse_ttl_arg(ttl)?;
    let outcome = hub
        .write_resource(device_id, href, interface, ttl, &body)
        .await?;
    util::report_write_outcome(&outcome, global.quiet);
    Ok(())
}

async fn create(
    hub: &Hub,
    global: &GlobalOpts,
    device_id: &str,
    href: &str,
    data: Option<&str>,
    ttl: Option<&str>,
) -> Result<(), CliError> {
    let body = match data {
        Some(arg) => util::parse_json_arg(arg)?,
        None => thingly_core::model::resource::new_resource_template(),
    };
    let ttl = util::parse_ttl_arg(ttl)?;
    let outcome = hub.create_resource(device_id, href, ttl, &body).await?;
    util::report_write_outcome(&outcome, global.quiet);
    Ok(())
}

async fn delete(
    hub: &Hub,
    global: &GlobalOpts,
    device_id: &str,
    href: &str,
    ttl: Option<&str>,
) -> Result<(), CliError> {
    let ttl = util::parse_ttl_arg(ttl)?;
    if !util::confirm(
        &format!("Delete resource {href} on device {device_id}?"),
        global.yes,
    )? {
        return Ok(());
    }
    let outcome = hub.delete_resource(device_id, href, ttl).await?;
    util::report_write_outcome(&outcome, global.quiet);
    Ok(())
}

// ── Tree rendering ──────────────────────────────────────────────────

/// Render the resource tree with box-drawing connectors, one short
/// label per node.
fn render_tree(nodes: &[ResourceTreeNode]) -> String {
    let mut lines = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        render_node(node, "", i + 1 == nodes.len(), &mut lines);
    }
    lines.join("\n")
}

fn render_node(node: &ResourceTreeNode, prefix: &str, last: bool, lines: &mut Vec<String>) {
    let connector = if prefix.is_empty() {
        ""
    } else if last {
        "└─ "
    } else {
        "├─ "
    };

    let mut label = node.href.clone();
    if let Some(ref resource) = node.resource {
        if !resource.resource_types.is_empty() {
            label.push_str(&format!("  [{}]", resource.resource_types.join(", ")));
        }
    }
    lines.push(format!("{prefix}{connector}{label}"));

    let child_prefix = if prefix.is_empty() {
        String::new()
    } else if last {
        format!("{prefix}   ")
    } else {
        format!("{prefix}│  ")
    };
    // Top-level nodes get one level of indent for their children.
    let child_prefix = if prefix.is_empty() {
        "  ".to_owned()
    } else {
        child_prefix
    };

    for (i, child) in node.sub_rows.iter().enumerate() {
        render_node(child, &child_prefix, i + 1 == node.sub_rows.len(), lines);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use thingly_core::build_resource_tree;

    use super::*;

    #[test]
    fn tree_rendering_shows_hierarchy() {
        let resources = vec![
            Resource {
                href: "/light/1".into(),
                resource_types: vec!["oic.r.light".into()],
                ..Resource::default()
            },
            Resource {
                href: "/light/2".into(),
                ..Resource::default()
            },
            Resource {
                href: "/oic/d".into(),
                ..Resource::default()
            },
        ];
        let tree = build_resource_tree(&resources).unwrap();
        let rendered = render_tree(&tree);

        assert!(rendered.contains("/light/"));
        assert!(rendered.contains("└─ /light/2/"));
        assert!(rendered.contains("[oic.r.light]"));
    }
}
