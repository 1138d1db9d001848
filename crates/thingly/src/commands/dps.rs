//! Device provisioning service command handlers.

use thingly_core::{Hub, provision_status_severity};

use crate::cli::{DpsArgs, DpsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(args: DpsArgs, hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        DpsCommand::Get { device } => get(hub, global, &device).await,
        DpsCommand::Set {
            device,
            endpoint,
            ttl,
        } => set(hub, global, &device, &endpoint, ttl.as_deref()).await,
        DpsCommand::Status { device } => status(hub, global, &device).await,
    }
}

async fn get(hub: &Hub, global: &GlobalOpts, device_id: &str) -> Result<(), CliError> {
    let links = hub.resource_links(device_id).await?;
    let Some(resource) = thingly_core::model::resource::dps_config(&links) else {
        return Err(CliError::MissingWellKnownResource {
            device_id: device_id.to_owned(),
            resource_type: "x.plgd.dps.conf".into(),
        });
    };
    let content = hub.read_resource(device_id, &resource.href, None).await?;
    output::print_output(&output::render_json_pretty(&content), global.quiet);
    Ok(())
}

async fn set(
    hub: &Hub,
    global: &GlobalOpts,
    device_id: &str,
    endpoint: &str,
    ttl: Option<&str>,
) -> Result<(), CliError> {
    let ttl = util::parse_ttl_arg(ttl)?;
    let outcome = hub.set_dps_endpoint(device_id, endpoint, ttl).await?;
    util::report_write_outcome(&outcome, global.quiet);
    Ok(())
}

async fn status(hub: &Hub, global: &GlobalOpts, device_id: &str) -> Result<(), CliError> {
    let status = hub.provision_status(device_id).await?;
    let label = status.to_string();
    let colored = output::severity_label(
        &label,
        provision_status_severity(&label),
        output::should_color(&global.color),
    );
    output::print_output(&colored, global.quiet);
    Ok(())
}
