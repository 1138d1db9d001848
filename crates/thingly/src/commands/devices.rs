//! Device command handlers.

use std::sync::Arc;

use tabled::Tabled;
use thingly_core::{Device, Hub, OnboardRequest};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Types")]
    types: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Ownership")]
    ownership: String,
}

impl From<&Arc<Device>> for DeviceRow {
    fn from(d: &Arc<Device>) -> Self {
        Self {
            id: d.id.clone(),
            name: d.display_name().to_owned(),
            types: d.types.join(", "),
            status: d.status.to_string(),
            ownership: d.ownership.to_string(),
        }
    }
}

fn detail(d: &Device) -> String {
    [
        format!("ID:         {}", d.id),
        format!("Name:       {}", d.display_name()),
        format!("Types:      {}", d.types.join(", ")),
        format!("Status:     {}", d.status),
        format!("Ownership:  {}", d.ownership),
        format!("Shadow:     {}", d.shadow_synchronization),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: DevicesArgs, hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => list(hub, global).await,
        DevicesCommand::Get { device } => get(hub, global, &device).await,
        DevicesCommand::Find { ip } => find(hub, global, &ip).await,
        DevicesCommand::Own { device } => own(hub, global, &device).await,
        DevicesCommand::Disown { device } => disown(hub, global, &device).await,
        DevicesCommand::Rename { device, name } => rename(hub, global, &device, &name).await,
        DevicesCommand::Onboard {
            device,
            coap_gateway,
            cloud_id,
            auth_code,
            provider,
        } => {
            let request = OnboardRequest {
                coap_gateway,
                cloud_id,
                authorization_code: auth_code,
                authorization_provider: provider,
            };
            onboard(hub, global, &device, &request).await
        }
        DevicesCommand::Offboard { device } => offboard(hub, global, &device).await,
        DevicesCommand::Status { device } => status(hub, global, &device).await,
        DevicesCommand::Flush => flush(hub, global).await,
    }
}

async fn list(hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    let devices = hub.refresh_devices().await?;
    let out = output::render_list(&global.output, &devices, |d| DeviceRow::from(d), |d| d.id.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn get(hub: &Hub, global: &GlobalOpts, device_id: &str) -> Result<(), CliError> {
    let device = hub.device(device_id).await?;
    let out = output::render_single(&global.output, &*device, detail, |d| d.id.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn find(hub: &Hub, global: &GlobalOpts, ip: &str) -> Result<(), CliError> {
    let device = hub.find_device_by_ip(ip).await?;
    let out = output::render_single(&global.output, &device, detail, |d| d.id.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn own(hub: &Hub, global: &GlobalOpts, device_id: &str) -> Result<(), CliError> {
    hub.own_device(device_id).await?;
    output::print_output(&format!("Owned device {device_id}"), global.quiet);
    Ok(())
}

async fn disown(hub: &Hub, global: &GlobalOpts, device_id: &str) -> Result<(), CliError> {
    if !util::confirm(
        &format!("Release ownership of device {device_id}?"),
        global.yes,
    )? {
        return Ok(());
    }
    hub.disown_device(device_id).await?;
    output::print_output(&format!("Disowned device {device_id}"), global.quiet);
    Ok(())
}

async fn rename(
    hub: &Hub,
    global: &GlobalOpts,
    device_id: &str,
    name: &str,
) -> Result<(), CliError> {
    let outcome = hub.rename_device(device_id, name).await?;
    util::report_write_outcome(&outcome, global.quiet);
    Ok(())
}

async fn onboard(
    hub: &Hub,
    global: &GlobalOpts,
    device_id: &str,
    request: &OnboardRequest,
) -> Result<(), CliError> {
    let outcome = hub.onboard_device(device_id, request).await?;
    util::report_write_outcome(&outcome, global.quiet);
    Ok(())
}

async fn offboard(hub: &Hub, global: &GlobalOpts, device_id: &str) -> Result<(), CliError> {
    if !util::confirm(
        &format!("Offboard device {device_id} from its cloud?"),
        global.yes,
    )? {
        return Ok(());
    }
    let outcome = hub.offboard_device(device_id).await?;
    util::report_write_outcome(&outcome, global.quiet);
    Ok(())
}

async fn status(hub: &Hub, global: &GlobalOpts, device_id: &str) -> Result<(), CliError> {
    let status = hub.onboarding_status(device_id).await?;
    output::print_output(&status.to_string(), global.quiet);
    Ok(())
}

async fn flush(hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    if !util::confirm("Flush the gateway's device cache?", global.yes)? {
        return Ok(());
    }
    hub.flush_devices().await?;
    output::print_output("Device cache flushed", global.quiet);
    Ok(())
}
