//! Live event watching with notification toggles.
//!
//! Connects the hub (with the WebSocket pump enabled), switches on the
//! notification keys the flags name, and prints notices as they arrive.
//! `--topics` additionally prints every keyed topic, gated or not.

use std::sync::Arc;
use std::time::Duration;

use owo_colors::OwoColorize;
use tokio::sync::broadcast::error::RecvError;

use thingly_core::{Device, Hub, Notice, Severity};
use thingly_core::notify::{DEVICES_STATUS_KEY, device_key, resource_update_key};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: WatchArgs, hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    // Toggle the requested notification keys before events flow.
    let active = hub.notifications();
    if args.all_status {
        active.set(DEVICES_STATUS_KEY, true);
    }
    for device_id in &args.device {
        active.set(device_key(device_id), true);
    }
    for spec in &args.resource {
        let (device_id, href) = parse_resource_spec(spec)?;
        active.set(resource_update_key(device_id, href), true);
    }

    let mut notices = hub.subscribe_notices();
    let mut topics = hub.subscribe_topics();
    let mut device_list = hub.device_stream();

    hub.connect().await?;
    output::print_output(
        &format!(
            "Watching gateway events ({} notification key(s) active). Ctrl-C to stop.",
            active.len()
        ),
        global.quiet,
    );

    let color = output::should_color(&global.color);
    let deadline = args.duration.map(Duration::from_secs);
    let watch = async {
        loop {
            tokio::select! {
                notice = notices.recv() => match notice {
                    Ok(notice) => print_notice(&notice, color, global.quiet),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "notice stream lagged");
                    }
                    Err(RecvError::Closed) => break,
                },
                topic = topics.recv(), if args.topics => match topic {
                    Ok(topic) => output::print_output(
                        &format!("{}  {}", topic.key, topic.payload),
                        global.quiet,
                    ),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "topic stream lagged");
                    }
                    Err(RecvError::Closed) => break,
                },
                snapshot = device_list.changed(), if args.devices => match snapshot {
                    Some(devices) => print_device_list(&devices, global.quiet),
                    None => break,
                },
            }
        }
    };

    match deadline {
        Some(duration) => {
            tokio::select! {
                () = watch => {}
                () = tokio::time::sleep(duration) => {}
                _ = tokio::signal::ctrl_c() => {}
            }
        }
        None => {
            tokio::select! {
                () = watch => {}
                _ = tokio::signal::ctrl_c() => {}
            }
        }
    }

    Ok(())
}

/// Parse a `device-id:href` resource spec. The href's own slashes make
/// splitting on the first `:/` unambiguous.
fn parse_resource_spec(spec: &str) -> Result<(&str, &str), CliError> {
    spec.find(":/")
        .map(|pos| (&spec[..pos], &spec[pos + 1..]))
        .ok_or_else(|| CliError::Validation {
            field: "resource".into(),
            reason: format!("expected device-id:/href, got {spec:?}"),
        })
}

fn print_device_list(devices: &[Arc<Device>], quiet: bool) {
    let mut out = format!("device list changed: {} device(s)", devices.len());
    for device in devices {
        out.push_str(&format!(
            "\n  {}  {}  {}",
            device.id,
            device.display_name(),
            device.status
        ));
    }
    output::print_output(&out, quiet);
}

fn print_notice(notice: &Notice, color: bool, quiet: bool) {
    let badge = match notice.severity {
        Severity::Success => "ok",
        Severity::Warning => "warn",
        Severity::Error => "error",
        Severity::Grey => "info",
    };
    let badge = if color {
        match notice.severity {
            Severity::Success => badge.green().to_string(),
            Severity::Warning => badge.yellow().to_string(),
            Severity::Error => badge.red().to_string(),
            Severity::Grey => badge.dimmed().to_string(),
        }
    } else {
        badge.to_owned()
    };
    output::print_output(
        &format!("[{badge}] {}: {}", notice.title, notice.body),
        quiet,
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn resource_spec_splits_on_first_colon_slash() {
        let (device, href) = parse_resource_spec("d1:/light/1").unwrap();
        assert_eq!(device, "d1");
        assert_eq!(href, "/light/1");

        // Device ids may contain colons of their own.
        let (device, href) = parse_resource_spec("urn:uuid:42:/oc/con").unwrap();
        assert_eq!(device, "urn:uuid:42");
        assert_eq!(href, "/oc/con");

        assert!(parse_resource_spec("no-href").is_err());
    }
}
