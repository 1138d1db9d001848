//! Shared helpers for command handlers.

use thingly_core::WriteOutcome;

use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Parse a `--data` argument: inline JSON, or `@path` to read a file.
pub fn parse_json_arg(arg: &str) -> Result<serde_json::Value, CliError> {
    let contents = if let Some(path) = arg.strip_prefix('@') {
        std::fs::read_to_string(path)?
    } else {
        arg.to_owned()
    };
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "data".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Parse a `--ttl` argument into wire nanoseconds.
pub fn parse_ttl_arg(arg: Option<&str>) -> Result<Option<u64>, CliError> {
    arg.map(|s| {
        thingly_core::ttl::parse(s).map_err(|e| CliError::Validation {
            field: "ttl".into(),
            reason: e.to_string(),
        })
    })
    .transpose()
}

/// Print how a write landed. Soft outcomes (queued, expired) are not
/// errors, but the user should know the device hasn't confirmed.
pub fn report_write_outcome(outcome: &WriteOutcome, quiet: bool) {
    let message = match outcome {
        WriteOutcome::Applied(value) => {
            if value.is_null() || value == &serde_json::json!({}) {
                "applied".to_owned()
            } else {
                output::render_json_pretty(value)
            }
        }
        WriteOutcome::PendingOnline => {
            "queued: device is offline, the write applies when it reconnects".to_owned()
        }
        WriteOutcome::Expired => {
            "expired: the command's time-to-live ran out before the device confirmed".to_owned()
        }
    };
    output::print_output(&message, quiet);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_inline_json() {
        let value = parse_json_arg(r#"{"state": true}"#).unwrap();
        assert_eq!(value["state"], true);

        assert!(parse_json_arg("{not json").is_err());
    }

    #[test]
    fn parse_ttl_argument() {
        assert_eq!(parse_ttl_arg(None).unwrap(), None);
        assert_eq!(parse_ttl_arg(Some("1.5s")).unwrap(), Some(1_500_000_000));
        assert_eq!(parse_ttl_arg(Some("infinite")).unwrap(), Some(0));

        let err = parse_ttl_arg(Some("50ms")).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn parse_json_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.json");
        std::fs::write(&path, r#"{"power": 42}"#).unwrap();

        let value = parse_json_arg(&format!("@{}", path.display())).unwrap();
        assert_eq!(value["power"], 42);
    }
}
