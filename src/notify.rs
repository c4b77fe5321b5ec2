use anyhow::Result;

use crate::phrase::SubmitOutcome;

pub fn notify(summary: &str, body: &str) -> Result<()> {
    notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .icon("dialog-password")
        .show()?;
    Ok(())
}

/// Desktop notification for a submission result. Failures are only logged.
pub fn notify_outcome(outcome: &SubmitOutcome) {
    let mut body = vec![outcome.headline().to_string()];
    body.extend(outcome.details());

    if let Err(e) = notify("seedcheck", &body.join("\n")) {
        tracing::warn!("Desktop notification failed: {}", e);
    }
}
