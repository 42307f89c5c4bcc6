//! Building the text sent to the generator.
//!
//! Requests are a pure function of the stage, its upstream artifacts and the
//! diagnostics of earlier attempts, so a replayed run sends identical text.

use crate::core::types::StageId;
use crate::generation::orchestrator::{AttemptFailure, AttemptRecord};
use crate::schema::StageSchema;
use serde::Serialize;

/// Instructions describing the stage's task and the exact output shape.
pub fn system_instructions(instructions: &str, schema: &StageSchema) -> String {
    format!(
        "{}\n\nRespond with a single JSON object and no other text. \
         The object must have exactly these fields:\n{}",
        instructions,
        schema.outline()
    )
}

/// The user request for one attempt.
///
/// Every earlier attempt's diagnostics are repeated, oldest first, so the
/// generator sees all corrective context accumulated so far.
pub fn build_request<U: Serialize>(
    stage: StageId,
    upstream: &U,
    history: &[AttemptRecord],
) -> Result<String, serde_json::Error> {
    let mut request = format!("Produce the {} artifact.\n\n", stage.display_name());
    request.push_str("Upstream artifacts:\n");
    request.push_str(&serde_json::to_string_pretty(upstream)?);
    request.push('\n');

    if !history.is_empty() {
        request.push_str("\nEarlier attempts were rejected. Correct every problem listed below.\n");
        for record in history {
            write_feedback(&mut request, record);
        }
    }

    Ok(request)
}

fn write_feedback(out: &mut String, record: &AttemptRecord) {
    out.push_str(&format!("Attempt {}:\n", record.attempt));
    match &record.failure {
        AttemptFailure::Structural(error) => {
            out.push_str(&format!("- {} ({})\n", error, error.suggested_fix()));
        }
        AttemptFailure::Rules(report) => {
            for message in report.messages() {
                out.push_str(&format!("- {}\n", message));
            }
        }
    }
    if let Some(hint) = &record.hint {
        out.push_str(&format!("Hint: {}\n", hint));
    }
}
