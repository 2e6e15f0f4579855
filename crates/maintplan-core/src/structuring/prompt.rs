//! Instruction prompt for the structuring call.
//!
//! Pure string assembly; no I/O.

/// JSON shape the model is asked to produce. Mirrors [`crate::plan::OrganizedPlan`].
const SCHEMA_REFERENCE: &str = r#"{
  "eventDetails": {
    "date": "string",
    "time": "string",
    "services": "string"
  },
  "planning": [
    {
      "task": "string",
      "status": "string (e.g., 'Completed', 'Pending')",
      "responsible": "string | null"
    }
  ],
  "safety": {
    "dc85": {
      "preparationBy": "string",
      "deadline": "string",
      "safetyResponsible": "string"
    }
  },
  "volunteers": ["string"],
  "documents": ["string"],
  "ppe": ["string"]
}"#;

/// Delimiter placed on its own line before and after the user's notes.
pub const TEXT_DELIMITER: &str = "---";

/// Build the full instruction prompt for `text`.
///
/// The notes are embedded verbatim exactly once, between two
/// [`TEXT_DELIMITER`] lines.
pub fn build_prompt(text: &str) -> String {
    let mut prompt = String::with_capacity(SCHEMA_REFERENCE.len() + text.len() + 1024);

    prompt.push_str(
        "Analyze the following maintenance plan text and structure it into a JSON object.\n",
    );
    prompt.push_str(
        "The text is in Portuguese. Translate keys and status values to English in the final JSON, \
         regardless of the input language.\n",
    );
    prompt.push_str(
        "Infer the status of planning items. A green circle '🟢' means 'Completed'. \
         If there is no status indicator, assume 'Pending'.\n\n",
    );

    prompt.push_str("Here is the desired JSON schema:\n");
    prompt.push_str(SCHEMA_REFERENCE);
    prompt.push_str("\n\n");

    prompt.push_str("Maintenance Plan Text:\n");
    prompt.push_str(TEXT_DELIMITER);
    prompt.push('\n');
    prompt.push_str(text);
    prompt.push('\n');
    prompt.push_str(TEXT_DELIMITER);
    prompt.push_str("\n\n");

    prompt.push_str(
        "Return ONLY the JSON object, with no additional text or markdown formatting.\n",
    );

    prompt
}
