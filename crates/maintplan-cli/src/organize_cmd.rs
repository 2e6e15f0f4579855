//! `maintplan organize`: structure notes from a file or stdin and print the plan.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

use maintplan_core::structuring::PlanStructurer;

use crate::tui::app::{EMPTY_INPUT_MESSAGE, STRUCTURING_FAILED_MESSAGE};
use crate::view;

/// Read notes from `file`, or stdin when `file` is `None` or `-`.
pub fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read notes from stdin")?;
            Ok(buf)
        }
    }
}

/// Structure `text` and render it as plain text or pretty JSON.
pub async fn organize_text(structurer: &dyn PlanStructurer, text: &str, json: bool) -> Result<String> {
    if text.trim().is_empty() {
        bail!(EMPTY_INPUT_MESSAGE);
    }

    let plan = match structurer.structure(text).await {
        Ok(plan) => plan,
        Err(_) => bail!(STRUCTURING_FAILED_MESSAGE),
    };

    if json {
        serde_json::to_string_pretty(&plan).context("failed to serialize plan")
    } else {
        Ok(view::to_plain_text(&view::plan_lines(&plan)))
    }
}

/// Execute `maintplan organize`.
pub async fn run_organize(
    structurer: &dyn PlanStructurer,
    file: Option<&Path>,
    json: bool,
) -> Result<()> {
    let text = read_input(file)?;
    let output = organize_text(structurer, &text, json).await?;
    println!("{output}");
    Ok(())
}
