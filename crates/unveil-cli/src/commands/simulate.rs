use std::path::Path;

use anyhow::{Context, Result};

use unveil_core::scenario::Scenario;

pub fn run(path: &Path, compact: bool) -> Result<()> {
    let scenario = Scenario::load(path)
        .with_context(|| format!("Failed to load scenario {}", path.display()))?;
    tracing::info!(
        "Replaying scenario '{}' ({} events)",
        scenario.name.as_deref().unwrap_or("unnamed"),
        scenario.events.len()
    );

    let report = scenario.run()?;
    let output = if compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{}", output);

    Ok(())
}
