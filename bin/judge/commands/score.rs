//! Score command - aggregate a saved result payload offline

use super::{print_json, print_report};
use crate::style::*;
use anyhow::{Context, Result};
use judge_client::{aggregate, ResultPayload};
use std::path::PathBuf;

pub fn run(file: PathBuf, json: bool) -> Result<()> {
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let payload: ResultPayload = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse result payload in {}", file.display()))?;

    if !payload.is_done() {
        print_warning("Payload is not marked done; scoring the cases it has");
    }

    let score = aggregate(&payload.cases);
    if json {
        print_json(&score)
    } else {
        print_report(&score);
        Ok(())
    }
}
