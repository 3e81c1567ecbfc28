//! JSON grouping loader

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};

/// Load a grouping stored as a JSON array of arrays of node id strings
pub fn load_groups(path: &str) -> Result<Vec<Vec<String>>> {
    log::info!("Reading groups file: {}", path);

    if !Path::new(path).exists() {
        return Err(anyhow::anyhow!("File not found: {}", path));
    }

    let reader = BufReader::new(File::open(path)?);
    let groups: Vec<Vec<String>> = serde_json::from_reader(reader)
        .with_context(|| format!("Invalid groups file: {}", path))?;

    let members: usize = groups.iter().map(Vec::len).sum();
    log::info!(
        "Loaded {} groups with {} memberships",
        groups.len(),
        members
    );

    Ok(groups)
}
