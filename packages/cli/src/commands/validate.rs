use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use reportkit_blocks::BlockType;
use reportkit_editor::Document;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Report file (JSON array of blocks)
    pub input: PathBuf,
}

/// Read and validate a report file
pub fn load_report(path: &Path) -> Result<Document> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());

    Document::from_json(name, &content).with_context(|| format!("Invalid report {}", path.display()))
}

pub fn validate(args: ValidateArgs, cwd: &str) -> Result<()> {
    let path = PathBuf::from(cwd).join(&args.input);
    let doc = load_report(&path)?;

    println!("{} {} is valid", "✓".green(), args.input.display());

    for block_type in BlockType::ALL {
        let count = doc
            .tree()
            .all_ids()
            .iter()
            .filter_map(|id| doc.find(id))
            .filter(|block| block.block_type() == block_type)
            .count();
        if count > 0 {
            println!("  {:>3} × {}", count, block_type);
        }
    }

    Ok(())
}
