use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use reportkit_blocks::BlockType;
use reportkit_editor::Document;
use serde_json::json;
use std::fs;
use std::path::PathBuf;

pub const SAMPLE_REPORT_NAME: &str = "report.json";

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing config and sample report
    #[arg(short, long)]
    pub force: bool,
}

/// Build the sample report through the same commands an editor would issue
pub fn sample_report() -> Result<Document> {
    let mut doc = Document::new("sample");

    let title = doc.add(BlockType::Text)?;
    doc.update(
        &title,
        json!({"content": "Monthly performance", "size": "2xl", "weight": "bold"}),
    )?;

    let kpis = doc.add(BlockType::Group)?;
    doc.update(&kpis, json!({"title": "Key figures"}))?;
    doc.add_to_group(&kpis, BlockType::Metric)?;
    let patients = doc.add_to_group(&kpis, BlockType::Metric)?;
    doc.update(&patients, json!({"title": "Patients", "metric": "patients", "currency": false, "percentageChange": 4.2}))?;

    let chart = doc.add(BlockType::Chart)?;
    doc.update(&chart, json!({"title": "Revenue by month", "chart": "line"}))?;

    doc.add(BlockType::PageBreak)?;

    let notes = doc.add(BlockType::Text)?;
    doc.update(
        &notes,
        json!({"content": "Figures exclude cancelled appointments.", "size": "sm"}),
    )?;
    doc.add(BlockType::Table)?;

    Ok(doc)
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Reportkit project...".bright_blue().bold());

    // Write config file
    let config = Config::default();
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    // Create sample report
    let report_path = PathBuf::from(cwd).join(SAMPLE_REPORT_NAME);
    if !report_path.exists() || args.force {
        let doc = sample_report()?;
        fs::write(&report_path, doc.to_json()?)?;
        println!("  {} Created {} ({} blocks)", "✓".green(), SAMPLE_REPORT_NAME, doc.len());
    }

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}", SAMPLE_REPORT_NAME);
    println!("  2. Run: reportkit export {}", SAMPLE_REPORT_NAME);
    println!("  3. Check output in {}/", config.out_dir);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_report_round_trips() {
        let doc = sample_report().unwrap();
        let reloaded = Document::from_json("sample", &doc.to_json().unwrap()).unwrap();

        assert_eq!(reloaded.blocks(), doc.blocks());
        assert_eq!(doc.len(), 6);
    }

    #[test]
    fn test_init_does_not_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        let config_path = dir.path().join(DEFAULT_CONFIG_NAME);
        std::fs::write(&config_path, "{\"page\": \"letter\"}").unwrap();

        init(InitArgs { force: false }, cwd).unwrap();

        assert_eq!(std::fs::read_to_string(&config_path).unwrap(), "{\"page\": \"letter\"}");
        assert!(!dir.path().join(SAMPLE_REPORT_NAME).exists());
    }
}
