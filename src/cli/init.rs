//! Init command - write an example config

use anyhow::Result;
use console::style;
use sepsafe::AppConfig;
use std::path::Path;

pub fn run(path: &Path) -> Result<()> {
    if AppConfig::write_example(path)? {
        println!("{} Created {}", style("✓").green(), path.display());
    } else {
        println!("{} already exists, leaving it alone", path.display());
    }
    Ok(())
}
