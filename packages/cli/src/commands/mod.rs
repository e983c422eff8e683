pub mod defaults;
pub mod edit;
pub mod export;
pub mod init;
pub mod inspect;
pub mod visibility;

pub use defaults::{defaults, DefaultsArgs};
pub use edit::{edit, EditArgs};
pub use export::{export, ExportArgs};
pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use visibility::{visibility, VisibilityArgs};

use anyhow::{Context, Result};
use colored::Colorize;
use patternflow_model::{import_flow, Flow};
use std::fs;
use std::path::{Path, PathBuf};

/// Interpret `path` relative to the working directory
fn resolve_path(cwd: &str, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        PathBuf::from(cwd).join(path)
    }
}

fn load_flow(cwd: &str, path: &Path) -> Result<Flow> {
    let path = resolve_path(cwd, path);
    let source = fs::read_to_string(&path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    import_flow(&source).with_context(|| format!("Cannot import {}", path.display()))
}

/// Write to `output` if given, otherwise to stdout
fn write_output(cwd: &str, output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(output) => {
            let path = resolve_path(cwd, output);
            fs::write(&path, content)
                .with_context(|| format!("Cannot write {}", path.display()))?;
            println!("  {} Wrote {}", "✓".green(), path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
