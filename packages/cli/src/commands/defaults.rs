use super::load_flow;
use anyhow::{anyhow, Result};
use clap::Args;
use patternflow_evaluator::{extract_defaults, extract_flow_defaults};
use patternflow_model::{FieldValue, FieldValues, Flow};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DefaultsArgs {
    /// Flow document (JSON)
    pub flow: PathBuf,

    /// Only this edit page (all pages when omitted)
    #[arg(short, long)]
    pub page: Option<usize>,
}

pub fn defaults(args: DefaultsArgs, cwd: &str) -> Result<()> {
    let flow = load_flow(cwd, &args.flow)?;
    let defaults = collect_defaults(&flow, args.page)?;
    println!("{}", serde_json::to_string_pretty(&sorted(&defaults))?);
    Ok(())
}

fn collect_defaults(flow: &Flow, page: Option<usize>) -> Result<FieldValues> {
    match page {
        None => Ok(extract_flow_defaults(flow)),
        Some(index) => flow
            .edit_page(index)
            .map(|page| extract_defaults(&page.elements))
            .ok_or_else(|| anyhow!("Flow has no edit page {}", index)),
    }
}

/// Stable key order for printing
fn sorted(values: &FieldValues) -> BTreeMap<&str, &FieldValue> {
    values.iter().map(|(k, v)| (k.as_str(), v)).collect()
}
