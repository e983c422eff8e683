use super::{load_flow, resolve_path};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use patternflow_editor::resolve;
use patternflow_evaluator::{extract_flow_defaults, VisibilityEvaluator};
use patternflow_model::{FieldValues, Flow, Path, ViewContext};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct VisibilityArgs {
    /// Flow document (JSON)
    pub flow: PathBuf,

    /// Field values (JSON object), layered over the flow's defaults
    #[arg(long)]
    pub values: Option<PathBuf>,

    /// Viewing context: edit or view (overrides config)
    #[arg(short, long)]
    pub context: Option<ViewContext>,
}

pub fn visibility(args: VisibilityArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let flow = load_flow(cwd, &args.flow)?;
    let context = args.context.unwrap_or(config.context);

    let mut values = extract_flow_defaults(&flow);
    if let Some(values_path) = &args.values {
        let path = resolve_path(cwd, values_path);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let overrides: FieldValues = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a field-value object", path.display()))?;
        values.extend(overrides);
    }

    println!("{} {}", "Context".bright_blue().bold(), context);
    for page in visibility_report(&flow, &values, context) {
        println!("page {} {}", page.index, page.id);
        for path in &page.elements {
            let variant = resolve(&flow.pages_edit[page.index].elements, path)
                .map(|node| node.variant().to_string())
                .unwrap_or_default();
            println!("  {} {} {}", "✓".green(), path, variant);
        }
    }
    Ok(())
}

/// A visible page and its visible element paths
#[derive(Debug, PartialEq)]
pub struct VisiblePage {
    pub index: usize,
    pub id: String,
    pub elements: Vec<Path>,
}

pub fn visibility_report(flow: &Flow, values: &FieldValues, context: ViewContext) -> Vec<VisiblePage> {
    let evaluator = VisibilityEvaluator::new(values, context);
    evaluator
        .visible_pages(&flow.pages_edit)
        .into_iter()
        .map(|index| {
            let page = &flow.pages_edit[index];
            VisiblePage {
                index,
                id: page.id.clone(),
                elements: evaluator.visible_elements(&page.elements),
            }
        })
        .collect()
}
