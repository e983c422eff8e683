use super::load_flow;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use patternflow_model::{Children, ElementCommon, ElementNode, Flow, Path};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Flow document (JSON)
    pub flow: PathBuf,

    /// Language for titles (overrides config)
    #[arg(short, long)]
    pub language: Option<String>,
}

pub fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let flow = load_flow(cwd, &args.flow)?;
    let language = args.language.as_deref().unwrap_or(&config.language);

    println!(
        "{} {}{}",
        "Flow".bright_blue().bold(),
        flow.id,
        title_suffix(flow.title.get(language))
    );
    for line in render_tree(&flow, language) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per page, node and subflow of the edit pages
pub fn render_tree(flow: &Flow, language: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for (index, page) in flow.pages_edit.iter().enumerate() {
        lines.push(format!(
            "page {} {}{}",
            index,
            page.id,
            title_suffix(page.title.get(language))
        ));
        render_list(&page.elements, &Path::root(), 1, language, &mut lines);
    }
    lines
}

fn render_list(
    elements: &[ElementNode],
    parent: &Path,
    depth: usize,
    language: &str,
    lines: &mut Vec<String>,
) {
    for (index, node) in elements.iter().enumerate() {
        let path = parent.child(index);
        lines.push(describe(
            depth,
            &path,
            &node.variant().to_string(),
            node.element.field_id(),
            node.element.common(),
            language,
        ));

        match node.element.children() {
            Some(Children::Elements(children)) => {
                render_list(children, &path, depth + 1, language, lines)
            }
            Some(Children::Chips(chips)) => {
                for (chip_index, chip) in chips.iter().enumerate() {
                    lines.push(describe(
                        depth + 1,
                        &path.child(chip_index),
                        "Boolean",
                        Some(&chip.field_id),
                        &chip.common,
                        language,
                    ));
                }
            }
            None => {}
        }

        for (subflow_index, subflow) in node.element.subflows().unwrap_or_default().iter().enumerate()
        {
            lines.push(format!(
                "{}subflow {} {}",
                "  ".repeat(depth + 1),
                subflow_index,
                subflow.subflow_type
            ));
            render_list(&subflow.elements, &Path::root(), depth + 2, language, lines);
        }
    }
}

fn describe(
    depth: usize,
    path: &Path,
    variant: &str,
    field_id: Option<&str>,
    common: &ElementCommon,
    language: &str,
) -> String {
    let field = field_id.map(|id| format!(" {}", id)).unwrap_or_default();
    format!(
        "{}{} {}{}{}",
        "  ".repeat(depth),
        path,
        variant,
        field,
        title_suffix(common.title.get(language))
    )
}

fn title_suffix(title: Option<&str>) -> String {
    title.map(|t| format!(" \"{}\"", t)).unwrap_or_default()
}
