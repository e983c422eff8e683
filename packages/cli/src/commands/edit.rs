use super::{load_flow, resolve_path, write_output};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use patternflow_editor::{CommandOutcome, EditCommand, EditSession};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Flow document (JSON)
    pub flow: PathBuf,

    /// JSON array of edit commands, "undo" and "redo"
    #[arg(short, long)]
    pub script: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// One entry of an edit script
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    History(HistoryStep),
    Command(EditCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStep {
    Undo,
    Redo,
}

pub fn edit(args: EditArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let flow = load_flow(cwd, &args.flow)?;

    let script_path = resolve_path(cwd, &args.script);
    let script = fs::read_to_string(&script_path)
        .with_context(|| format!("Cannot read {}", script_path.display()))?;
    let steps: Vec<ScriptStep> = serde_json::from_str(&script)
        .with_context(|| format!("{} is not a valid edit script", script_path.display()))?;

    let mut session = EditSession::with_history_limit(flow, config.history_limit);
    for line in run_script(&mut session, steps)? {
        eprintln!("{}", line);
    }

    let document = session.export_json()?;
    write_output(cwd, args.output.as_deref(), &document)
}

/// Apply every step in order; the first rejected command aborts the script
pub fn run_script(session: &mut EditSession, steps: Vec<ScriptStep>) -> Result<Vec<String>> {
    let mut report = Vec::with_capacity(steps.len());

    for (index, step) in steps.into_iter().enumerate() {
        let line = match step {
            ScriptStep::History(HistoryStep::Undo) => {
                let status = if session.undo() { "✓".green() } else { "-".dimmed() };
                format!("  {} {} undo", status, index)
            }
            ScriptStep::History(HistoryStep::Redo) => {
                let status = if session.redo() { "✓".green() } else { "-".dimmed() };
                format!("  {} {} redo", status, index)
            }
            ScriptStep::Command(command) => {
                let label = command.label();
                let outcome = session
                    .apply(command)
                    .with_context(|| format!("Step {} ({}) was rejected", index, label))?;
                let status = match outcome {
                    CommandOutcome::Applied => "✓".green(),
                    CommandOutcome::Unchanged => "-".dimmed(),
                };
                format!("  {} {} {}", status, index, label)
            }
        };
        report.push(line);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::write_survey;
    use patternflow_model::{import_flow, Variant};
    use serde_json::json;

    fn steps(value: serde_json::Value) -> Vec<ScriptStep> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_script_steps_parse() {
        let parsed = steps(json!([
            "undo",
            { "type": "RemovePage", "page": 1 },
            "redo"
        ]));
        assert_eq!(parsed[0], ScriptStep::History(HistoryStep::Undo));
        assert_eq!(
            parsed[1],
            ScriptStep::Command(EditCommand::RemovePage { page: 1 })
        );
        assert_eq!(parsed[2], ScriptStep::History(HistoryStep::Redo));
    }

    #[test]
    fn test_edit_command_writes_result() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        write_survey(dir.path());

        let script = json!([
            {
                "type": "AddElement",
                "list": { "page": 0 },
                "parent": [1],
                "element": { "pattern_type": "DateUIElement", "field_id": "adopted" },
                "index": 2
            },
            { "type": "RemoveElement", "node": { "list": { "page": 0 }, "path": [0] } },
            "undo",
            { "type": "DuplicateElement", "node": { "list": { "page": 1 }, "path": [0, 0] } }
        ]);
        fs::write(dir.path().join("script.json"), script.to_string()).unwrap();

        let args = EditArgs {
            flow: PathBuf::from("survey.json"),
            script: PathBuf::from("script.json"),
            output: Some(PathBuf::from("edited.json")),
        };
        edit(args, &cwd).unwrap();

        let edited =
            import_flow(&fs::read_to_string(dir.path().join("edited.json")).unwrap()).unwrap();
        let page = &edited.pages_edit[0].elements;
        assert_eq!(page.len(), 2);
        assert_eq!(
            patternflow_editor::resolve(page, &patternflow_model::Path::new(vec![1, 2]))
                .map(|node| node.variant()),
            Some(Variant::Date)
        );

        let chips = patternflow_editor::resolve(
            &edited.pages_edit[1].elements,
            &patternflow_model::Path::new(vec![0]),
        )
        .and_then(|node| node.children())
        .map(|children| children.len());
        assert_eq!(chips, Some(3));
    }

    #[test]
    fn test_rejected_step_aborts_script() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        write_survey(dir.path());

        let script = json!([
            {
                "type": "AddElement",
                "list": { "page": 1 },
                "parent": [0],
                "element": { "pattern_type": "StringUIElement", "field_id": "nope" }
            }
        ]);
        fs::write(dir.path().join("script.json"), script.to_string()).unwrap();

        let args = EditArgs {
            flow: PathBuf::from("survey.json"),
            script: PathBuf::from("script.json"),
            output: Some(PathBuf::from("edited.json")),
        };
        let err = edit(args, &cwd).unwrap_err();
        assert!(err.to_string().contains("Step 0 (Add element) was rejected"));
        assert!(!dir.path().join("edited.json").exists());
    }
}
