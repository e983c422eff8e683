use super::{load_flow, write_output};
use anyhow::Result;
use clap::Args;
use patternflow_model::export_flow;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Flow document (JSON)
    pub flow: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let flow = load_flow(cwd, &args.flow)?;
    let document = export_flow(&flow)?;
    write_output(cwd, args.output.as_deref(), &document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{survey, write_survey};
    use std::fs;

    #[test]
    fn test_export_writes_canonical_document() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        write_survey(dir.path());

        let args = ExportArgs {
            flow: PathBuf::from("survey.json"),
            output: Some(PathBuf::from("out.json")),
        };
        export(args, &cwd).unwrap();

        let written = fs::read_to_string(dir.path().join("out.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value, survey());
    }

    #[test]
    fn test_export_rejects_malformed_document() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        fs::write(dir.path().join("broken.json"), "{ \"id\": ").unwrap();

        let args = ExportArgs {
            flow: PathBuf::from("broken.json"),
            output: None,
        };
        let err = export(args, &cwd).unwrap_err();
        assert!(err.to_string().contains("Cannot import"));
    }
}
