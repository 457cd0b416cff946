//! JSON session scripts: sources, toolbar targets and a list of steps.
//!
//! ```json
//! {
//!   "sources": [{"name": "points", "data": {"x": {"kind": "int64", "values": [1, 2, 3]}}}],
//!   "tools": {"checkpoint": ["points"], "restore": ["points"], "clear": ["points"]},
//!   "steps": ["checkpoint", {"set": {"source": "points", "column": "x",
//!             "value": {"kind": "int64", "values": [9]}}}, "restore", "print"]
//! }
//! ```

use anyhow::Context;
use colsnap_actions::{Session, SessionInspector, ToolAction, ToolConfig};
use colsnap_common::{Column, ColumnData};
use colsnap_source::{DataSource, SourceRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    pub sources: Vec<SourceSpec>,
    #[serde(default)]
    pub tools: ToolConfig,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A source to register. Omitting `data` registers a source with no data
/// mapping.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSpec {
    pub name: String,
    #[serde(default)]
    pub data: Option<ColumnData>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Checkpoint,
    Restore,
    Clear,
    /// Overwrite one live column, as a user edit would.
    Set {
        source: String,
        column: String,
        value: Column,
    },
    /// Record a summary of every source.
    Print,
}

/// What one step did.
#[derive(Debug, Serialize)]
pub struct StepLog {
    pub step: String,
    pub ok: bool,
    pub lines: Vec<String>,
}

impl Script {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing script {}", path.display()))
    }

    /// Register the sources and resolve the toolbar.
    pub fn into_session(self) -> anyhow::Result<(Session, Vec<Step>)> {
        let mut sources = SourceRegistry::new();
        for spec in self.sources {
            let source = match spec.data {
                Some(data) => DataSource::new(spec.name, data),
                None => DataSource::without_data(spec.name),
            };
            sources.insert(source)?;
        }
        let session = Session::from_config(sources, &self.tools)?;
        Ok((session, self.steps))
    }
}

/// Run the steps in order. A failing step is logged and the next one runs.
pub fn execute(session: &mut Session, steps: &[Step]) -> Vec<StepLog> {
    steps
        .iter()
        .map(|step| execute_step(session, step))
        .collect()
}

fn execute_step(session: &mut Session, step: &Step) -> StepLog {
    match step {
        Step::Checkpoint => run_action(session, ToolAction::Checkpoint),
        Step::Restore => run_action(session, ToolAction::Restore),
        Step::Clear => run_action(session, ToolAction::Clear),
        Step::Set {
            source,
            column,
            value,
        } => {
            let label = format!("set {source}.{column}");
            let result = match session.sources_mut().by_name_mut(source) {
                Some(s) => s
                    .set_column(column.clone(), value.clone())
                    .map(|_| ())
                    .map_err(|e| e.to_string()),
                None => Err(format!("unknown data source `{source}`")),
            };
            match result {
                Ok(()) => StepLog {
                    step: label,
                    ok: true,
                    lines: Vec::new(),
                },
                Err(reason) => {
                    tracing::warn!(step = %label, %reason, "script step failed");
                    StepLog {
                        step: label,
                        ok: false,
                        lines: vec![reason],
                    }
                }
            }
        }
        Step::Print => StepLog {
            step: "print".to_string(),
            ok: true,
            lines: SessionInspector::summary(session.sources(), session.history())
                .iter()
                .map(ToString::to_string)
                .collect(),
        },
    }
}

fn run_action(session: &mut Session, action: ToolAction) -> StepLog {
    let report = session.activate(action);
    StepLog {
        step: action.to_string(),
        ok: report.is_success(),
        lines: report.to_string().lines().map(str::to_string).collect(),
    }
}

/// Live data of every source, keyed by name, for JSON output.
pub fn live_data(session: &Session) -> BTreeMap<String, Option<ColumnData>> {
    session
        .sources()
        .iter()
        .map(|s| (s.name().to_string(), s.data().cloned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SCRIPT: &str = r#"{
        "sources": [
            {"name": "points", "data": {
                "x": {"kind": "int64", "values": [1, 2, 3]},
                "y": {"kind": "values", "values": ["a", "b", "c"]}
            }},
            {"name": "other", "data": {"z": {"kind": "float64", "values": [0.5]}}},
            {"name": "bare"}
        ],
        "tools": {
            "checkpoint": ["points", "bare"],
            "restore": ["points"],
            "clear": ["points"]
        },
        "steps": [
            "checkpoint",
            {"set": {"source": "points", "column": "x", "value": {"kind": "int64", "values": [9, 9, 9]}}},
            "restore",
            "restore",
            "clear",
            {"set": {"source": "ghost", "column": "x", "value": {"kind": "int64", "values": []}}},
            "print"
        ]
    }"#;

    fn write_script(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_and_run_script() {
        let file = write_script(SCRIPT);
        let script = Script::load(file.path()).unwrap();
        assert_eq!(script.steps.len(), 7);

        let (mut session, steps) = script.into_session().unwrap();
        let logs = execute(&mut session, &steps);
        let oks: Vec<bool> = logs.iter().map(|l| l.ok).collect();
        // checkpoint fails for `bare`, the unknown-source set fails.
        assert_eq!(oks, vec![false, true, true, true, true, false, true]);
        assert!(logs[3].lines.iter().any(|l| l.contains("skipped")));

        let data = live_data(&session);
        let points = data["points"].as_ref().unwrap();
        assert_eq!(points["x"], Column::Int64(vec![]));
        assert_eq!(points["y"], Column::Values(vec![]));
        assert_eq!(
            data["other"].as_ref().unwrap()["z"],
            Column::Float64(vec![0.5])
        );
        assert!(data["bare"].is_none());
        assert_eq!(logs[6].lines.len(), 3);
    }

    #[test]
    fn unknown_tool_target_is_rejected() {
        let file = write_script(r#"{"sources": [], "tools": {"clear": ["nope"]}}"#);
        let script = Script::load(file.path()).unwrap();
        assert!(script.into_session().is_err());
    }

    #[test]
    fn duplicate_source_names_are_rejected() {
        let file = write_script(r#"{"sources": [{"name": "a"}, {"name": "a"}]}"#);
        let script = Script::load(file.path()).unwrap();
        assert!(script.into_session().is_err());
    }

    #[test]
    fn malformed_script_reports_path() {
        let file = write_script("{ not json");
        let err = Script::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing script"));
    }
}
