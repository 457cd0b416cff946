mod script;

use clap::{Parser, Subcommand};
use colsnap_actions::{Session, SessionInspector, SourceSummary, ToolAction, ToolConfig};
use colsnap_common::{Column, ColumnData};
use colsnap_source::{Channel, DATA_PROPERTY, DataSource, SourceRegistry};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "colsnap",
    about = "Checkpoint, restore and clear columnar data sources"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Walk through checkpoint, edit, restore and clear on a sample source
    Demo,
    /// Run a JSON session script
    Run {
        /// Path to the script
        script: PathBuf,
        /// Print step logs and final data as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct RunOutput<'a> {
    steps: &'a [script::StepLog],
    sources: Vec<SourceSummary>,
    data: BTreeMap<String, Option<ColumnData>>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("colsnap v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "actions: {}",
                ToolAction::ALL.map(|a| a.as_str()).join(", ")
            );
        }
        Commands::Demo => run_demo()?,
        Commands::Run { script: path, json } => {
            let (mut session, steps) = script::Script::load(&path)?.into_session()?;
            let logs = script::execute(&mut session, &steps);

            if json {
                let out = RunOutput {
                    steps: &logs,
                    sources: SessionInspector::summary(session.sources(), session.history()),
                    data: script::live_data(&session),
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for log in &logs {
                    let mark = if log.ok { "ok" } else { "FAILED" };
                    println!("[{mark}] {}", log.step);
                    for line in &log.lines {
                        println!("    {line}");
                    }
                }
            }

            let failed = logs.iter().filter(|l| !l.ok).count();
            if failed > 0 {
                anyhow::bail!("{failed} step(s) failed");
            }
        }
    }

    Ok(())
}

fn run_demo() -> anyhow::Result<()> {
    let mut sources = SourceRegistry::new();
    let id = sources.insert(
        DataSource::new("points", ColumnData::new())
            .with_column("x", vec![1_i64, 2, 3])
            .with_column("y", Column::values(["a", "b", "c"])),
    )?;
    let mut session = Session::from_config(sources, &ToolConfig::uniform(["points"]))?;

    if let Some(source) = session.sources_mut().get_mut(id) {
        source.subscribe(Channel::Change, |event| {
            println!("  <- {event:?}");
            Ok(())
        });
        source.subscribe(Channel::Property(DATA_PROPERTY.into()), |event| {
            println!("  <- {event:?}");
            Ok(())
        });
    }

    let show = |session: &Session, label: &str| -> anyhow::Result<()> {
        let data = session.sources().get(id).and_then(DataSource::data);
        println!(
            "{label}: data={} history={}",
            serde_json::to_string(&data)?,
            session.history().depth(id)
        );
        Ok(())
    };

    show(&session, "Initial")?;

    println!("{}", session.activate(ToolAction::Checkpoint));
    show(&session, "After checkpoint")?;

    if let Some(source) = session.sources_mut().get_mut(id) {
        source.set_column("x", Column::Int64(vec![9, 9, 9]))?;
    }
    show(&session, "After edit")?;

    println!("{}", session.activate(ToolAction::Restore));
    show(&session, "After restore")?;

    println!("{}", session.activate(ToolAction::Clear));
    show(&session, "After clear")?;

    println!("{}", session.activate(ToolAction::Restore));
    show(&session, "After restore on empty history")?;

    Ok(())
}
