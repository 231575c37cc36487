//! Replay an event script

use super::load_config;
use crate::script::{self, TimedMessage};
use anyhow::{Context, Result};
use clap::Args;
use console::style;
use custform_core::session::FormSession;
use std::path::PathBuf;

/// Arguments for the `run` command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSON file holding an array of `{"at_ms", "event"}` steps
    pub script: PathBuf,

    /// JSON config file; `CUSTFORM_*` variables still apply on top
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Wait out the real delays instead of using a virtual clock
    #[arg(long)]
    pub realtime: bool,
}

pub async fn run_script(args: RunArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let json = tokio::fs::read_to_string(&args.script)
        .await
        .with_context(|| format!("reading script {}", args.script.display()))?;
    let steps = script::parse(&json).context("parsing script")?;

    let mut session = FormSession::new(&config)?;
    let messages = if args.realtime {
        script::replay_realtime(&mut session, steps).await
    } else {
        script::replay(&mut session, &steps)
    };

    for TimedMessage { at_ms, message } in &messages {
        let text = if message.is_empty() {
            style("(no message)".to_string()).dim()
        } else {
            style(message.clone()).yellow()
        };
        println!("{} email: {}", style(format!("[{at_ms:>6}ms]")).dim(), text);
    }
    println!();

    let form = session.customer().form();
    println!("{}", serde_json::to_string_pretty(&form.value())?);
    println!();

    let errors = form.errors();
    if errors.is_empty() {
        println!("{}", style("Form is valid").green());
    } else {
        println!("{}", style("Form is invalid").red().bold());
        for (path, failures) in &errors.controls {
            for failure in failures {
                println!("  {} {}", style(path).bold(), failure);
            }
        }
    }

    Ok(())
}
