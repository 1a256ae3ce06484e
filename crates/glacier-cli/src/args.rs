//! Command-line interface definitions using clap.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Terminal front end for the Glacier automation architect
///
/// Describe an automation in plain language and Glacier synthesizes a
/// workflow plan of triggers, conditions and actions. While the plan is being
/// generated a short status narration is shown; once ready, the plan can be
/// played back to visualize how data flows between its steps.
#[derive(Parser)]
#[command(version, about, name = "glacier")]
pub struct Args {
    /// Path to a YAML configuration file. Defaults to
    /// $XDG_CONFIG_HOME/glacier/config.yaml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize a workflow plan from a description
    #[command(alias = "s")]
    Synthesize(SynthesizeArgs),
    /// Talk to Glacier support
    #[command(alias = "c")]
    Chat(ChatArgs),
    /// Print the resolved configuration as YAML
    Config,
}

/// Synthesize a workflow plan
///
/// Without `--plan-file` the plan is generated by the Gemini API, which needs
/// the API key environment variable named in the configuration
/// (GEMINI_API_KEY by default).
#[derive(ClapArgs)]
pub struct SynthesizeArgs {
    /// Plain language description of the automation
    pub prompt: String,

    /// Replay the plan stored in this JSON file instead of calling the API
    #[arg(long)]
    pub plan_file: Option<PathBuf>,

    /// Simulated generation latency for --plan-file, in milliseconds
    #[arg(long, default_value_t = 0, requires = "plan_file")]
    pub latency_ms: u64,

    /// Fail the synthesis after this many milliseconds. Overrides the
    /// configuration
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Run the playback animation for this many milliseconds once the plan is
    /// ready and print the resulting frames
    #[arg(long)]
    pub playback_ms: Option<u64>,
}

/// Send messages to the support chat
#[derive(ClapArgs)]
pub struct ChatArgs {
    /// Messages to send in order. Read from stdin, one per line, when none
    /// are given
    pub messages: Vec<String>,
}
