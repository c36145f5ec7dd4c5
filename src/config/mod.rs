pub mod script;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use script::ScriptStep;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "nav-sim")]
#[command(about = "Replay page events against the section navigator and print the final page state")]
pub struct CliConfig {
    /// Path to a TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Session step, repeatable: click:<id>, navigate:<id>, key:[Alt+]<Key>,
    /// resize:<px>, scroll, wait:<ms>, image-load:<src>, image-error:<src>
    #[arg(short = 's', long = "step", value_name = "STEP")]
    pub steps: Vec<ScriptStep>,

    /// Initial viewport width in pixels
    #[arg(long, default_value = "1280")]
    pub width: u32,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}
