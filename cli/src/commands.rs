pub mod probe;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use hostprobe_common::config::{Config, DEFAULT_REPORT_FILE};

#[derive(Parser)]
#[command(name = "hostprobe")]
#[command(version, about = "Identify the operating system of many SSH hosts at once.")]
pub struct CommandLine {
    /// File with one HOST:PORT@USER:PASSWORD entry per line
    pub targets: PathBuf,

    /// Where to write the plain-text report
    #[arg(short, long, default_value = DEFAULT_REPORT_FILE, value_name = "PATH")]
    pub output: PathBuf,

    /// Seconds allowed for connecting and authenticating
    #[arg(long, default_value_t = 10, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub connect_timeout: u64,

    /// Seconds allowed for each remote command
    #[arg(long, default_value_t = 30, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub command_timeout: u64,

    /// Maximum number of hosts probed at the same time (default: all of them)
    #[arg(short, long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Do not write the report file
    #[arg(long)]
    pub no_report: bool,

    #[arg(long)]
    pub no_banner: bool,

    /// Less output: -q hides banner and headers, -qq prints only the statistics
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            connect_timeout: Duration::from_secs(self.connect_timeout),
            command_timeout: Duration::from_secs(self.command_timeout),
            concurrency: self.concurrency.filter(|n| *n > 0),
            output: self.output.clone(),
            no_report: self.no_report,
            no_banner: self.no_banner,
            quiet: self.quiet.min(2),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
