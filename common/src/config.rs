use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_REPORT_FILE: &str = "os.txt";

#[derive(Debug, Clone)]
pub struct Config {
    /// Upper bound for TCP connect, SSH handshake and authentication.
    pub connect_timeout: Duration,
    /// Upper bound for every channel operation once authenticated
    /// (opening a session, running a command, reading its output).
    pub command_timeout: Duration,
    /// Maximum number of probes in flight. `None` probes every target at once.
    pub concurrency: Option<usize>,
    /// Where the plain-text report is written.
    pub output: PathBuf,
    /// Skips writing the report file entirely.
    pub no_report: bool,
    pub no_banner: bool,
    /// 0 prints everything, 1 hides banner and headers, 2 prints only statistics.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            concurrency: None,
            output: PathBuf::from(DEFAULT_REPORT_FILE),
            no_report: false,
            no_banner: false,
            quiet: 0,
        }
    }
}
