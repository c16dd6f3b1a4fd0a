mod commands;
mod report;
mod terminal;

use commands::{CommandLine, probe};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging();

    let cfg = commands.to_config();
    print::banner(cfg.no_banner, cfg.quiet);
    print::header("getting ready to probe", cfg.quiet);

    probe::probe(&commands.targets, &cfg).await?;

    if cfg.quiet == 0 {
        print::end_of_program();
    }
    Ok(())
}
