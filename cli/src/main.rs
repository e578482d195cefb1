mod commands;
mod terminal;

use commands::{CommandLine, Commands, info, sweep};
use sweepr_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init();

    let cfg = Config {
        quiet: commands.quiet,
        no_banner: commands.no_banner,
        disable_input: commands.no_input,
    };

    print::banner(&cfg);

    match commands.command {
        Commands::Info => {
            print::header("local interfaces", cfg.quiet);
            info::info()
        }
        Commands::Sweep(args) => {
            print::header("getting ready to sweep", cfg.quiet);
            sweep::sweep(args, &cfg).await
        }
    }
}
