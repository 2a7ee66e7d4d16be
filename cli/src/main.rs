mod commands;
mod terminal;

use commands::{CommandLine, Commands, notify, probe, run};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init(commands.quiet);
    print::banner(commands.quiet);

    let cfg = commands.config();
    let quiet: bool = commands.quiet;

    match commands.command {
        Commands::Run { events } => {
            print::header("starting notification bridge", quiet);
            run::run(events, &cfg, quiet).await
        }
        Commands::Probe => {
            print::header("probing vcpe manager", quiet);
            probe::probe(&cfg).await
        }
        Commands::Notify { mac, location } => {
            print::header("sending host notification", quiet);
            notify::notify(mac, location, &cfg).await
        }
    }
}
