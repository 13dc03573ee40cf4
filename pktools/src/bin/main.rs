use clap::{Parser, Subcommand};
use pktools::{inspect, team, verify};

#[derive(Parser)]
struct Opts {
    #[command(subcommand)]
    tool: ToolOpts,
}

#[derive(Subcommand)]
enum ToolOpts {
    Inspect(inspect::Opts),
    Team(team::Opts),
    Verify(verify::Opts),
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let opts = Opts::parse();
    let mut stdout = std::io::stdout().lock();
    match opts.tool {
        ToolOpts::Inspect(opts) => inspect::run(opts, &mut stdout),
        ToolOpts::Team(opts) => team::run(opts, &mut stdout),
        ToolOpts::Verify(opts) => verify::run(opts, &mut stdout),
    }
    .map_err(|err| {
        log::error!("Failed to execute command: {err}");
        err
    })
}
