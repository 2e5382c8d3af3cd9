use anyhow::Result;
use clap::Parser;
use tinkersan::Tinkersan;

fn main() -> Result<()> {
    let cli = Tinkersan::parse();
    let log = tinkersan::logging::init(cli.global.verbose);
    cli.execute(&log)
}
