use clap::Parser;
use gclog::runtime::{boot, cli::Cli};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    boot::init_logging();
    boot::run(cli)?;
    Ok(())
}
