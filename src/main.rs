use clap::Parser;

use monarch_money_cli::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    monarch_money_cli::cli::run(cli)
}
