//! `lessons`: migrate, validate and report on quiz lesson collections.

use clap::Parser;

mod cli;
use cli::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().run()
}
