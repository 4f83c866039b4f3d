pub mod dump;
pub mod replay;

use std::error::Error;

use clap::{Parser, Subcommand};
use dump::{handle_dump, DumpCommand};
use replay::{handle_replay, ReplayCommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Replay a recorded host session against an emulated controller
    Replay(ReplayCommand),
    /// Show the memory contents of an emulated controller
    Dump(DumpCommand),
}

pub fn main_cli(args: Args) -> Result<(), Box<dyn Error>> {
    let Some(cmd) = args.cmd else {
        return Ok(());
    };

    match cmd {
        Commands::Replay(cmd) => handle_replay(cmd)?,
        Commands::Dump(cmd) => handle_dump(cmd)?,
    }

    Ok(())
}
