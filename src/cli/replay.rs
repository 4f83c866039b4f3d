use std::{error::Error, fs, path::PathBuf};

use clap::Args;
use wiimote_emu::{config::Session, replay::Replayer};

#[derive(Args, Debug, Clone)]
pub struct ReplayCommand {
    /// Path to the session YAML file
    pub session: String,
    /// Restore the controller from a save-state before replaying
    #[arg(long)]
    pub load_state: Option<PathBuf>,
    /// Write a save-state of the controller after replaying
    #[arg(long)]
    pub save_state: Option<PathBuf>,
}

pub fn handle_replay(cmd: ReplayCommand) -> Result<(), Box<dyn Error>> {
    let session = Session::from_yaml_file(cmd.session)?;
    let mut replayer = Replayer::new();

    if let Some(path) = cmd.load_state.as_ref() {
        log::info!("Loading state from {}", path.display());
        let bytes = fs::read(path)?;
        replayer.device_mut().load_state(&bytes)?;
    }

    let events = replayer.run(&session)?;
    for event in events.iter() {
        println!("{event}");
    }
    println!("Replayed {} step(s), {} event(s)", session.steps.len(), events.len());

    if let Some(path) = cmd.save_state.as_ref() {
        log::info!("Saving state to {}", path.display());
        fs::write(path, replayer.device().save_state())?;
    }

    Ok(())
}
