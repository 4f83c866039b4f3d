use std::{error::Error, fs, path::PathBuf};

use clap::Args;
use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};
use wiimote_emu::{drivers::wiimote::registers::DeviceState, input::target::wiimote::hex_dump};

/// Bytes shown per table row
const ROW_SIZE: usize = 16;

#[derive(Args, Debug, Clone)]
pub struct DumpCommand {
    /// Dump the contents of a save-state instead of the factory defaults
    #[arg(long)]
    pub state: Option<PathBuf>,
    /// Include rows that only contain zeroes
    #[arg(long, default_value_t = false)]
    pub all: bool,
}

#[derive(Tabled)]
struct MemoryRow {
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Offset")]
    offset: String,
    #[tabled(rename = "Data")]
    data: String,
}

pub fn handle_dump(cmd: DumpCommand) -> Result<(), Box<dyn Error>> {
    let mut state = DeviceState::new();
    if let Some(path) = cmd.state.as_ref() {
        let bytes = fs::read(path)?;
        state.load_state(&bytes)?;
    }

    let mut rows = memory_rows("eeprom", state.eeprom(), cmd.all);
    rows.extend(memory_rows("extension", state.extension_registers(), cmd.all));
    let count = rows.len();

    let mut table = Table::new(rows);
    table
        .with(Style::modern_rounded())
        .with(Panel::header("Controller Memory"));
    println!("{table}");
    println!(
        "Reporting mode: {:?} on channel {}",
        state.reporting_mode(),
        state.reporting_channel()
    );
    println!("Showing {count} row(s)");

    Ok(())
}

fn memory_rows(region: &str, data: &[u8], all: bool) -> Vec<MemoryRow> {
    data.chunks(ROW_SIZE)
        .enumerate()
        .filter(|(_, chunk)| all || chunk.iter().any(|b| *b != 0))
        .map(|(index, chunk)| MemoryRow {
            region: region.to_string(),
            offset: format!("{:#06x}", index * ROW_SIZE),
            data: hex_dump(chunk),
        })
        .collect()
}
