use clap::Args;
use pkteam::SaveFile;
use std::{io::Write, path::PathBuf};

use crate::load_game_data;

#[derive(Debug, Args)]
pub struct Opts {
    #[arg(short, long)]
    pub sav: PathBuf,
    #[arg(short, long)]
    pub data: Option<PathBuf>,
    /// Print the decoded party as JSON instead of debug output.
    #[arg(long)]
    pub json: bool,
}

pub fn run(opts: Opts, out: &mut impl Write) -> anyhow::Result<()> {
    let data = load_game_data(opts.data.as_deref())?;
    let save_file = SaveFile::new(&opts.sav)?;
    let party = save_file.get_party(&data)?;

    if opts.json {
        let report = serde_json::json!({
            "slot_offset": save_file.active_slot().offset(),
            "save_index": save_file.active_slot().save_index(),
            "game": save_file.get_game_code(),
            "trainer": save_file.get_trainer_info(),
            "party": party,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    writeln!(
        out,
        "Save slot 0x{:x} (save index {}), game {:?}",
        save_file.active_slot().offset(),
        save_file.active_slot().save_index(),
        save_file.get_game_code()
    )?;
    if let Some(trainer_info) = save_file.get_trainer_info() {
        writeln!(out, "Trainer Info: {trainer_info:?}")?;
    }
    for (idx, pkmn) in party.iter().enumerate() {
        writeln!(out, "Slot {}: {pkmn:?}", idx + 1)?;
    }

    Ok(())
}
