use clap::Args;
use pkteam::SaveFile;
use std::{io::Write, path::PathBuf};

use crate::{load_game_data, showdown};

#[derive(Debug, Args)]
pub struct Opts {
    #[arg(short, long)]
    pub sav: PathBuf,
    /// JSON file with species, item, move, ability and base stat tables.
    #[arg(short, long)]
    pub data: PathBuf,
}

pub fn run(opts: Opts, out: &mut impl Write) -> anyhow::Result<()> {
    let data = load_game_data(Some(&opts.data))?;
    let save_file = SaveFile::new(&opts.sav)?;
    let party = save_file.get_party(&data)?;
    log::info!(
        "Decoded {} party members from {}",
        party.len(),
        opts.sav.display()
    );

    writeln!(out, "{}", showdown::format_team(&party, &data))?;
    Ok(())
}
