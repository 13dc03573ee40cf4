use clap::Args;
use pkteam::{GameData, SaveFile};
use std::{io::Write, path::PathBuf};

#[derive(Debug, Args)]
pub struct Opts {
    #[arg(short, long)]
    pub sav: PathBuf,
    /// Fail when any checksum does not match.
    #[arg(long)]
    pub strict: bool,
}

pub fn run(opts: Opts, out: &mut impl Write) -> anyhow::Result<()> {
    let save_file = SaveFile::new(&opts.sav)?;
    let sections_valid = save_file.verify_sections();

    // Names are irrelevant here, only the entry checksums are reported
    let party = save_file.get_party(&GameData::default())?;
    let invalid_entries = party
        .iter()
        .enumerate()
        .filter(|(_, pkmn)| !pkmn.checksum_valid)
        .map(|(idx, _)| idx + 1)
        .collect::<Vec<_>>();

    if sections_valid {
        writeln!(out, "Sections: OK")?;
    } else {
        writeln!(out, "Sections: checksum mismatch")?;
    }
    if invalid_entries.is_empty() {
        writeln!(out, "Party: OK")?;
    } else {
        writeln!(out, "Party: checksum mismatch in slots {invalid_entries:?}")?;
    }

    if opts.strict && (!sections_valid || !invalid_entries.is_empty()) {
        anyhow::bail!("Checksum verification failed for {}", opts.sav.display());
    }
    Ok(())
}
