use std::{collections::HashMap, io::Read, path::Path};

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::Serialize;

use crate::{
    data::GameData,
    layout::{Field, FieldKind, Layout},
    section::{Section, SECTION_SIZE},
    team::{Team, TEAM_LAYOUT_FRLG, TEAM_LAYOUT_RSE},
    DecodeError, Pokemon, Result, TrainerId,
};

pub const GAME_SAVE_DATA_LENGTH: usize = 131072;
pub const SAVE_A_OFFSET: usize = 0x0000;
pub const SAVE_B_OFFSET: usize = 0xE000;
pub const NUMBER_OF_SECTIONS: usize = 14;
pub const SAVE_SLOT_SIZE: usize = NUMBER_OF_SECTIONS * SECTION_SIZE;

pub const TRAINER_INFO_SECTION_ID: u16 = 0;
pub const TEAM_SECTION_ID: u16 = 1;

const TRAINER_INFO_LAYOUT: Layout = Layout::new(&[
    Field::new("player_name", FieldKind::Text(7)),
    Field::new("unused", FieldKind::U8),
    Field::new("player_gender", FieldKind::U8),
    Field::new("unused2", FieldKind::U8),
    Field::new("trainer_id", FieldKind::U32),
    Field::new("hours", FieldKind::U16),
    Field::new("minutes", FieldKind::U8),
    Field::new("seconds", FieldKind::U8),
    Field::new("frames", FieldKind::U8),
    Field::at("game_code", FieldKind::U32, 0x00ac),
]);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GameCode {
    RubySapphire,
    FireRedLeafGreen,
    Emerald,
}

impl GameCode {
    fn from_word(data: u32) -> Self {
        match data {
            0x00 => GameCode::RubySapphire,
            0x01 => GameCode::FireRedLeafGreen,
            // For an Emerald save file, this is actually a security key field
            _ => GameCode::Emerald,
        }
    }

    fn team_layout(&self) -> Layout {
        match self {
            GameCode::RubySapphire | GameCode::Emerald => TEAM_LAYOUT_RSE,
            GameCode::FireRedLeafGreen => TEAM_LAYOUT_FRLG,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive, Serialize)]
pub enum PlayerGender {
    Male = 0,
    Female = 1,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct TimePlayed {
    pub hours: u16,
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u8,
}

#[derive(Clone, Debug, Serialize)]
pub struct TrainerInfo {
    pub player_name: String,
    pub player_gender: Option<PlayerGender>,
    pub id: TrainerId,
    pub time_played: TimePlayed,
}

/// One of the two redundant copies of the game data, with its sections keyed by id.
#[derive(Clone, Debug)]
pub struct SaveSlot {
    offset: usize,
    sections: HashMap<u16, Section>,
    save_index: u32,
}

impl SaveSlot {
    pub fn read(save_data: &[u8], offset: usize) -> Result<Self> {
        let mut sections = HashMap::with_capacity(NUMBER_OF_SECTIONS);
        let mut save_index = 0;

        for idx in 0..NUMBER_OF_SECTIONS {
            let section_offset = offset + idx * SECTION_SIZE;
            let section_data = crate::codec::read_bytes(save_data, section_offset, SECTION_SIZE)?;
            let section = Section::from_bytes(section_data)?;

            save_index = save_index.max(section.save_index);
            if let Some(previous) = sections.insert(section.section_id, section) {
                log::debug!(
                    "Slot 0x{offset:x}: section id {} repeated at 0x{section_offset:x}",
                    previous.section_id
                );
            }
        }

        log::debug!("Save index of slot 0x{offset:x}: {save_index}");
        Ok(SaveSlot {
            offset,
            sections,
            save_index,
        })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn save_index(&self) -> u32 {
        self.save_index
    }

    pub fn section(&self, section_id: u16) -> Result<&Section> {
        self.sections
            .get(&section_id)
            .ok_or(DecodeError::MissingSection {
                slot_offset: self.offset,
                section_id,
            })
    }

    pub fn team_section(&self) -> Result<&Section> {
        self.section(TEAM_SECTION_ID)
    }

    pub fn game_code(&self) -> GameCode {
        match self.trainer_info_record() {
            Some(record) => record
                .u32("game_code")
                .map(GameCode::from_word)
                .unwrap_or(GameCode::RubySapphire),
            None => {
                log::debug!(
                    "Slot 0x{:x} has no trainer section, assuming Ruby/Sapphire layout",
                    self.offset
                );
                GameCode::RubySapphire
            }
        }
    }

    pub fn trainer_info(&self) -> Result<Option<TrainerInfo>> {
        let Some(record) = self.trainer_info_record() else {
            return Ok(None);
        };

        let gender = record.u8("player_gender")?;
        let player_gender = PlayerGender::from_u8(gender);
        if player_gender.is_none() {
            log::warn!("Invalid player gender: 0x{gender:x}");
        }

        Ok(Some(TrainerInfo {
            player_name: record.text("player_name")?.to_owned(),
            player_gender,
            id: TrainerId::from(record.u32("trainer_id")?),
            time_played: TimePlayed {
                hours: record.u16("hours")?,
                minutes: record.u8("minutes")?,
                seconds: record.u8("seconds")?,
                frames: record.u8("frames")?,
            },
        }))
    }

    fn trainer_info_record(&self) -> Option<crate::layout::Record> {
        let section = self.sections.get(&TRAINER_INFO_SECTION_ID)?;
        TRAINER_INFO_LAYOUT.decode(&section.data).ok()
    }

    pub fn team(&self) -> Result<Team> {
        Team::from_section_data(
            &self.team_section()?.data,
            self.game_code().team_layout(),
        )
    }

    /// Logs every section whose stored checksum disagrees with its payload.
    pub fn verify_sections(&self) -> bool {
        let mut section_ids = self.sections.keys().copied().collect::<Vec<_>>();
        section_ids.sort_unstable();

        section_ids.into_iter().fold(true, |all_valid, section_id| {
            let section = &self.sections[&section_id];
            if section.checksum_valid() {
                all_valid
            } else {
                log::warn!(
                    "Checksum 0x{:x} of section {section_id} in slot 0x{:x} does not match",
                    section.checksum,
                    self.offset
                );
                false
            }
        })
    }
}

/// Reads a slot and checks it holds team data. Missing sections only disqualify that slot.
///
/// Only the backup slot may be absent altogether; a buffer too short for the first slot is
/// malformed.
fn read_usable_slot(save_data: &[u8], offset: usize) -> Result<SaveSlot> {
    if offset > SAVE_A_OFFSET && offset >= save_data.len() {
        return Err(DecodeError::MissingSlot {
            slot_offset: offset,
        });
    }
    let slot = SaveSlot::read(save_data, offset)?;
    slot.team_section()?;
    Ok(slot)
}

/// Picks the slot with the strictly greater save index; ties go to `slot_a`.
pub fn select_latest_slot(slot_a: SaveSlot, slot_b: SaveSlot) -> SaveSlot {
    log::debug!("Save Index A: {}", slot_a.save_index);
    log::debug!("Save Index B: {}", slot_b.save_index);
    if slot_b.save_index > slot_a.save_index {
        slot_b
    } else {
        slot_a
    }
}

pub struct SaveFile {
    slot: SaveSlot,
    game_code: GameCode,
    trainer_info: Option<TrainerInfo>,
}

impl SaveFile {
    pub fn new(p: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(&p)?;
        let mut reader = std::io::BufReader::new(file);
        let mut full_contents = Vec::new();
        let read_len = reader.read_to_end(&mut full_contents)?;
        if read_len != GAME_SAVE_DATA_LENGTH {
            log::warn!(
                "Unexpected save file length. Found: {read_len}, Expected: {GAME_SAVE_DATA_LENGTH}"
            );
        }

        Self::from_bytes(&full_contents).map_err(|err| {
            log::error!("Failed to decode {}: {err}", p.as_ref().display());
            err
        })
    }

    pub fn from_bytes(save_data: &[u8]) -> Result<Self> {
        let slot_a = read_usable_slot(save_data, SAVE_A_OFFSET);
        let slot_b = read_usable_slot(save_data, SAVE_B_OFFSET);

        let slot = match (slot_a, slot_b) {
            (Ok(slot_a), Ok(slot_b)) => select_latest_slot(slot_a, slot_b),
            (Err(err), _) | (_, Err(err)) if !err.is_slot_local() => return Err(err),
            (Ok(slot), Err(err)) | (Err(err), Ok(slot)) => {
                log::warn!("Ignoring unusable save slot: {err}");
                slot
            }
            (Err(err), Err(_)) => return Err(err),
        };
        log::debug!("Using save slot at 0x{:x}", slot.offset);

        let game_code = slot.game_code();
        let trainer_info = slot.trainer_info()?;
        Ok(SaveFile {
            slot,
            game_code,
            trainer_info,
        })
    }

    pub fn active_slot(&self) -> &SaveSlot {
        &self.slot
    }

    pub fn get_game_code(&self) -> GameCode {
        self.game_code
    }

    pub fn get_trainer_info(&self) -> Option<&TrainerInfo> {
        self.trainer_info.as_ref()
    }

    pub fn get_team(&self) -> Result<Team> {
        self.slot.team()
    }

    pub fn get_party(&self, data: &GameData) -> Result<Vec<Pokemon>> {
        self.get_team()?.decode(data)
    }

    pub fn verify_sections(&self) -> bool {
        self.slot.verify_sections()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::SECTION_ID_OFFSET;

    fn write_section(save: &mut [u8], slot_offset: usize, idx: usize, id: u16, save_index: u32) {
        let base = slot_offset + idx * SECTION_SIZE;
        save[base + SECTION_ID_OFFSET..base + SECTION_ID_OFFSET + 2]
            .copy_from_slice(&id.to_le_bytes());
        save[base + 0xffc..base + 0x1000].copy_from_slice(&save_index.to_le_bytes());
    }

    fn blank_save() -> Vec<u8> {
        vec![0u8; GAME_SAVE_DATA_LENGTH]
    }

    /// Fills a slot with ids rotated by `rotation`, all carrying `save_index`.
    fn write_slot(save: &mut [u8], slot_offset: usize, rotation: usize, save_index: u32) {
        for idx in 0..NUMBER_OF_SECTIONS {
            let id = ((idx + rotation) % NUMBER_OF_SECTIONS) as u16;
            write_section(save, slot_offset, idx, id, save_index);
        }
    }

    #[test]
    fn test_slot_maps_sections_by_id() {
        let mut save = blank_save();
        write_slot(&mut save, SAVE_A_OFFSET, 5, 9);
        let slot = SaveSlot::read(&save, SAVE_A_OFFSET).unwrap();
        assert_eq!(slot.save_index(), 9);
        assert_eq!(slot.sections.len(), NUMBER_OF_SECTIONS);
        assert_eq!(slot.team_section().unwrap().section_id, TEAM_SECTION_ID);
    }

    #[test]
    fn test_slot_save_index_is_maximum() {
        let mut save = blank_save();
        write_slot(&mut save, SAVE_A_OFFSET, 0, 4);
        write_section(&mut save, SAVE_A_OFFSET, 7, 7, 5);
        let slot = SaveSlot::read(&save, SAVE_A_OFFSET).unwrap();
        assert_eq!(slot.save_index(), 5);
    }

    #[test]
    fn test_missing_team_section() {
        let save = blank_save();
        let slot = SaveSlot::read(&save, SAVE_B_OFFSET).unwrap();
        assert!(matches!(
            slot.team_section(),
            Err(DecodeError::MissingSection {
                slot_offset: SAVE_B_OFFSET,
                section_id: TEAM_SECTION_ID
            })
        ));
    }

    #[test]
    fn test_greater_save_index_wins() {
        for (index_a, index_b, expected) in [
            (8, 2, SAVE_A_OFFSET),
            (2, 8, SAVE_B_OFFSET),
            (6, 6, SAVE_A_OFFSET),
        ] {
            let mut save = blank_save();
            write_slot(&mut save, SAVE_A_OFFSET, 0, index_a);
            write_slot(&mut save, SAVE_B_OFFSET, 3, index_b);
            let save_file = SaveFile::from_bytes(&save).unwrap();
            assert_eq!(save_file.active_slot().offset(), expected);
        }
    }

    #[test]
    fn test_slot_without_team_section_is_skipped() {
        let mut save = blank_save();
        write_slot(&mut save, SAVE_A_OFFSET, 0, 1);
        write_section(&mut save, SAVE_B_OFFSET, 0, 0, 100);
        let save_file = SaveFile::from_bytes(&save).unwrap();
        assert_eq!(save_file.active_slot().offset(), SAVE_A_OFFSET);
    }

    #[test]
    fn test_no_usable_slot() {
        assert!(matches!(
            SaveFile::from_bytes(&blank_save()),
            Err(DecodeError::MissingSection {
                slot_offset: SAVE_A_OFFSET,
                ..
            })
        ));
    }

    #[test]
    fn test_truncated_slot_is_fatal() {
        let mut save = blank_save();
        write_slot(&mut save, SAVE_A_OFFSET, 0, 1);
        save.truncate(SAVE_B_OFFSET + 0x800);
        assert!(matches!(
            SaveFile::from_bytes(&save),
            Err(DecodeError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_absent_second_slot() {
        let mut save = blank_save();
        write_slot(&mut save, SAVE_A_OFFSET, 0, 1);
        save.truncate(SAVE_B_OFFSET);
        let save_file = SaveFile::from_bytes(&save).unwrap();
        assert_eq!(save_file.active_slot().offset(), SAVE_A_OFFSET);
    }

    #[test]
    fn test_trainer_info_and_game_code() {
        let mut save = blank_save();
        write_slot(&mut save, SAVE_A_OFFSET, 0, 1);
        // Section 0 is the first chunk when the slot is not rotated
        save[0..3].copy_from_slice(&[0xcc, 0xbf, 0xbe]);
        save[3] = 0xff;
        save[8] = 1;
        save[10..14].copy_from_slice(&0x0001_3039u32.to_le_bytes());
        save[14..16].copy_from_slice(&12u16.to_le_bytes());
        save[16] = 34;
        save[0xac..0xb0].copy_from_slice(&1u32.to_le_bytes());

        let save_file = SaveFile::from_bytes(&save).unwrap();
        assert_eq!(save_file.get_game_code(), GameCode::FireRedLeafGreen);
        let trainer_info = save_file.get_trainer_info().unwrap();
        assert_eq!(trainer_info.player_name, "RED");
        assert_eq!(trainer_info.player_gender, Some(PlayerGender::Female));
        assert_eq!(trainer_info.id.public_id, 12345);
        assert_eq!(trainer_info.id.secret_id, 1);
        assert_eq!(trainer_info.time_played.hours, 12);
        assert_eq!(trainer_info.time_played.minutes, 34);
    }

    #[test]
    fn test_blank_sections_fail_checksum_only_when_stored_value_differs() {
        let mut save = blank_save();
        write_slot(&mut save, SAVE_A_OFFSET, 0, 1);
        let save_file = SaveFile::from_bytes(&save).unwrap();
        assert!(save_file.verify_sections());

        save[SECTION_SIZE + 0x10] = 1;
        let save_file = SaveFile::from_bytes(&save).unwrap();
        assert!(!save_file.verify_sections());
    }
}
