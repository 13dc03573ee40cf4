#![allow(dead_code)]

use pkteam::{
    data::{BaseStats, GameData, GrowthRate, NameTable},
    pokemon::{
        compute_checksum, crypt_substructure, get_offset_for_substructure, Substructure,
        PK3_SIZE_BOX, PK3_SIZE_PARTY, SUBSTRUCTURE_OFFSET, SUBSTRUCTURE_SIZE,
    },
    save::{GAME_SAVE_DATA_LENGTH, NUMBER_OF_SECTIONS},
    section::{SECTION_ID_OFFSET, SECTION_SIZE},
};

pub const TEAM_SIZE_OFFSET: usize = 0x234;

/// Encodes letters, digits and spaces, padded with the 0xff terminator.
pub fn encode_text(text: &str, len: usize) -> Vec<u8> {
    let mut out = text
        .bytes()
        .filter_map(|c| match c {
            b' ' => Some(0x00),
            b'0'..=b'9' => Some(0xa1 + (c - b'0')),
            b'A'..=b'Z' => Some(0xbb + (c - b'A')),
            b'a'..=b'z' => Some(0xd5 + (c - b'a')),
            _ => None,
        })
        .take(len)
        .collect::<Vec<_>>();
    out.resize(len, 0xff);
    out
}

/// Plain field values of one party member, before permutation and encryption.
#[derive(Clone, Debug)]
pub struct Pk3Spec {
    pub pid: u32,
    pub otid: u32,
    pub nickname: &'static str,
    pub species: u16,
    pub item: u16,
    pub experience: u32,
    pub friendship: u8,
    pub moves: [u16; 4],
    pub pp: [u8; 4],
    pub evs: [u8; 6],
    pub contest: [u8; 6],
    pub met_location: u8,
    pub iv_egg_ability: u32,
    pub ribbons_obedience: u32,
}

impl Default for Pk3Spec {
    fn default() -> Self {
        Pk3Spec {
            pid: 0,
            otid: 0,
            nickname: "TREECKO",
            species: 1,
            item: 0,
            experience: 0,
            friendship: 70,
            moves: [1, 0, 0, 0],
            pp: [35, 0, 0, 0],
            evs: [0; 6],
            contest: [0; 6],
            met_location: 0,
            iv_egg_ability: 0,
            ribbons_obedience: 0,
        }
    }
}

impl Pk3Spec {
    pub fn encode(&self) -> Vec<u8> {
        let mut pk3 = vec![0u8; PK3_SIZE_PARTY];
        pk3[0..4].copy_from_slice(&self.pid.to_le_bytes());
        pk3[4..8].copy_from_slice(&self.otid.to_le_bytes());
        pk3[8..18].copy_from_slice(&encode_text(self.nickname, 10));
        pk3[18] = 2;
        pk3[20..27].copy_from_slice(&encode_text("MAY", 7));

        let mut growth = Vec::with_capacity(SUBSTRUCTURE_SIZE);
        growth.extend_from_slice(&self.species.to_le_bytes());
        growth.extend_from_slice(&self.item.to_le_bytes());
        growth.extend_from_slice(&self.experience.to_le_bytes());
        growth.extend_from_slice(&[0, self.friendship, 0, 0]);

        let mut attacks = Vec::with_capacity(SUBSTRUCTURE_SIZE);
        self.moves
            .iter()
            .for_each(|move_id| attacks.extend_from_slice(&move_id.to_le_bytes()));
        attacks.extend_from_slice(&self.pp);

        let mut condition = self.evs.to_vec();
        condition.extend_from_slice(&self.contest);

        let mut misc = vec![0, self.met_location, 0, 0];
        misc.extend_from_slice(&self.iv_egg_ability.to_le_bytes());
        misc.extend_from_slice(&self.ribbons_obedience.to_le_bytes());

        let mut region = vec![0u8; PK3_SIZE_BOX - SUBSTRUCTURE_OFFSET];
        for (component, bytes) in [
            (Substructure::Growth, growth),
            (Substructure::Attacks, attacks),
            (Substructure::EvsConditions, condition),
            (Substructure::Miscellaneous, misc),
        ] {
            let offset = get_offset_for_substructure(self.pid, component);
            region[offset..offset + SUBSTRUCTURE_SIZE].copy_from_slice(&bytes);
        }
        pk3[28..30].copy_from_slice(&compute_checksum(&region).to_le_bytes());
        crypt_substructure(&mut region, self.pid ^ self.otid);
        pk3[SUBSTRUCTURE_OFFSET..PK3_SIZE_BOX].copy_from_slice(&region);
        pk3
    }
}

/// Writes a slot whose sections are rotated by `rotation`, with `party` in the team section.
pub fn write_slot(
    save: &mut [u8],
    slot_offset: usize,
    rotation: usize,
    save_index: u32,
    party: &[Pk3Spec],
) {
    for idx in 0..NUMBER_OF_SECTIONS {
        let base = slot_offset + idx * SECTION_SIZE;
        let section_id = ((idx + rotation) % NUMBER_OF_SECTIONS) as u16;
        save[base + SECTION_ID_OFFSET..base + SECTION_ID_OFFSET + 2]
            .copy_from_slice(&section_id.to_le_bytes());
        save[base + 0xffc..base + SECTION_SIZE].copy_from_slice(&save_index.to_le_bytes());

        if section_id == 1 {
            let team_size = base + TEAM_SIZE_OFFSET;
            save[team_size..team_size + 4].copy_from_slice(&(party.len() as u32).to_le_bytes());
            for (slot, pkmn) in party.iter().enumerate() {
                let start = team_size + 4 + slot * PK3_SIZE_PARTY;
                save[start..start + PK3_SIZE_PARTY].copy_from_slice(&pkmn.encode());
            }
        }
    }
}

pub fn blank_save() -> Vec<u8> {
    vec![0u8; GAME_SAVE_DATA_LENGTH]
}

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

pub fn game_data() -> GameData {
    GameData {
        species: NameTable::new(
            names(&["??????????", "Treecko", "Ralts", "Beldum", "Nidoran♂"]),
            "None",
        ),
        items: NameTable::new(names(&["None", "Master Ball", "Leftovers"]), "None"),
        moves: NameTable::new(names(&["-", "Pound", "Leer", "Absorb", "Take Down"]), "-"),
        abilities: NameTable::new(
            names(&[
                "-",
                "Overgrow",
                "Synchronize",
                "Trace",
                "Clear Body",
                "Poison Point",
            ]),
            "-",
        ),
        base_stats: vec![
            BaseStats {
                gender_ratio: 255,
                abilities: vec![],
                growth_rate: GrowthRate::MediumFast,
            },
            BaseStats {
                gender_ratio: 31,
                abilities: vec![1, 0, 0],
                growth_rate: GrowthRate::MediumSlow,
            },
            BaseStats {
                gender_ratio: 127,
                abilities: vec![2, 3, 0],
                growth_rate: GrowthRate::Slow,
            },
            BaseStats {
                gender_ratio: 255,
                abilities: vec![4, 0, 0],
                growth_rate: GrowthRate::Slow,
            },
            BaseStats {
                gender_ratio: 0,
                abilities: vec![5, 0, 0],
                growth_rate: GrowthRate::MediumSlow,
            },
        ],
        ..GameData::default()
    }
}
