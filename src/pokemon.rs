use byteorder::{ByteOrder, LittleEndian};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::Serialize;

use crate::{
    codec,
    data::{BaseStats, GameData, ABILITY_NONE, NORMAL_ABILITY_SLOTS},
    data::{GENDER_RATIO_FEMALE_ONLY, GENDER_RATIO_GENDERLESS, GENDER_RATIO_MALE_ONLY},
    layout::{Field, FieldKind, Layout},
    Result, TrainerId,
};

pub const PK3_SIZE_PARTY: usize = 100;
pub const PK3_SIZE_BOX: usize = 80;
pub const SUBSTRUCTURE_OFFSET: usize = 32;
pub const SUBSTRUCTURE_SIZE: usize = 12;
const ENCRYPTED_REGION_SIZE: usize = PK3_SIZE_BOX - SUBSTRUCTURE_OFFSET;

const NICKNAME_LENGTH: usize = 10;
const OT_NAME_LENGTH: usize = 7;

pub const PK3_HEADER_LAYOUT: Layout = Layout::new(&[
    Field::new("personality_value", FieldKind::U32),
    Field::new("ot_id", FieldKind::U32),
    Field::new("nickname", FieldKind::Text(NICKNAME_LENGTH)),
    Field::new("language", FieldKind::U8),
    Field::new("egg_data", FieldKind::U8),
    Field::new("ot_name", FieldKind::Text(OT_NAME_LENGTH)),
    Field::new("markings", FieldKind::U8),
    Field::new("checksum", FieldKind::U16),
    Field::new("unused", FieldKind::Bytes(2)),
]);

const GROWTH_LAYOUT: Layout = Layout::new(&[
    Field::new("species", FieldKind::U16),
    Field::new("item", FieldKind::U16),
    Field::new("experience", FieldKind::U32),
    Field::new("pp_bonuses", FieldKind::U8),
    Field::new("friendship", FieldKind::U8),
    Field::new("unused", FieldKind::U16),
]);

const ATTACKS_LAYOUT: Layout = Layout::new(&[
    Field::new("move1", FieldKind::U16),
    Field::new("move2", FieldKind::U16),
    Field::new("move3", FieldKind::U16),
    Field::new("move4", FieldKind::U16),
    Field::new("pp1", FieldKind::U8),
    Field::new("pp2", FieldKind::U8),
    Field::new("pp3", FieldKind::U8),
    Field::new("pp4", FieldKind::U8),
]);

const CONDITION_LAYOUT: Layout = Layout::new(&[
    Field::new("hp_ev", FieldKind::U8),
    Field::new("attack_ev", FieldKind::U8),
    Field::new("defense_ev", FieldKind::U8),
    Field::new("speed_ev", FieldKind::U8),
    Field::new("sp_attack_ev", FieldKind::U8),
    Field::new("sp_defense_ev", FieldKind::U8),
    Field::new("coolness", FieldKind::U8),
    Field::new("beauty", FieldKind::U8),
    Field::new("cuteness", FieldKind::U8),
    Field::new("smartness", FieldKind::U8),
    Field::new("toughness", FieldKind::U8),
    Field::new("feel", FieldKind::U8),
]);

const MISC_LAYOUT: Layout = Layout::new(&[
    Field::new("pokerus", FieldKind::U8),
    Field::new("met_location", FieldKind::U8),
    Field::new("origins", FieldKind::U16),
    Field::new("iv_egg_ability", FieldKind::U32),
    Field::new("ribbons_obedience", FieldKind::U32),
]);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Substructure {
    Growth,
    Attacks,
    EvsConditions,
    Miscellaneous,
}

use Substructure::{Attacks as A, EvsConditions as E, Growth as G, Miscellaneous as M};

/// Role stored in each of the four 12 byte slots, indexed by `personality_value % 24`.
#[rustfmt::skip]
pub const SUBSTRUCTURE_ORDER: [[Substructure; 4]; 24] = [
    [G, A, E, M], [G, A, M, E], [G, E, A, M], [G, E, M, A], [G, M, A, E], [G, M, E, A],
    [A, G, E, M], [A, G, M, E], [A, E, G, M], [A, E, M, G], [A, M, G, E], [A, M, E, G],
    [E, G, A, M], [E, G, M, A], [E, A, G, M], [E, A, M, G], [E, M, G, A], [E, M, A, G],
    [M, G, A, E], [M, G, E, A], [M, A, G, E], [M, A, E, G], [M, E, G, A], [M, E, A, G],
];

pub fn substructure_order(personality_value: u32) -> &'static [Substructure; 4] {
    &SUBSTRUCTURE_ORDER[(personality_value % 24) as usize]
}

/// Byte offset of `component` within the 48 byte encrypted region.
pub fn get_offset_for_substructure(personality_value: u32, component: Substructure) -> usize {
    let slot = substructure_order(personality_value)
        .iter()
        .position(|role| *role == component)
        .unwrap_or_else(|| unreachable!("every order row contains all four substructures"));
    slot * SUBSTRUCTURE_SIZE
}

/// XORs every little-endian word of `data` with `key`. Applying it twice restores the input.
pub fn crypt_substructure(data: &mut [u8], key: u32) {
    for word in data.chunks_exact_mut(4) {
        let value = LittleEndian::read_u32(word) ^ key;
        LittleEndian::write_u32(word, value);
    }
}

pub fn compute_checksum(pk3_unencrypted_data_region: &[u8]) -> u16 {
    pk3_unencrypted_data_region
        .chunks_exact(2)
        .map(LittleEndian::read_u16)
        .fold(0u16, |checksum, word| checksum.wrapping_add(word))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive, Serialize)]
pub enum Language {
    Japanese = 1,
    English = 2,
    French = 3,
    Italian = 4,
    German = 5,
    Spanish = 7,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EggData {
    pub is_bad_egg: bool,
    pub has_species: bool,
    pub use_egg_name: bool,
}

impl From<u8> for EggData {
    fn from(value: u8) -> Self {
        EggData {
            is_bad_egg: (value & 0b1) != 0,
            has_species: (value & 0b10) != 0,
            use_egg_name: (value & 0b100) != 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Gender {
    Male,
    Female,
    Genderless,
}

impl Gender {
    /// Short form used in team listings; empty for genderless species.
    pub fn symbol(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Genderless => "",
        }
    }
}

/// One value per battle stat, in save order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatSet {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub speed: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
}

impl StatSet {
    pub fn from_array(values: [u8; 6]) -> Self {
        let [hp, attack, defense, speed, sp_attack, sp_defense] = values;
        StatSet {
            hp,
            attack,
            defense,
            speed,
            sp_attack,
            sp_defense,
        }
    }

    pub fn to_array(&self) -> [u8; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.speed,
            self.sp_attack,
            self.sp_defense,
        ]
    }
}

/// Unpacks the six 5 bit IVs, lowest bits first: HP, Atk, Def, Spe, SpA, SpD.
pub fn unpack_ivs(ivs_egg_ability_blob: u32) -> StatSet {
    let mut ivs = [0u8; 6];
    (0..6).for_each(|idx| ivs[idx] = ((ivs_egg_ability_blob >> (5 * idx)) & 0b11111) as u8);
    StatSet::from_array(ivs)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Growth {
    pub species: u16,
    pub item: u16,
    pub experience: u32,
    pub pp_bonuses: u8,
    pub friendship: u8,
}

impl Growth {
    fn decode(data: &[u8]) -> Result<Self> {
        let record = GROWTH_LAYOUT.decode(data)?;
        Ok(Growth {
            species: record.u16("species")?,
            item: record.u16("item")?,
            experience: record.u32("experience")?,
            pp_bonuses: record.u8("pp_bonuses")?,
            friendship: record.u8("friendship")?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Attacks {
    pub moves: [u16; 4],
    pub pp: [u8; 4],
}

impl Attacks {
    fn decode(data: &[u8]) -> Result<Self> {
        let record = ATTACKS_LAYOUT.decode(data)?;
        Ok(Attacks {
            moves: [
                record.u16("move1")?,
                record.u16("move2")?,
                record.u16("move3")?,
                record.u16("move4")?,
            ],
            pp: [
                record.u8("pp1")?,
                record.u8("pp2")?,
                record.u8("pp3")?,
                record.u8("pp4")?,
            ],
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ContestStats {
    pub coolness: u8,
    pub beauty: u8,
    pub cuteness: u8,
    pub smartness: u8,
    pub toughness: u8,
    pub feel: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub evs: StatSet,
    pub contest: ContestStats,
}

impl Condition {
    fn decode(data: &[u8]) -> Result<Self> {
        let record = CONDITION_LAYOUT.decode(data)?;
        Ok(Condition {
            evs: StatSet {
                hp: record.u8("hp_ev")?,
                attack: record.u8("attack_ev")?,
                defense: record.u8("defense_ev")?,
                speed: record.u8("speed_ev")?,
                sp_attack: record.u8("sp_attack_ev")?,
                sp_defense: record.u8("sp_defense_ev")?,
            },
            contest: ContestStats {
                coolness: record.u8("coolness")?,
                beauty: record.u8("beauty")?,
                cuteness: record.u8("cuteness")?,
                smartness: record.u8("smartness")?,
                toughness: record.u8("toughness")?,
                feel: record.u8("feel")?,
            },
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Misc {
    pub pokerus: u8,
    pub met_location: u8,
    pub origins: u16,
    pub iv_egg_ability: u32,
    pub ribbons_obedience: u32,
}

impl Misc {
    fn decode(data: &[u8]) -> Result<Self> {
        let record = MISC_LAYOUT.decode(data)?;
        Ok(Misc {
            pokerus: record.u8("pokerus")?,
            met_location: record.u8("met_location")?,
            origins: record.u16("origins")?,
            iv_egg_ability: record.u32("iv_egg_ability")?,
            ribbons_obedience: record.u32("ribbons_obedience")?,
        })
    }

    pub fn ivs(&self) -> StatSet {
        unpack_ivs(self.iv_egg_ability)
    }

    pub fn is_egg(&self) -> bool {
        ((self.iv_egg_ability >> 30) & 0b1) != 0
    }

    /// Ability slot selector stored in bits 28-29 of the ribbon word.
    pub fn ability_index(&self) -> usize {
        ((self.ribbons_obedience >> 28) & 0b11) as usize
    }
}

pub fn determine_gender(personality_value: u32, base_stats: Option<&BaseStats>) -> Gender {
    let Some(base_stats) = base_stats else {
        return Gender::Genderless;
    };
    match base_stats.gender_ratio {
        GENDER_RATIO_GENDERLESS => Gender::Genderless,
        GENDER_RATIO_FEMALE_ONLY => Gender::Female,
        GENDER_RATIO_MALE_ONLY => Gender::Male,
        threshold if (personality_value & 0xff) as u8 >= threshold => Gender::Male,
        _ => Gender::Female,
    }
}

pub fn is_shiny(personality_value: u32, trainer_id: TrainerId) -> bool {
    let pid_low = (personality_value & 0xffff) as u16;
    let pid_high = (personality_value >> 16) as u16;
    (trainer_id.public_id ^ trainer_id.secret_id ^ pid_low ^ pid_high) < 8
}

/// Picks the ability id for slot `index`, falling back to the first hidden and then
/// the first regular ability when that slot is empty.
pub fn determine_ability(ability_slots: &[u16], index: usize) -> u16 {
    match ability_slots.get(index) {
        Some(ability) if *ability != ABILITY_NONE => *ability,
        _ => ability_slots
            .iter()
            .skip(NORMAL_ABILITY_SLOTS)
            .chain(ability_slots.iter())
            .copied()
            .find(|ability| *ability != ABILITY_NONE)
            .unwrap_or(ABILITY_NONE),
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Pokemon {
    pub personality_value: u32,
    pub original_trainer_id: TrainerId,
    pub nickname: String,
    pub origin_language: Option<Language>,
    pub egg_data: EggData,
    pub original_trainer_name: String,
    pub markings: u8,
    pub checksum: u16,
    pub checksum_valid: bool,
    pub growth: Growth,
    pub attacks: Attacks,
    pub condition: Condition,
    pub misc: Misc,
    pub species_name: String,
    pub item_name: String,
    pub move_names: [String; 4],
    pub gender: Gender,
    pub nature: String,
    pub shiny: bool,
    pub ivs: StatSet,
    pub ability: u16,
    pub ability_name: String,
    pub level: u8,
}

impl Pokemon {
    /// Decodes a boxed (80 byte) or party (100 byte) record. Bytes past the
    /// encrypted region are ignored.
    pub fn from_pk3(pk3: &[u8], data: &GameData) -> Result<Self> {
        let header = PK3_HEADER_LAYOUT.decode(pk3)?;
        let personality_value = header.u32("personality_value")?;
        let ot_id = header.u32("ot_id")?;
        let original_trainer_id = TrainerId::from(ot_id);

        let language = header.u8("language")?;
        let origin_language = Language::from_u8(language);
        if origin_language.is_none() {
            log::warn!("Unknown origin language {language} for PID 0x{personality_value:08x}");
        }

        let mut region =
            codec::read_bytes(pk3, SUBSTRUCTURE_OFFSET, ENCRYPTED_REGION_SIZE)?.to_vec();
        crypt_substructure(&mut region, personality_value ^ ot_id);

        let checksum = header.u16("checksum")?;
        let checksum_valid = compute_checksum(&region) == checksum;
        if !checksum_valid {
            log::warn!("Checksum mismatch for PID 0x{personality_value:08x}");
        }

        let substructure = |component| {
            let offset = get_offset_for_substructure(personality_value, component);
            &region[offset..offset + SUBSTRUCTURE_SIZE]
        };
        let growth = Growth::decode(substructure(Substructure::Growth))?;
        let attacks = Attacks::decode(substructure(Substructure::Attacks))?;
        let condition = Condition::decode(substructure(Substructure::EvsConditions))?;
        let misc = Misc::decode(substructure(Substructure::Miscellaneous))?;
        log::trace!(
            "Decoded PID 0x{personality_value:08x} with order {:?}",
            substructure_order(personality_value)
        );

        let base_stats = data.base_stats(growth.species);
        if base_stats.is_none() {
            log::warn!("No base stats for species {}", growth.species);
        }
        let ability = base_stats
            .map(|stats| determine_ability(&stats.abilities, misc.ability_index()))
            .unwrap_or(ABILITY_NONE);
        let level = base_stats
            .map(|stats| stats.growth_rate)
            .unwrap_or_default()
            .level_for_experience(growth.experience);

        Ok(Pokemon {
            personality_value,
            original_trainer_id,
            nickname: header.text("nickname")?.to_owned(),
            origin_language,
            egg_data: EggData::from(header.u8("egg_data")?),
            original_trainer_name: header.text("ot_name")?.to_owned(),
            markings: header.u8("markings")?,
            checksum,
            checksum_valid,
            species_name: data.species_name(growth.species).to_owned(),
            item_name: data.item_name(growth.item).to_owned(),
            move_names: attacks
                .moves
                .map(|move_id| data.move_name(move_id).to_owned()),
            gender: determine_gender(personality_value, base_stats),
            nature: data.nature_name(personality_value).to_owned(),
            shiny: is_shiny(personality_value, original_trainer_id),
            ivs: misc.ivs(),
            ability,
            ability_name: data.ability_name(ability).to_owned(),
            level,
            growth,
            attacks,
            condition,
            misc,
        })
    }

    pub fn is_egg(&self) -> bool {
        self.misc.is_egg()
    }
}
