//! Read-only lookup tables consulted while decoding Pokemon.
//!
//! The tables are supplied by the caller (usually loaded from a JSON file) so
//! that other languages or game revisions can be swapped in.

use std::{fs::File, io::BufReader, path::Path};

use serde::Deserialize;

use crate::Result;

pub const NATURE_NAMES: [&str; 25] = [
    "Hardy", "Lonely", "Brave", "Adamant", "Naughty", "Bold", "Docile", "Relaxed", "Impish", "Lax",
    "Timid", "Hasty", "Serious", "Jolly", "Naive", "Modest", "Mild", "Quiet", "Bashful", "Rash",
    "Calm", "Gentle", "Sassy", "Careful", "Quirky",
];

pub const GENDER_RATIO_MALE_ONLY: u8 = 0;
pub const GENDER_RATIO_FEMALE_ONLY: u8 = 254;
pub const GENDER_RATIO_GENDERLESS: u8 = 255;

/// Ability id meaning "no ability in this slot".
pub const ABILITY_NONE: u16 = 0;
/// Ability slots 0 and 1 are regular, anything after is hidden.
pub const NORMAL_ABILITY_SLOTS: usize = 2;

fn default_none() -> String {
    String::from("None")
}

fn default_natures() -> Vec<String> {
    NATURE_NAMES.iter().map(|name| name.to_string()).collect()
}

/// Maps small integer ids to names. Id 0 and ids past the end resolve to `none`.
#[derive(Clone, Debug, Deserialize)]
pub struct NameTable {
    #[serde(default)]
    names: Vec<String>,
    #[serde(default = "default_none")]
    none: String,
}

impl Default for NameTable {
    fn default() -> Self {
        NameTable {
            names: Vec::new(),
            none: default_none(),
        }
    }
}

impl NameTable {
    pub fn new(names: Vec<String>, none: impl Into<String>) -> Self {
        NameTable {
            names,
            none: none.into(),
        }
    }

    pub fn get(&self, id: u16) -> &str {
        match self.names.get(id as usize) {
            Some(name) if id != 0 && !name.is_empty() => name,
            _ => &self.none,
        }
    }

    pub fn none(&self) -> &str {
        &self.none
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthRate {
    #[default]
    MediumFast,
    Erratic,
    Fluctuating,
    MediumSlow,
    Fast,
    Slow,
}

impl GrowthRate {
    /// Total experience needed to reach `level`.
    pub fn experience_for_level(&self, level: u8) -> u32 {
        if level <= 1 {
            return 0;
        }
        let n = i64::from(level.min(100));
        let cube = n * n * n;
        let experience = match self {
            GrowthRate::MediumFast => cube,
            GrowthRate::Fast => 4 * cube / 5,
            GrowthRate::Slow => 5 * cube / 4,
            GrowthRate::MediumSlow => 6 * cube / 5 - 15 * n * n + 100 * n - 140,
            GrowthRate::Erratic => match n {
                2..=49 => cube * (100 - n) / 50,
                50..=67 => cube * (150 - n) / 100,
                68..=97 => cube * ((1911 - 10 * n) / 3) / 500,
                _ => cube * (160 - n) / 100,
            },
            GrowthRate::Fluctuating => match n {
                2..=14 => cube * ((n + 1) / 3 + 24) / 50,
                15..=35 => cube * (n + 14) / 50,
                _ => cube * (n / 2 + 32) / 50,
            },
        };
        experience.max(0) as u32
    }

    pub fn level_for_experience(&self, experience: u32) -> u8 {
        (2..=100)
            .take_while(|level| self.experience_for_level(*level) <= experience)
            .last()
            .unwrap_or(1)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct BaseStats {
    pub gender_ratio: u8,
    /// Ability ids: two regular slots followed by the hidden slot(s).
    #[serde(default)]
    pub abilities: Vec<u16>,
    #[serde(default)]
    pub growth_rate: GrowthRate,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GameData {
    #[serde(default)]
    pub species: NameTable,
    #[serde(default)]
    pub items: NameTable,
    #[serde(default)]
    pub moves: NameTable,
    #[serde(default)]
    pub abilities: NameTable,
    #[serde(default = "default_natures")]
    pub natures: Vec<String>,
    /// Indexed by species id.
    #[serde(default)]
    pub base_stats: Vec<BaseStats>,
}

impl Default for GameData {
    fn default() -> Self {
        GameData {
            species: NameTable::default(),
            items: NameTable::default(),
            moves: NameTable::default(),
            abilities: NameTable::default(),
            natures: default_natures(),
            base_stats: Vec::new(),
        }
    }
}

impl GameData {
    pub fn from_path(p: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(&p)?;
        let data: GameData = serde_json::from_reader(BufReader::new(file))?;
        log::debug!(
            "Loaded game data from {}: {} species, {} items, {} moves, {} abilities",
            p.as_ref().display(),
            data.species.len(),
            data.items.len(),
            data.moves.len(),
            data.abilities.len()
        );
        Ok(data)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn species_name(&self, species: u16) -> &str {
        self.species.get(species)
    }

    pub fn item_name(&self, item: u16) -> &str {
        self.items.get(item)
    }

    pub fn move_name(&self, move_id: u16) -> &str {
        self.moves.get(move_id)
    }

    pub fn ability_name(&self, ability: u16) -> &str {
        self.abilities.get(ability)
    }

    pub fn nature_name(&self, personality_value: u32) -> &str {
        if self.natures.is_empty() {
            return "";
        }
        &self.natures[personality_value as usize % self.natures.len()]
    }

    pub fn base_stats(&self, species: u16) -> Option<&BaseStats> {
        self.base_stats.get(species as usize)
    }
}
