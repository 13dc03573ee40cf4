use crate::{
    data::GameData,
    layout::{Field, FieldKind, Layout},
    pokemon::{Pokemon, PK3_SIZE_PARTY},
    Result,
};

pub const MAX_TEAM_SIZE: usize = 6;
const TEAM_LIST_LENGTH: usize = MAX_TEAM_SIZE * PK3_SIZE_PARTY;

pub const TEAM_LAYOUT_RSE: Layout = Layout::new(&[
    Field::at("team_size", FieldKind::U32, 0x0234),
    Field::new("pokemon_list", FieldKind::Bytes(TEAM_LIST_LENGTH)),
]);

pub const TEAM_LAYOUT_FRLG: Layout = Layout::new(&[
    Field::at("team_size", FieldKind::U32, 0x0034),
    Field::new("pokemon_list", FieldKind::Bytes(TEAM_LIST_LENGTH)),
]);

#[derive(Clone, Debug)]
pub struct Team {
    pub team_size: u32,
    pub pokemon_list: Vec<u8>,
}

impl Team {
    pub fn from_section_data(section_data: &[u8], layout: Layout) -> Result<Self> {
        let record = layout.decode(section_data)?;
        Ok(Team {
            team_size: record.u32("team_size")?,
            pokemon_list: record.bytes("pokemon_list")?.to_vec(),
        })
    }

    /// Raw PK3 records of the party. A team size larger than the list holds is clamped.
    pub fn entries(&self) -> impl Iterator<Item = &[u8]> {
        let capacity = self.pokemon_list.len() / PK3_SIZE_PARTY;
        let count = (self.team_size as usize).min(capacity);
        if count < self.team_size as usize {
            log::warn!(
                "Team size {} exceeds capacity {capacity}, reading {count}",
                self.team_size
            );
        }
        self.pokemon_list.chunks_exact(PK3_SIZE_PARTY).take(count)
    }

    pub fn decode(&self, data: &GameData) -> Result<Vec<Pokemon>> {
        self.entries()
            .enumerate()
            .map(|(idx, pk3)| {
                log::trace!("Decoding party slot {}", idx + 1);
                Pokemon::from_pk3(pk3, data)
            })
            .collect()
    }
}
