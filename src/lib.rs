use serde::Serialize;

pub mod codec;
pub mod data;
pub mod error;
pub mod layout;
pub mod pokemon;
pub mod save;
pub mod section;
pub mod team;
pub mod text;

pub use data::GameData;
pub use error::{DecodeError, Result};
pub use pokemon::Pokemon;
pub use save::SaveFile;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TrainerId {
    pub public_id: u16,
    pub secret_id: u16,
}

impl From<u32> for TrainerId {
    fn from(value: u32) -> Self {
        TrainerId {
            public_id: (value & 0xffff) as u16,
            secret_id: (value >> 16) as u16,
        }
    }
}
