pub mod inspect;
pub mod showdown;
pub mod team;
pub mod verify;

use std::path::Path;

use anyhow::Context;
use pkteam::GameData;

fn load_game_data(data: Option<&Path>) -> anyhow::Result<GameData> {
    match data {
        Some(path) => GameData::from_path(path)
            .with_context(|| format!("Failed to load game data from {}", path.display())),
        None => {
            log::info!("No game data given, names will not be resolved");
            Ok(GameData::default())
        }
    }
}
