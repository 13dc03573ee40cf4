//! Renders a decoded party in the plain-text team format used by battle simulators.

use pkteam::{pokemon::StatSet, GameData, Pokemon};

const MAX_IV: u8 = 31;
const MAX_LEVEL: u8 = 100;
const STAT_LABELS: [&str; 6] = ["HP", "Atk", "Def", "Spe", "SpA", "SpD"];

pub fn format_team(party: &[Pokemon], data: &GameData) -> String {
    party
        .iter()
        .map(|pkmn| format_pokemon(pkmn, data))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_pokemon(pkmn: &Pokemon, data: &GameData) -> String {
    [
        Some(format_header(pkmn, data)),
        Some(format!("Ability: {}", pkmn.ability_name)),
        (pkmn.level != MAX_LEVEL).then(|| format!("Level: {}", pkmn.level)),
        pkmn.shiny.then(|| String::from("Shiny: Yes")),
        format_stats("EVs", &pkmn.condition.evs),
        Some(format!("{} Nature", pkmn.nature)),
        (pkmn.ivs.to_array() != [MAX_IV; 6])
            .then(|| format_stats("IVs", &pkmn.ivs))
            .flatten(),
        format_moves(pkmn, data),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join("\n")
}

fn format_header(pkmn: &Pokemon, data: &GameData) -> String {
    let mut header = format!("{} ({})", pkmn.nickname, pkmn.species_name);
    let gender = pkmn.gender.symbol();
    if !gender.is_empty() {
        header.push_str(&format!(" ({gender})"));
    }
    if pkmn.item_name != data.items.none() {
        header.push_str(&format!(" @ {}", pkmn.item_name));
    }
    header
}

/// Lists the non-zero stats, or nothing when all are zero.
fn format_stats(label: &str, stats: &StatSet) -> Option<String> {
    let listed = stats
        .to_array()
        .iter()
        .zip(STAT_LABELS)
        .filter(|(value, _)| **value != 0)
        .map(|(value, stat)| format!("{value} {stat}"))
        .collect::<Vec<_>>();
    if listed.is_empty() {
        None
    } else {
        Some(format!("{label}: {}", listed.join(" / ")))
    }
}

fn format_moves(pkmn: &Pokemon, data: &GameData) -> Option<String> {
    let moves = pkmn
        .move_names
        .iter()
        .filter(|name| name.as_str() != data.moves.none())
        .map(|name| format!("- {name}"))
        .collect::<Vec<_>>();
    (!moves.is_empty()).then(|| moves.join("\n"))
}
