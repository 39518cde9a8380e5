//! Offline index annotation.
//!
//! Turns pre-fetched species and move dumps into a pool artifact. Nothing here
//! touches the network; fetching the dumps is left to external tooling.

use crate::abilities::AbilityTable;
use crate::model::{AttackerRecord, PoolArtifact, INDEX_VERSION};
use crate::types::Type;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

/// Base power at or above which a move counts as a strong STAB.
pub const STRONG_BASE_POWER: u32 = 70;

/// Signature moves whose reported power is unreliable across generations.
const FORCE_STRONG: [(&str, u32); 2] = [("collision-course", 100), ("electro-drift", 100)];

/// Forms that are never used in battle.
const EXCLUDED_SLUGS: [&str; 6] = [
    "koraidon-limited-build",
    "koraidon-sprinting-build",
    "koraidon-swimming-build",
    "koraidon-gliding-build",
    "miraidon-low-power-mode",
    "miraidon-drive-mode",
];

const DEFAULT_STAT: u32 = 80;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilitySlot {
    pub name: String,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesData {
    pub name: String,
    #[serde(default)]
    pub id: Option<u32>,
    /// Type names in slot order.
    #[serde(default)]
    pub types: Vec<String>,
    /// Base stats keyed by stat name (`attack`, `special-attack`, ...).
    #[serde(default)]
    pub stats: BTreeMap<String, u32>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    /// Learnable move slugs.
    #[serde(default)]
    pub moves: Vec<String>,
    #[serde(default)]
    pub is_legendary: bool,
    #[serde(default)]
    pub is_mythical: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveData {
    pub name: String,
    #[serde(default, rename = "type")]
    pub move_type: Option<String>,
    #[serde(default)]
    pub power: Option<u32>,
}

/// Move slug -> (type, base power) with the forced-strong overrides applied.
pub type MoveIndex = HashMap<String, (Option<Type>, Option<u32>)>;

pub fn move_index(moves: &[MoveData]) -> MoveIndex {
    moves
        .iter()
        .map(|m| {
            let name = m.name.to_ascii_lowercase();
            let forced = FORCE_STRONG
                .iter()
                .find(|(slug, _)| *slug == name)
                .map(|(_, bp)| *bp);
            let move_type = m.move_type.as_deref().and_then(|t| t.parse().ok());
            (name, (move_type, forced.or(m.power)))
        })
        .collect()
}

/// Better attacking stat plus a twelfth of the base stat total.
pub fn offensive_rating(stats: &BTreeMap<String, u32>) -> f64 {
    if stats.is_empty() {
        return f64::from(DEFAULT_STAT);
    }
    let atk = stats.get("attack").copied().unwrap_or(DEFAULT_STAT);
    let spa = stats.get("special-attack").copied().unwrap_or(DEFAULT_STAT);
    let total: u32 = stats.values().sum();
    (f64::from(atk.max(spa)) + f64::from(total) / 12.0).round()
}

/// STAB types for which the learnset holds a move of at least
/// [`STRONG_BASE_POWER`]. Order follows the species' own type order.
pub fn strong_stab_types(types: &[Type], learnset: &[String], moves: &MoveIndex) -> Vec<Type> {
    let mut found = BTreeSet::new();
    for mv in learnset {
        let Some(&(Some(move_type), Some(power))) = moves.get(&mv.to_ascii_lowercase()) else {
            continue;
        };
        if power >= STRONG_BASE_POWER && types.contains(&move_type) {
            found.insert(move_type);
        }
    }
    types.iter().copied().filter(|t| found.contains(t)).collect()
}

/// Regular supported ability first, then hidden, else none.
pub fn pick_ability(abilities: &[AbilitySlot], supported: &AbilityTable) -> Option<String> {
    let is_supported = |slot: &&AbilitySlot| supported.contains(&slot.name);
    abilities
        .iter()
        .filter(|slot| !slot.hidden)
        .find(is_supported)
        .or_else(|| abilities.iter().filter(|slot| slot.hidden).find(is_supported))
        .map(|slot| slot.name.to_ascii_lowercase())
}

pub fn is_mega_slug(slug: &str) -> bool {
    slug.contains("-mega") || slug.contains("-primal")
}

pub fn is_excluded_form(slug: &str) -> bool {
    EXCLUDED_SLUGS.contains(&slug)
}

/// Annotates one species; `None` for excluded forms or unusable typing.
pub fn build_entry(
    species: &SpeciesData,
    moves: &MoveIndex,
    supported: &AbilityTable,
) -> Option<AttackerRecord> {
    let slug = species.name.trim().to_ascii_lowercase();
    if slug.is_empty() || is_excluded_form(&slug) {
        return None;
    }
    let types: Vec<Type> = species
        .types
        .iter()
        .filter_map(|t| t.parse().ok())
        .take(2)
        .collect();
    if types.is_empty() {
        debug!(species = %slug, "dropping species without types");
        return None;
    }
    let strong = strong_stab_types(&types, &species.moves, moves);
    let mut record = AttackerRecord::new(&slug, &types, offensive_rating(&species.stats), &strong)
        .with_slug(&slug);
    record.id = species.id;
    record.ability_tag = pick_ability(&species.abilities, supported);
    record.is_mega = is_mega_slug(&slug);
    record.restricted = species.is_legendary || species.is_mythical;
    Some(record)
}

pub fn build_index(
    species: &[SpeciesData],
    moves: &[MoveData],
    supported: &AbilityTable,
    generated_at: Option<String>,
) -> PoolArtifact {
    let index = move_index(moves);
    let pokemon: Vec<AttackerRecord> = species
        .iter()
        .filter_map(|s| build_entry(s, &index, supported))
        .collect();
    let names: Vec<String> = pokemon
        .iter()
        .map(|p| p.name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    info!(
        species = species.len(),
        moves = moves.len(),
        entries = pokemon.len(),
        "built pool index"
    );
    PoolArtifact {
        version: INDEX_VERSION,
        generated_at,
        count: pokemon.len(),
        names,
        pokemon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_signature_moves_count_as_strong() {
        let index = move_index(&[MoveData {
            name: "Collision-Course".to_string(),
            move_type: Some("fighting".to_string()),
            power: None,
        }]);
        assert_eq!(
            index.get("collision-course"),
            Some(&(Some(Type::Fighting), Some(100)))
        );
    }

    #[test]
    fn excluded_forms_are_skipped() {
        assert!(is_excluded_form("miraidon-drive-mode"));
        assert!(!is_excluded_form("miraidon"));
    }
}
