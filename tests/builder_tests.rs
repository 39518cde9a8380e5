use pokemon_counter_finder::abilities::AbilityTable;
use pokemon_counter_finder::builder::{
    build_index, is_mega_slug, move_index, offensive_rating, pick_ability, strong_stab_types,
    AbilitySlot, MoveData, SpeciesData,
};
use pokemon_counter_finder::pool::Pool;
use pokemon_counter_finder::types::Type;
use std::collections::BTreeMap;

fn make_stats(pairs: &[(&str, u32)]) -> BTreeMap<String, u32> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn make_move(name: &str, move_type: &str, power: Option<u32>) -> MoveData {
    MoveData {
        name: name.to_string(),
        move_type: Some(move_type.to_string()),
        power,
    }
}

fn make_slot(name: &str, hidden: bool) -> AbilitySlot {
    AbilitySlot {
        name: name.to_string(),
        hidden,
    }
}

fn make_species(name: &str, types: &[&str], moves: &[&str]) -> SpeciesData {
    SpeciesData {
        name: name.to_string(),
        id: None,
        types: types.iter().map(|t| t.to_string()).collect(),
        stats: BTreeMap::new(),
        abilities: Vec::new(),
        moves: moves.iter().map(|m| m.to_string()).collect(),
        is_legendary: false,
        is_mythical: false,
    }
}

fn move_dump() -> Vec<MoveData> {
    vec![
        make_move("earthquake", "ground", Some(100)),
        make_move("dragon-claw", "dragon", Some(80)),
        make_move("dragon-breath", "dragon", Some(60)),
        make_move("fire-fang", "fire", Some(65)),
        make_move("stone-edge", "rock", Some(100)),
        make_move("flamethrower", "fire", Some(90)),
        make_move("air-slash", "flying", Some(75)),
        make_move("swords-dance", "normal", None),
    ]
}

#[test]
fn rating_uses_better_attack_stat_and_total() {
    let garchomp = make_stats(&[
        ("hp", 108),
        ("attack", 130),
        ("defense", 95),
        ("special-attack", 80),
        ("special-defense", 85),
        ("speed", 102),
    ]);
    assert_eq!(offensive_rating(&garchomp), 180.0);
    assert_eq!(offensive_rating(&BTreeMap::new()), 80.0);
}

#[test]
fn strong_types_need_powerful_stab_moves() {
    let index = move_index(&move_dump());
    let types = [Type::Dragon, Type::Ground];
    let learnset: Vec<String> = ["stone-edge", "earthquake", "dragon-claw", "fire-fang"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(
        strong_stab_types(&types, &learnset, &index),
        vec![Type::Dragon, Type::Ground]
    );

    let weak_learnset = vec!["earthquake".to_string(), "dragon-breath".to_string()];
    assert_eq!(
        strong_stab_types(&types, &weak_learnset, &index),
        vec![Type::Ground]
    );
}

#[test]
fn regular_ability_beats_hidden() {
    let table = AbilityTable::standard();
    assert_eq!(
        pick_ability(&[make_slot("sand-stream", false), make_slot("unnerve", true)], &table),
        Some("sand-stream".to_string())
    );
    assert_eq!(
        pick_ability(&[make_slot("keen-eye", false), make_slot("drizzle", true)], &table),
        Some("drizzle".to_string())
    );
    assert_eq!(
        pick_ability(&[make_slot("rough-skin", false), make_slot("sand-veil", true)], &table),
        None
    );
}

#[test]
fn mega_and_primal_slugs_are_flagged() {
    assert!(is_mega_slug("charizard-mega-y"));
    assert!(is_mega_slug("groudon-primal"));
    assert!(!is_mega_slug("meganium"));
}

#[test]
fn index_annotates_and_filters_species() {
    let mut garchomp = make_species(
        "garchomp",
        &["dragon", "ground"],
        &["earthquake", "dragon-claw"],
    );
    garchomp.id = Some(445);
    garchomp.abilities = vec![make_slot("sand-veil", false), make_slot("rough-skin", true)];

    let mut zard = make_species(
        "charizard-mega-y",
        &["fire", "flying"],
        &["flamethrower", "air-slash"],
    );
    zard.abilities = vec![make_slot("drought", false)];

    let mut koraidon = make_species("koraidon-limited-build", &["fighting", "dragon"], &[]);
    koraidon.is_legendary = true;

    let mut mew = make_species("mew", &["psychic"], &[]);
    mew.is_mythical = true;

    let typeless = make_species("missingno", &[], &[]);

    let artifact = build_index(
        &[garchomp, zard, koraidon, mew, typeless],
        &move_dump(),
        &AbilityTable::standard(),
        Some("2026-10-18T00:00:00Z".to_string()),
    );

    assert_eq!(artifact.version, 1);
    assert_eq!(artifact.count, 3);
    assert_eq!(artifact.names, vec!["charizard-mega-y", "garchomp", "mew"]);

    let chomp = &artifact.pokemon[0];
    assert_eq!(chomp.id, Some(445));
    assert_eq!(chomp.strong, vec![Type::Dragon, Type::Ground]);
    assert_eq!(chomp.ability_tag, None);
    assert!(!chomp.is_mega && !chomp.restricted);

    let zard = &artifact.pokemon[1];
    assert!(zard.is_mega);
    assert_eq!(zard.ability_tag.as_deref(), Some("drought"));
    assert_eq!(zard.strong, vec![Type::Fire, Type::Flying]);

    assert!(artifact.pokemon[2].restricted);
    assert!(artifact.pokemon[2].strong.is_empty());
}

#[test]
fn built_index_loads_back_as_a_pool() {
    let species = vec![make_species("garchomp", &["dragon", "ground"], &["earthquake"])];
    let artifact = build_index(&species, &move_dump(), &AbilityTable::standard(), None);
    let json = serde_json::to_string(&artifact).unwrap();
    let pool = Pool::from_json(&json).unwrap();
    assert_eq!(pool.len(), 1);
    let record = &pool.records()[0];
    assert_eq!(record.slug, "garchomp");
    assert_eq!(record.strong, vec![Type::Ground]);
    assert_eq!(record.power, 80.0);
}
