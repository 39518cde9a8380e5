use pokemon_counter_finder::pool::{load_pool, Pool, DEFAULT_SUGGESTIONS};
use pokemon_counter_finder::rules::load_rules;
use pokemon_counter_finder::types::Type;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

fn scratch_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn wrapped_index_skips_malformed_entries() {
    let raw = r#"{
        "version": 1,
        "generatedAt": "2026-01-01T00:00:00Z",
        "count": 4,
        "pokemon": [
            { "name": "Rampardos", "types": ["Rock"], "power": 96, "strong": ["Rock"] },
            { "types": ["Fire"] },
            { "name": "Glitch", "types": ["Plasma"] },
            { "name": "Crowded", "types": ["Fire", "Water", "Grass"] }
        ]
    }"#;
    let pool = Pool::from_json(raw).unwrap();
    assert_eq!(pool.len(), 1);
    assert_eq!(pool.records()[0].name, "Rampardos");
    assert_eq!(pool.records()[0].strong, vec![Type::Rock]);
}

#[test]
fn bare_array_is_accepted() {
    let raw = r#"[
        { "name": "Zapdos", "types": ["electric", "flying"], "rating": 90, "learnedStrong": ["electric"] },
        { "name": "Heatran", "types": ["Fire", "Steel"] }
    ]"#;
    let pool = Pool::from_json(raw).unwrap();
    assert_eq!(pool.len(), 2);
    let zapdos = &pool.records()[0];
    assert_eq!(zapdos.types, vec![Type::Electric, Type::Flying]);
    assert_eq!(zapdos.power, 90.0);
    assert_eq!(zapdos.strong, vec![Type::Electric]);
    // Missing rating falls back to the default
    assert_eq!(pool.records()[1].power, 80.0);
}

#[test]
fn explicit_nulls_fall_back_to_defaults() {
    let raw = r#"[
        { "name": "Onix", "types": ["Rock"], "strong": null },
        { "name": "Sudowoodo", "types": ["Rock"], "isMega": null, "restricted": null },
        { "name": "Nosepass", "types": ["Rock"], "power": null },
        { "name": "Boldore", "types": ["Rock"], "aliases": null },
        { "name": "Lunatone", "types": ["Rock", "Psychic"], "slug": null, "id": null,
          "abilityTag": null, "hiddenAbilityTag": null }
    ]"#;
    let pool = Pool::from_json(raw).unwrap();
    assert_eq!(pool.len(), 5);
    let records = pool.records();
    assert!(records[0].strong.is_empty());
    assert!(!records[1].is_mega && !records[1].restricted);
    assert_eq!(records[2].power, 80.0);
    assert!(records[3].aliases.is_empty());
    assert_eq!(records[4].slug, "lunatone");
    assert_eq!(records[4].effective_ability(), None);
}

#[test]
fn non_pool_documents_are_rejected() {
    assert!(Pool::from_json("{}").is_err());
    assert!(Pool::from_json("not json").is_err());
    assert!(Pool::from_json("[]").unwrap().is_empty());
}

#[test]
fn legacy_field_names_are_understood() {
    let raw = r#"[{
        "name": "Kyogre (Primal)",
        "apiSlug": "kyogre-primal",
        "types": ["Water"],
        "strongMoves": ["Water"],
        "ability": "primordial-sea",
        "isMega": true,
        "restricted": true,
        "aliases": ["Primal Kyogre"]
    }]"#;
    let pool = Pool::from_json(raw).unwrap();
    let kyogre = &pool.records()[0];
    assert_eq!(kyogre.slug, "kyogre-primal");
    assert_eq!(kyogre.ability_tag.as_deref(), Some("primordial-sea"));
    assert!(kyogre.is_mega && kyogre.restricted);
    assert_eq!(pool.find("primal kyogre").unwrap().name, "Kyogre (Primal)");
}

#[test]
fn resolve_carries_hidden_ability() {
    let raw = r#"[{ "name": "Pelipper", "types": ["Water", "Flying"], "hiddenAbilityTag": "drizzle" }]"#;
    let pool = Pool::from_json(raw).unwrap();
    let target = pool.resolve("PELIPPER").unwrap();
    assert_eq!(target.name.as_deref(), Some("Pelipper"));
    assert_eq!(target.types, vec![Type::Water, Type::Flying]);
    assert_eq!(target.ability_tag.as_deref(), Some("drizzle"));
    assert!(pool.resolve("Wingull").is_none());
}

#[test]
fn suggestions_list_prefix_matches_first() {
    let pool = Pool::curated();
    assert_eq!(
        pool.suggest("gar", DEFAULT_SUGGESTIONS),
        vec!["Garchomp", "Garchomp (Mega)"]
    );
    let megas = pool.suggest("mega", DEFAULT_SUGGESTIONS);
    assert_eq!(megas.len(), 8);
    assert_eq!(megas[0], "Tyranitar (Mega)");
    assert_eq!(pool.suggest("mega", 3).len(), 3);
    assert_eq!(pool.suggest("", DEFAULT_SUGGESTIONS).len(), DEFAULT_SUGGESTIONS);
    assert!(pool.suggest("zzz", DEFAULT_SUGGESTIONS).is_empty());
}

#[test]
fn load_pool_reads_from_disk() {
    let file = scratch_file(
        r#"{ "version": 1, "pokemon": [{ "name": "Rillaboom", "types": ["Grass"], "strong": ["Grass"] }] }"#,
    );
    let pool = load_pool(file.path()).unwrap();
    assert_eq!(pool.len(), 1);

    let dir = tempdir().unwrap();
    let err = load_pool(&dir.path().join("missing.json")).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read pool index"));
}

#[test]
fn rules_file_overrides_abilities() {
    let file = scratch_file(
        r#"{
            "abilities": { "tough-claws": { "flatOffense": 1.3 } },
            "scoring": { "neutralBonus": 0.1 }
        }"#,
    );
    let rules = load_rules(file.path()).unwrap();
    assert_eq!(rules.abilities.len(), 1);
    assert!(rules.abilities.contains("Tough Claws"));
    assert_eq!(rules.scoring.neutral_bonus, 0.1);
}

#[test]
fn rules_file_with_unknown_weather_is_rejected() {
    let file = scratch_file(r#"{ "abilities": { "fog-maker": { "weather": "fog" } } }"#);
    let err = load_rules(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse JSON"));
}

#[test]
fn rules_file_with_disordered_risk_is_rejected() {
    let file = scratch_file(r#"{ "risk": { "neutral": 90 } }"#);
    assert!(load_rules(file.path()).is_err());
}
