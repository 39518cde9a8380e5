//! Simplified ability heuristics.
//!
//! Each supported ability maps to an [`AbilityEffect`]: a handful of optional
//! multipliers and tags that nudge a candidate's offense and risk. The table is
//! plain data; [`AbilityTable::resolve`] applies it in a fixed order.

use crate::rules::ScoringPolicy;
use crate::types::Type;
use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    None,
    Rain,
    Sun,
    Sand,
    Snow,
}

impl Weather {
    /// The element this weather powers up, if any.
    pub fn empowered_type(self) -> Option<Type> {
        match self {
            Weather::Rain => Some(Type::Water),
            Weather::Sun => Some(Type::Fire),
            _ => None,
        }
    }

    /// Only rain and sun cancel each other.
    pub fn opposes(self, other: Weather) -> bool {
        matches!(
            (self, other),
            (Weather::Rain, Weather::Sun) | (Weather::Sun, Weather::Rain)
        )
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Weather::None)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    Electric,
    Grassy,
    Psychic,
    Misty,
}

/// Extra boost for a signature move that only lands when already super-effective.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignatureBonus {
    #[serde(rename = "type")]
    pub move_type: Type,
    pub mult: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AbilityEffect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat_offense: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub atk_by_type: BTreeMap<Type, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stab_boost: Option<f64>,
    #[serde(default, skip_serializing_if = "Weather::is_none")]
    pub weather: Weather,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrain: Option<Terrain>,
    #[serde(default, rename = "signatureSE", skip_serializing_if = "Option::is_none")]
    pub signature_se: Option<SignatureBonus>,
    /// Types the holder takes no damage from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub immune_types: Vec<Type>,
    /// Hit types this ability blunts when the holder is the target.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub negate_types: Vec<Type>,
    /// Risk multipliers keyed by the opposing side's types.
    #[serde(default, alias = "riskModsAgainst", skip_serializing_if = "BTreeMap::is_empty")]
    pub risk_mods: BTreeMap<Type, f64>,
    /// Added to the holder's survivability bonus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_bonus: Option<f64>,
}

impl AbilityEffect {
    pub fn has_any_effect(&self) -> bool {
        self.flat_offense.is_some()
            || !self.atk_by_type.is_empty()
            || self.stab_boost.is_some()
            || !self.weather.is_none()
            || self.terrain.is_some()
            || self.signature_se.is_some()
            || !self.immune_types.is_empty()
            || !self.negate_types.is_empty()
            || !self.risk_mods.is_empty()
            || self.bulk_bonus.is_some()
    }

    fn multipliers(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.flat_offense
            .map(|m| ("flatOffense", m))
            .into_iter()
            .chain(self.atk_by_type.values().map(|&m| ("atkByType", m)))
            .chain(self.stab_boost.map(|m| ("stabBoost", m)))
            .chain(self.signature_se.map(|s| ("signatureSE", s.mult)))
            .chain(self.risk_mods.values().map(|&m| ("riskMods", m)))
    }
}

/// Inputs describing one candidate hit, for ability resolution.
#[derive(Clone, Copy, Debug)]
pub struct HitContext<'a> {
    pub attacker_ability: Option<&'a str>,
    pub attacker_types: &'a [Type],
    pub hit_type: Type,
    pub multiplier: f32,
    pub target_ability: Option<&'a str>,
    pub target_types: &'a [Type],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    pub offense: f64,
    pub risk: f64,
}

/// Ability identifier -> effect. Identifiers are stored lowercase.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityTable {
    entries: BTreeMap<String, AbilityEffect>,
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().to_ascii_lowercase().replace([' ', '_'], "-")
}

impl AbilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let mut table = AbilityTable::new();
        table.insert(
            "drizzle",
            AbilityEffect {
                weather: Weather::Rain,
                atk_by_type: BTreeMap::from([(Type::Water, 1.5)]),
                risk_mods: BTreeMap::from([(Type::Fire, 0.8)]),
                ..Default::default()
            },
        );
        table.insert(
            "drought",
            AbilityEffect {
                weather: Weather::Sun,
                atk_by_type: BTreeMap::from([(Type::Fire, 1.5)]),
                risk_mods: BTreeMap::from([(Type::Water, 0.8)]),
                ..Default::default()
            },
        );
        table.insert(
            "primordial-sea",
            AbilityEffect {
                weather: Weather::Rain,
                atk_by_type: BTreeMap::from([(Type::Water, 1.6)]),
                negate_types: vec![Type::Fire],
                ..Default::default()
            },
        );
        table.insert(
            "desolate-land",
            AbilityEffect {
                weather: Weather::Sun,
                atk_by_type: BTreeMap::from([(Type::Fire, 1.6)]),
                negate_types: vec![Type::Water],
                ..Default::default()
            },
        );
        table.insert(
            "sand-stream",
            AbilityEffect {
                weather: Weather::Sand,
                bulk_bonus: Some(0.1),
                ..Default::default()
            },
        );
        table.insert(
            "snow-warning",
            AbilityEffect {
                weather: Weather::Snow,
                bulk_bonus: Some(0.05),
                ..Default::default()
            },
        );
        table.insert(
            "orichalcum-pulse",
            AbilityEffect {
                weather: Weather::Sun,
                flat_offense: Some(1.3),
                signature_se: Some(SignatureBonus {
                    move_type: Type::Fighting,
                    mult: 1.33,
                }),
                ..Default::default()
            },
        );
        table.insert(
            "hadron-engine",
            AbilityEffect {
                terrain: Some(Terrain::Electric),
                flat_offense: Some(1.3),
                atk_by_type: BTreeMap::from([(Type::Electric, 1.3)]),
                signature_se: Some(SignatureBonus {
                    move_type: Type::Electric,
                    mult: 1.33,
                }),
                ..Default::default()
            },
        );
        table.insert(
            "huge-power",
            AbilityEffect {
                flat_offense: Some(1.5),
                ..Default::default()
            },
        );
        table.insert(
            "adaptability",
            AbilityEffect {
                stab_boost: Some(1.33),
                ..Default::default()
            },
        );

        for (tag, immune) in [
            ("levitate", Type::Ground),
            ("earth-eater", Type::Ground),
            ("flash-fire", Type::Fire),
            ("well-baked-body", Type::Fire),
            ("water-absorb", Type::Water),
            ("storm-drain", Type::Water),
            ("volt-absorb", Type::Electric),
            ("lightning-rod", Type::Electric),
            ("sap-sipper", Type::Grass),
        ] {
            table.insert(
                tag,
                AbilityEffect {
                    immune_types: vec![immune],
                    ..Default::default()
                },
            );
        }
        table
    }

    pub fn insert(&mut self, tag: &str, effect: AbilityEffect) -> Option<AbilityEffect> {
        self.entries.insert(normalize_tag(tag), effect)
    }

    pub fn get(&self, tag: &str) -> Option<&AbilityEffect> {
        self.entries.get(&normalize_tag(tag))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (tag, effect) in &self.entries {
            if tag.is_empty() {
                bail!("Ability table contains an empty identifier");
            }
            if !effect.has_any_effect() {
                bail!("Ability {tag} declares no effect");
            }
            for (field, value) in effect.multipliers() {
                if !value.is_finite() || value <= 0.0 {
                    bail!("Ability {tag} has invalid {field} multiplier {value}");
                }
            }
            if let Some(bonus) = effect.bulk_bonus {
                if !bonus.is_finite() || bonus < 0.0 {
                    bail!("Ability {tag} has invalid bulkBonus {bonus}");
                }
            }
        }
        Ok(())
    }

    /// Applies the attacker's and target's abilities to a baseline offense and
    /// risk. Without a known attacker ability both values pass through.
    pub fn resolve(
        &self,
        policy: &ScoringPolicy,
        ctx: &HitContext<'_>,
        offense: f64,
        risk: f64,
    ) -> Resolution {
        let Some(attacker) = ctx.attacker_ability.and_then(|tag| self.get(tag)) else {
            return Resolution { offense, risk };
        };
        let target = ctx.target_ability.and_then(|tag| self.get(tag));
        let mut offense = offense;
        let mut risk = risk;

        if let Some(flat) = attacker.flat_offense {
            offense *= flat;
        }
        let type_boost = attacker.atk_by_type.get(&ctx.hit_type).copied();
        if let Some(boost) = type_boost {
            offense *= boost;
        }
        if let Some(stab) = attacker.stab_boost {
            offense *= stab;
        }
        if let Some(sig) = attacker.signature_se {
            if sig.move_type == ctx.hit_type
                && f64::from(ctx.multiplier) >= policy.super_effective_threshold
            {
                offense *= sig.mult;
            }
        }

        if let Some(target) = target {
            // Opposing weather undoes the attacker's own boost for its element.
            if attacker.weather.opposes(target.weather)
                && attacker.weather.empowered_type() == Some(ctx.hit_type)
            {
                offense /= type_boost.unwrap_or(1.0);
            }
            if target.negate_types.contains(&ctx.hit_type) {
                offense *= policy.negation_offense_factor;
                risk *= policy.negation_risk_factor;
            }
            for t in ctx.attacker_types {
                if let Some(m) = target.risk_mods.get(t) {
                    risk = (risk * m).round();
                }
            }
        }

        for t in ctx.target_types {
            if let Some(m) = attacker.risk_mods.get(t) {
                risk = (risk * m).round();
            }
        }

        Resolution { offense, risk }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(
        attacker: Option<&'a str>,
        attacker_types: &'a [Type],
        hit_type: Type,
        multiplier: f32,
        target: Option<&'a str>,
        target_types: &'a [Type],
    ) -> HitContext<'a> {
        HitContext {
            attacker_ability: attacker,
            attacker_types,
            hit_type,
            multiplier,
            target_ability: target,
            target_types,
        }
    }

    #[test]
    fn standard_table_is_valid() {
        AbilityTable::standard().validate().unwrap();
    }

    #[test]
    fn tags_are_normalized() {
        let table = AbilityTable::standard();
        assert!(table.contains("Huge Power"));
        assert!(table.contains("PRIMORDIAL_SEA"));
    }

    #[test]
    fn unknown_attacker_ability_passes_through() {
        let table = AbilityTable::standard();
        let policy = ScoringPolicy::default();
        let c = ctx(
            Some("run-away"),
            &[Type::Fire],
            Type::Fire,
            2.0,
            Some("primordial-sea"),
            &[Type::Water],
        );
        let r = table.resolve(&policy, &c, 1.8, 50.0);
        assert_eq!(
            r,
            Resolution {
                offense: 1.8,
                risk: 50.0
            }
        );
    }

    #[test]
    fn signature_bonus_needs_super_effective_hit() {
        let table = AbilityTable::standard();
        let policy = ScoringPolicy::default();
        let se = ctx(
            Some("hadron-engine"),
            &[Type::Electric],
            Type::Electric,
            2.0,
            None,
            &[Type::Water],
        );
        let neutral = ctx(
            Some("hadron-engine"),
            &[Type::Electric],
            Type::Electric,
            1.0,
            None,
            &[Type::Normal],
        );
        let with_bonus = table.resolve(&policy, &se, 1.0, 50.0).offense;
        let without = table.resolve(&policy, &neutral, 1.0, 50.0).offense;
        assert!((with_bonus - 1.3 * 1.3 * 1.33).abs() < 1e-9);
        assert!((without - 1.3 * 1.3).abs() < 1e-9);
    }

    #[test]
    fn opposing_weather_cancels_own_boost() {
        let table = AbilityTable::standard();
        let policy = ScoringPolicy::default();
        let c = ctx(
            Some("drought"),
            &[Type::Fire],
            Type::Fire,
            2.0,
            Some("drizzle"),
            &[Type::Grass],
        );
        let r = table.resolve(&policy, &c, 1.0, 50.0);
        assert!((r.offense - 1.0).abs() < 1e-9);
    }

    #[test]
    fn negation_dampens_offense_and_raises_risk() {
        let table = AbilityTable::standard();
        let policy = ScoringPolicy::default();
        let c = ctx(
            Some("huge-power"),
            &[Type::Fire],
            Type::Fire,
            2.0,
            Some("primordial-sea"),
            &[Type::Water],
        );
        let r = table.resolve(&policy, &c, 1.0, 50.0);
        assert!((r.offense - 1.5 * 0.6).abs() < 1e-9);
        assert!((r.risk - 60.0).abs() < 1e-9);
    }

    #[test]
    fn target_risk_mods_key_on_attacker_types() {
        let mut table = AbilityTable::standard();
        table.insert(
            "test-aura",
            AbilityEffect {
                risk_mods: BTreeMap::from([(Type::Steel, 0.5)]),
                ..Default::default()
            },
        );
        let policy = ScoringPolicy::default();
        let c = ctx(
            Some("huge-power"),
            &[Type::Steel],
            Type::Steel,
            2.0,
            Some("test-aura"),
            &[Type::Rock],
        );
        let r = table.resolve(&policy, &c, 1.0, 75.0);
        assert_eq!(r.risk, 38.0);
    }

    #[test]
    fn attacker_risk_mods_key_on_target_types() {
        let table = AbilityTable::standard();
        let policy = ScoringPolicy::default();
        let c = ctx(
            Some("drizzle"),
            &[Type::Water],
            Type::Water,
            2.0,
            None,
            &[Type::Fire],
        );
        let r = table.resolve(&policy, &c, 1.0, 25.0);
        assert_eq!(r.risk, 20.0);
    }

    #[test]
    fn validation_rejects_empty_and_negative_entries() {
        let mut table = AbilityTable::new();
        table.insert("blank", AbilityEffect::default());
        assert!(table.validate().is_err());

        let mut table = AbilityTable::new();
        table.insert(
            "broken",
            AbilityEffect {
                flat_offense: Some(-1.0),
                ..Default::default()
            },
        );
        assert!(table.validate().is_err());
    }

    #[test]
    fn unknown_weather_fails_to_parse() {
        let raw = r#"{ "odd": { "weather": "fog" } }"#;
        assert!(serde_json::from_str::<AbilityTable>(raw).is_err());
        let raw = r#"{ "calm": { "weather": "rain", "atkByType": { "water": 1.2 } } }"#;
        let table: AbilityTable = serde_json::from_str(raw).unwrap();
        assert_eq!(table.get("calm").unwrap().weather, Weather::Rain);
    }
}
