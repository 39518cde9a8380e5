//! Counter ranking.
//!
//! For a target typing, every pool candidate that owns a super-effective strong
//! STAB gets an offense score (hit multiplier times rating, adjusted by
//! abilities) and a coarse risk bucket from the worst STAB the target can throw
//! back. Picks are sorted by offense plus a small survivability bonus.
//!
//! The engine is pure: it holds only its immutable [`RuleSet`] and every call
//! recomputes from scratch, so it can be shared freely across threads.

use crate::abilities::{HitContext, Resolution};
use crate::model::{AttackerRecord, Target};
use crate::rules::RuleSet;
use crate::types::Type;
use crate::weakness::{weakness_vector, TypeMultiplier, WeaknessVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Filters {
    pub allow_restricted: bool,
    pub show_mega: bool,
}

impl Default for Filters {
    fn default() -> Self {
        Filters {
            allow_restricted: true,
            show_mega: true,
        }
    }
}

impl Filters {
    pub fn admits(&self, record: &AttackerRecord) -> bool {
        (self.allow_restricted || !record.restricted) && (self.show_mega || !record.is_mega)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterQuery {
    pub target_types: Vec<Type>,
    pub target_ability: Option<String>,
    pub filters: Filters,
}

impl CounterQuery {
    pub fn new(target_types: &[Type]) -> Self {
        CounterQuery {
            target_types: target_types.to_vec(),
            ..Default::default()
        }
    }

    pub fn with_ability(mut self, tag: &str) -> Self {
        self.target_ability = Some(tag.to_string());
        self
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }
}

impl From<&Target> for CounterQuery {
    fn from(target: &Target) -> Self {
        CounterQuery {
            target_types: target.types.clone(),
            target_ability: target.ability_tag.clone(),
            filters: Filters::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPick<'a> {
    pub attacker: &'a AttackerRecord,
    pub hit_type: Type,
    #[serde(rename = "mult")]
    pub multiplier: f32,
    /// Ability-adjusted offense before the survivability bonus.
    pub offense: f64,
    /// Worst multiplier the target's STABs deal to this candidate.
    pub incoming: f32,
    /// Offense relative to the strongest pick of this result, 0-100.
    pub damage_potential: u8,
    pub risk: u8,
    pub score: f64,
}

impl RankedPick<'_> {
    pub fn display_score(&self) -> f64 {
        (self.score * 1000.0).round() / 1000.0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CounterReport<'a> {
    pub weaknesses: Vec<TypeMultiplier>,
    pub picks: Vec<RankedPick<'a>>,
}

impl CounterReport<'_> {
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct RankingEngine {
    rules: RuleSet,
}

impl RankingEngine {
    /// Builds an engine over `rules`, rejecting an inconsistent rule set up
    /// front so queries never see one.
    pub fn new(rules: RuleSet) -> anyhow::Result<Self> {
        rules.validate()?;
        Ok(RankingEngine { rules })
    }

    pub fn standard() -> Self {
        RankingEngine {
            rules: RuleSet::standard(),
        }
    }

    pub fn weakness_vector(&self, defender: &[Type]) -> WeaknessVector {
        weakness_vector(&self.rules.chart, defender)
    }

    /// Ranks `pool` against the query's target. An empty target, an empty or
    /// fully-filtered pool, or a pool with no super-effective STAB all yield an
    /// empty pick list.
    pub fn rank<'p>(&self, query: &CounterQuery, pool: &'p [AttackerRecord]) -> CounterReport<'p> {
        if query.target_types.is_empty() {
            return CounterReport::default();
        }
        let weaknesses = self.weakness_vector(&query.target_types);
        let target_ability = query.target_ability.as_deref();

        let mut picks: Vec<RankedPick<'p>> = pool
            .iter()
            .filter(|r| r.is_well_formed() && query.filters.admits(r))
            .filter_map(|r| self.score_candidate(r, &weaknesses, query, target_ability))
            .collect();

        let top_offense = picks.iter().map(|p| p.offense).fold(0.0, f64::max);
        for pick in &mut picks {
            pick.damage_potential = if top_offense > 0.0 {
                (pick.offense / top_offense * 100.0).round().clamp(0.0, 100.0) as u8
            } else {
                0
            };
        }
        // Stable: equal scores keep pool order.
        picks.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            defender = ?query.target_types,
            pool = pool.len(),
            picks = picks.len(),
            "ranked counters"
        );
        CounterReport {
            weaknesses: weaknesses.super_effective(),
            picks,
        }
    }

    fn score_candidate<'p>(
        &self,
        attacker: &'p AttackerRecord,
        weaknesses: &WeaknessVector,
        query: &CounterQuery,
        target_ability: Option<&str>,
    ) -> Option<RankedPick<'p>> {
        let scoring = &self.rules.scoring;
        let (hit_type, multiplier) = self.best_hit(&attacker.strong, weaknesses)?;
        let attacker_ability = attacker.effective_ability();

        let incoming = self.worst_incoming(attacker, &query.target_types);
        let risk = self.rules.risk.bucket(incoming);
        let offense = f64::from(multiplier) * (attacker.power / scoring.rating_scale);

        let ctx = HitContext {
            attacker_ability,
            attacker_types: &attacker.types,
            hit_type,
            multiplier,
            target_ability,
            target_types: &query.target_types,
        };
        let Resolution { mut offense, risk } =
            self.rules.abilities.resolve(scoring, &ctx, offense, risk);

        let target_effect = target_ability.and_then(|tag| self.rules.abilities.get(tag));
        if target_effect.is_some_and(|e| e.immune_types.contains(&hit_type)) {
            offense = 0.0;
        }

        let mut survivability = if incoming <= 0.5 {
            scoring.resist_bonus
        } else if incoming == 1.0 {
            scoring.neutral_bonus
        } else {
            0.0
        };
        if let Some(bulk) = attacker_ability
            .and_then(|tag| self.rules.abilities.get(tag))
            .and_then(|e| e.bulk_bonus)
        {
            survivability += bulk;
        }

        Some(RankedPick {
            attacker,
            hit_type,
            multiplier,
            offense,
            incoming,
            damage_potential: 0,
            risk: risk.round().clamp(0.0, 100.0) as u8,
            score: offense + survivability,
        })
    }

    /// Highest super-effective multiplier among the strong types; on a tie the
    /// earlier strong type wins.
    fn best_hit(&self, strong: &[Type], weaknesses: &WeaknessVector) -> Option<(Type, f32)> {
        let threshold = self.rules.scoring.super_effective_threshold;
        let mut best: Option<(Type, f32)> = None;
        for &t in strong {
            let m = weaknesses[t];
            if f64::from(m) < threshold {
                continue;
            }
            if best.map_or(true, |(_, best_m)| m > best_m) {
                best = Some((t, m));
            }
        }
        best
    }

    /// Worst-case multiplier of the target's own types used as attacks against
    /// the candidate. Types the candidate's ability is immune to count as 0.
    fn worst_incoming(&self, attacker: &AttackerRecord, target_types: &[Type]) -> f32 {
        let immune: &[Type] = attacker
            .effective_ability()
            .and_then(|tag| self.rules.abilities.get(tag))
            .map(|e| e.immune_types.as_slice())
            .unwrap_or(&[]);
        target_types
            .iter()
            .map(|&stab| {
                if immune.contains(&stab) {
                    0.0
                } else {
                    self.rules.chart.multiplier(stab, &attacker.types)
                }
            })
            .fold(0.0, f32::max)
    }
}
