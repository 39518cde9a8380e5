use crate::abilities::AbilityTable;
use crate::types::{SparseChart, TypeChart};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Coarse risk buckets for the worst incoming multiplier. Values are display
/// heuristics; only their ordering matters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RiskPolicy {
    pub quad_weak: f64,
    pub weak: f64,
    pub neutral: f64,
    pub resisted: f64,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        RiskPolicy {
            quad_weak: 100.0,
            weak: 75.0,
            neutral: 50.0,
            resisted: 25.0,
        }
    }
}

impl RiskPolicy {
    pub fn bucket(&self, worst_incoming: f32) -> f64 {
        if worst_incoming >= 4.0 {
            self.quad_weak
        } else if worst_incoming >= 2.0 {
            self.weak
        } else if worst_incoming <= 0.5 {
            self.resisted
        } else {
            self.neutral
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let buckets = [self.resisted, self.neutral, self.weak, self.quad_weak];
        if buckets.iter().any(|v| !(0.0..=100.0).contains(v)) {
            bail!("Risk buckets must lie in [0, 100], got {buckets:?}");
        }
        if !buckets.windows(2).all(|w| w[0] < w[1]) {
            bail!(
                "Risk buckets must increase resisted < neutral < weak < quadWeak, got {buckets:?}"
            );
        }
        Ok(())
    }
}

/// Scoring constants of the ranking heuristic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ScoringPolicy {
    pub super_effective_threshold: f64,
    /// Offensive ratings are divided by this before scoring.
    pub rating_scale: f64,
    pub negation_offense_factor: f64,
    pub negation_risk_factor: f64,
    pub resist_bonus: f64,
    pub neutral_bonus: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy {
            super_effective_threshold: 2.0,
            rating_scale: 100.0,
            negation_offense_factor: 0.6,
            negation_risk_factor: 1.2,
            resist_bonus: 0.15,
            neutral_bonus: 0.05,
        }
    }
}

impl ScoringPolicy {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.super_effective_threshold > 1.0 && self.super_effective_threshold.is_finite()) {
            bail!(
                "superEffectiveThreshold must be above 1, got {}",
                self.super_effective_threshold
            );
        }
        if !(self.rating_scale > 0.0 && self.rating_scale.is_finite()) {
            bail!("ratingScale must be positive, got {}", self.rating_scale);
        }
        if !(0.0..=1.0).contains(&self.negation_offense_factor) {
            bail!(
                "negationOffenseFactor must lie in [0, 1], got {}",
                self.negation_offense_factor
            );
        }
        if !(self.negation_risk_factor >= 1.0 && self.negation_risk_factor.is_finite()) {
            bail!(
                "negationRiskFactor must be at least 1, got {}",
                self.negation_risk_factor
            );
        }
        if self.resist_bonus < self.neutral_bonus || self.neutral_bonus < 0.0 {
            bail!(
                "Survivability bonuses must satisfy resist >= neutral >= 0, got {} / {}",
                self.resist_bonus,
                self.neutral_bonus
            );
        }
        Ok(())
    }
}

/// On-disk rule file. Every section is optional and falls back to the
/// standard rules.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RulesFile {
    #[serde(default)]
    pub chart: Option<SparseChart>,
    #[serde(default)]
    pub abilities: Option<AbilityTable>,
    #[serde(default)]
    pub risk: RiskPolicy,
    #[serde(default)]
    pub scoring: ScoringPolicy,
}

/// The static configuration a ranking engine is built from.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleSet {
    pub chart: TypeChart,
    pub abilities: AbilityTable,
    pub risk: RiskPolicy,
    pub scoring: ScoringPolicy,
}

impl RuleSet {
    pub fn standard() -> Self {
        RuleSet {
            chart: TypeChart::standard(),
            abilities: AbilityTable::standard(),
            risk: RiskPolicy::default(),
            scoring: ScoringPolicy::default(),
        }
    }

    pub fn from_file(file: RulesFile) -> anyhow::Result<Self> {
        let chart = match &file.chart {
            Some(sparse) => TypeChart::from_sparse(sparse).context("Invalid type chart")?,
            None => TypeChart::standard(),
        };
        let rules = RuleSet {
            chart,
            abilities: file.abilities.unwrap_or_else(AbilityTable::standard),
            risk: file.risk,
            scoring: file.scoring,
        };
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.abilities.validate().context("Invalid ability table")?;
        self.risk.validate().context("Invalid risk policy")?;
        self.scoring.validate().context("Invalid scoring policy")?;
        Ok(())
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::standard()
    }
}

pub fn load_rules(path: &Path) -> anyhow::Result<RuleSet> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules file at {}", path.display()))?;
    let parsed: RulesFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
    let rules = RuleSet::from_file(parsed)
        .with_context(|| format!("Rejected rules file {}", path.display()))?;
    info!(
        path = %path.display(),
        abilities = rules.abilities.len(),
        "loaded rule set"
    );
    Ok(rules)
}
