pub mod abilities;
pub mod builder;
pub mod matrix;
pub mod model;
pub mod pool;
pub mod ranking;
pub mod rules;
pub mod types;
pub mod weakness;

use crate::builder::{build_index, MoveData, SpeciesData};
use crate::model::Target;
use crate::pool::{load_pool, Pool};
use crate::ranking::{CounterQuery, CounterReport, Filters, RankingEngine};
use crate::rules::{load_rules, RuleSet};
use crate::types::Defender;
use crate::weakness::WeaknessVector;
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

pub use crate::model::AttackerRecord;
pub use crate::types::{Type, TypeChart};
pub use crate::weakness::weakness_vector;

/// How the CLI picks its target.
#[derive(Debug, Clone)]
pub enum TargetSpec {
    Types(Defender),
    Named(String),
}

#[derive(Debug, Clone)]
pub struct RankOptions {
    pub target: TargetSpec,
    pub ability: Option<String>,
    pub index_path: Option<PathBuf>,
    pub rules_path: Option<PathBuf>,
    pub filters: Filters,
    pub top: Option<usize>,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub enum Command {
    Rank(RankOptions),
    Weakness {
        defender: Defender,
        rules_path: Option<PathBuf>,
    },
    Batch {
        index_path: PathBuf,
        output_path: PathBuf,
        rules_path: Option<PathBuf>,
        filters: Filters,
    },
    BuildIndex {
        species_path: PathBuf,
        moves_path: PathBuf,
        output_path: PathBuf,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} at {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))
}

fn engine_from(rules_path: Option<&Path>) -> anyhow::Result<RankingEngine> {
    let rules = match rules_path {
        Some(path) => load_rules(path)?,
        None => RuleSet::standard(),
    };
    RankingEngine::new(rules)
}

fn pool_from(index_path: Option<&Path>) -> anyhow::Result<Pool> {
    match index_path {
        Some(path) => load_pool(path),
        None => Ok(Pool::curated()),
    }
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Rank(opts) => run_rank(opts),
        Command::Weakness {
            defender,
            rules_path,
        } => {
            let engine = engine_from(rules_path.as_deref())?;
            let vector = engine.weakness_vector(defender.types());
            print!("{}", render_breakdown(&vector));
            Ok(())
        }
        Command::Batch {
            index_path,
            output_path,
            rules_path,
            filters,
        } => {
            let engine = engine_from(rules_path.as_deref())?;
            let pool = load_pool(&index_path)?;
            let rows = matrix::counter_table(&engine, pool.records(), filters);
            matrix::write_csv(&rows, &output_path)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            println!("Wrote {} targets to {}", rows.len(), output_path.display());
            Ok(())
        }
        Command::BuildIndex {
            species_path,
            moves_path,
            output_path,
        } => {
            let species: Vec<SpeciesData> = read_json(&species_path, "species dump")?;
            let moves: Vec<MoveData> = read_json(&moves_path, "move dump")?;
            let generated_at = Some(chrono::Utc::now().to_rfc3339());
            let supported = abilities::AbilityTable::standard();
            let artifact = build_index(&species, &moves, &supported, generated_at);
            let out = serde_json::to_string_pretty(&artifact)?;
            std::fs::write(&output_path, out)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            println!(
                "Wrote {} with {} entries",
                output_path.display(),
                artifact.count
            );
            Ok(())
        }
    }
}

fn run_rank(opts: RankOptions) -> anyhow::Result<()> {
    let engine = engine_from(opts.rules_path.as_deref())?;
    let pool = pool_from(opts.index_path.as_deref())?;
    let mut target = match &opts.target {
        TargetSpec::Types(defender) => Target::from_types(defender.types()),
        TargetSpec::Named(name) => pool.resolve(name).with_context(|| {
            let hints = pool.suggest(name, crate::pool::DEFAULT_SUGGESTIONS);
            if hints.is_empty() {
                format!("Unknown target {name:?}")
            } else {
                format!("Unknown target {name:?} (did you mean: {})", hints.join(", "))
            }
        })?,
    };
    if let Some(tag) = &opts.ability {
        target.ability_tag = Some(tag.clone());
    }
    info!(defender = ?target.types, ability = ?target.ability_tag, pool = pool.len(), "ranking");

    let query = CounterQuery::from(&target).with_filters(opts.filters);
    let mut report = engine.rank(&query, pool.records());
    if let Some(top) = opts.top {
        report.picks.truncate(top);
    }
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&target, &report));
    }
    Ok(())
}

fn join_types(types: &[Type]) -> String {
    if types.is_empty() {
        "-".to_string()
    } else {
        types.iter().map(|t| t.name()).collect::<Vec<_>>().join(" ")
    }
}

pub fn render_breakdown(vector: &WeaknessVector) -> String {
    let b = vector.breakdown();
    let resisted = if b.resisted.is_empty() {
        "-".to_string()
    } else {
        b.resisted
            .iter()
            .map(|e| format!("{} x{}", e.attacking, e.multiplier))
            .collect::<Vec<_>>()
            .join(" ")
    };
    let mut out = String::new();
    let _ = writeln!(out, "x4        {}", join_types(&b.quad));
    let _ = writeln!(out, "x2        {}", join_types(&b.double));
    let _ = writeln!(out, "Neutral   {}", join_types(&b.neutral));
    let _ = writeln!(out, "Resists   {resisted}");
    let _ = writeln!(out, "Immune    {}", join_types(&b.immune));
    out
}

pub fn render_report(target: &Target, report: &CounterReport<'_>) -> String {
    let mut out = String::new();
    let types: Vec<&str> = target.types.iter().map(|t| t.name()).collect();
    let _ = writeln!(
        out,
        "Target: {} [{}]{}",
        target.name.as_deref().unwrap_or("-"),
        types.join("/"),
        target
            .ability_tag
            .as_deref()
            .map(|a| format!(" ({a})"))
            .unwrap_or_default()
    );
    let weak: Vec<String> = report
        .weaknesses
        .iter()
        .map(|w| format!("{} x{}", w.attacking, w.multiplier))
        .collect();
    let _ = writeln!(
        out,
        "Weaknesses: {}",
        if weak.is_empty() { "-".to_string() } else { weak.join(", ") }
    );
    if report.is_empty() {
        let _ = writeln!(out, "No counters found.");
        return out;
    }
    for (rank, pick) in report.picks.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<22} {:<8} x{:<4} dmg {:>3}  risk {:>3}  score {:.3}",
            rank + 1,
            pick.attacker.name,
            pick.hit_type.name(),
            pick.multiplier,
            pick.damage_potential,
            pick.risk,
            pick.display_score()
        );
    }
    out
}
