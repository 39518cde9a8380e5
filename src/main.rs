use pokemon_counter_finder::ranking::Filters;
use pokemon_counter_finder::types::Defender;
use pokemon_counter_finder::{run, Command, RankOptions, TargetSpec};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!(
        "Usage:
  pokemon-counter-finder rank (--types T1[,T2] | --target NAME) [--ability TAG] [--index index.json] \
[--rules rules.json] [--no-restricted] [--no-mega] [--top N] [--json]
  pokemon-counter-finder weakness --types T1[,T2] [--rules rules.json]
  pokemon-counter-finder batch --index index.json --output counters.csv [--rules rules.json] [--no-restricted] [--no-mega]
  pokemon-counter-finder build-index --species species.json --moves moves.json --output index.json"
    );
    std::process::exit(1);
}

#[derive(Default)]
struct RawArgs {
    types: Option<Defender>,
    target: Option<String>,
    ability: Option<String>,
    index: Option<PathBuf>,
    rules: Option<PathBuf>,
    output: Option<PathBuf>,
    species: Option<PathBuf>,
    moves: Option<PathBuf>,
    filters: Filters,
    top: Option<usize>,
    json: bool,
}

fn parse_flags(mut args: impl Iterator<Item = String>) -> anyhow::Result<RawArgs> {
    let mut raw = RawArgs::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--types" => {
                let val = args.next().ok_or_else(|| {
                    anyhow::anyhow!("--types requires 1 or 2 types (e.g. --types fire,flying)")
                })?;
                raw.types = Some(val.parse()?);
            }
            "--target" => {
                raw.target = Some(
                    args.next()
                        .ok_or_else(|| anyhow::anyhow!("--target requires a name"))?,
                );
            }
            "--ability" => {
                raw.ability = Some(
                    args.next()
                        .ok_or_else(|| anyhow::anyhow!("--ability requires an ability tag"))?,
                );
            }
            "--index" => {
                raw.index = Some(args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--index requires a path (e.g. --index index.json)")
                })?);
            }
            "--rules" => {
                raw.rules = Some(args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--rules requires a path (e.g. --rules rules.json)")
                })?);
            }
            "--output" => {
                raw.output = Some(args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--output requires a path")
                })?);
            }
            "--species" => {
                raw.species = Some(
                    args.next()
                        .map(PathBuf::from)
                        .ok_or_else(|| anyhow::anyhow!("--species requires a path"))?,
                );
            }
            "--moves" => {
                raw.moves = Some(
                    args.next()
                        .map(PathBuf::from)
                        .ok_or_else(|| anyhow::anyhow!("--moves requires a path"))?,
                );
            }
            "--top" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--top requires a number"))?;
                raw.top = Some(val.parse()?);
            }
            "--no-restricted" => raw.filters.allow_restricted = false,
            "--no-mega" => raw.filters.show_mega = false,
            "--json" => raw.json = true,
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }
    Ok(raw)
}

fn parse_args() -> anyhow::Result<Command> {
    let mut args = env::args().skip(1);
    let Some(sub) = args.next() else { usage() };
    if matches!(sub.as_str(), "--help" | "-h") {
        usage();
    }
    let raw = parse_flags(args)?;

    let command = match sub.as_str() {
        "rank" => {
            let target = match (raw.types, raw.target) {
                (Some(types), None) => TargetSpec::Types(types),
                (None, Some(name)) => TargetSpec::Named(name),
                (Some(_), Some(_)) => anyhow::bail!("Use either --types or --target, not both"),
                (None, None) => anyhow::bail!("rank requires --types or --target"),
            };
            Command::Rank(RankOptions {
                target,
                ability: raw.ability,
                index_path: raw.index,
                rules_path: raw.rules,
                filters: raw.filters,
                top: raw.top,
                json: raw.json,
            })
        }
        "weakness" => Command::Weakness {
            defender: raw
                .types
                .ok_or_else(|| anyhow::anyhow!("weakness requires --types"))?,
            rules_path: raw.rules,
        },
        "batch" => Command::Batch {
            index_path: raw
                .index
                .ok_or_else(|| anyhow::anyhow!("batch requires --index"))?,
            output_path: raw.output.unwrap_or_else(|| PathBuf::from("counters.csv")),
            rules_path: raw.rules,
            filters: raw.filters,
        },
        "build-index" => Command::BuildIndex {
            species_path: raw
                .species
                .ok_or_else(|| anyhow::anyhow!("build-index requires --species"))?,
            moves_path: raw
                .moves
                .ok_or_else(|| anyhow::anyhow!("build-index requires --moves"))?,
            output_path: raw.output.unwrap_or_else(|| PathBuf::from("index.json")),
        },
        other => {
            anyhow::bail!("Unknown command {other} (use rank, weakness, batch or build-index)")
        }
    };
    Ok(command)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pokemon_counter_finder=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = parse_args()?;
    run(command)
}
