use crate::model::{AttackerRecord, Target};
use crate::ranking::{CounterQuery, CounterReport, Filters, RankingEngine};
use rayon::prelude::*;
use serde::Serialize;
use std::io;
use std::path::Path;

/// Best counter found for one target of a batch run. Field order is the CSV
/// column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    pub target: String,
    pub top_pick: Option<String>,
    pub hit_type: Option<String>,
    #[serde(rename = "mult")]
    pub multiplier: Option<f32>,
    pub score: Option<f64>,
    pub candidates: usize,
}

/// Runs independent queries in parallel; reports come back in query order.
pub fn rank_many<'p>(
    engine: &RankingEngine,
    queries: &[CounterQuery],
    pool: &'p [AttackerRecord],
) -> Vec<CounterReport<'p>> {
    queries
        .par_iter()
        .map(|query| engine.rank(query, pool))
        .collect()
}

/// Uses every pool entry as a target in turn and keeps its top counter.
pub fn counter_table(
    engine: &RankingEngine,
    pool: &[AttackerRecord],
    filters: Filters,
) -> Vec<BatchRow> {
    let targets: Vec<Target> = pool
        .iter()
        .filter(|r| r.is_well_formed())
        .map(Target::from)
        .collect();
    let queries: Vec<CounterQuery> = targets
        .iter()
        .map(|t| CounterQuery::from(t).with_filters(filters))
        .collect();
    let reports = rank_many(engine, &queries, pool);
    targets
        .iter()
        .zip(reports)
        .map(|(target, report)| {
            let top = report.picks.first();
            BatchRow {
                target: target.name.clone().unwrap_or_default(),
                top_pick: top.map(|p| p.attacker.name.clone()),
                hit_type: top.map(|p| p.hit_type.to_string()),
                multiplier: top.map(|p| p.multiplier),
                score: top.map(|p| p.display_score()),
                candidates: report.picks.len(),
            }
        })
        .collect()
}

const HEADER: [&str; 6] = ["target", "top_pick", "hit_type", "mult", "score", "candidates"];

/// Writes one header row and one row per target. Empty options become empty
/// cells.
pub fn write_rows<W: io::Write>(rows: &[BatchRow], out: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    if rows.is_empty() {
        writer.write_record(HEADER)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn render_csv(rows: &[BatchRow]) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    write_rows(rows, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

pub fn write_csv(rows: &[BatchRow], path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    write_rows(rows, io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_quotes_awkward_names() {
        let rows = vec![BatchRow {
            target: "Mr. Mime, Galar".to_string(),
            top_pick: None,
            hit_type: None,
            multiplier: None,
            score: None,
            candidates: 0,
        }];
        let csv = render_csv(&rows).unwrap();
        assert_eq!(
            csv,
            "target,top_pick,hit_type,mult,score,candidates\n\"Mr. Mime, Galar\",,,,,0\n"
        );
    }

    #[test]
    fn csv_fills_every_column_for_a_pick() {
        let rows = vec![BatchRow {
            target: "Charizard".to_string(),
            top_pick: Some("Rampardos".to_string()),
            hit_type: Some("Rock".to_string()),
            multiplier: Some(4.0),
            score: Some(3.99),
            candidates: 7,
        }];
        let csv = render_csv(&rows).unwrap();
        assert_eq!(csv.lines().nth(1), Some("Charizard,Rampardos,Rock,4.0,3.99,7"));
    }

    #[test]
    fn empty_table_still_has_a_header() {
        let csv = render_csv(&[]).unwrap();
        assert_eq!(csv, "target,top_pick,hit_type,mult,score,candidates\n");
    }
}
