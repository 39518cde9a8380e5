use crate::model::{AttackerRecord, IndexDocument, RawAttacker, Target};
use crate::types::Type;
use anyhow::Context;
use std::path::Path;
use tracing::{info, warn};

pub const DEFAULT_SUGGESTIONS: usize = 12;

/// The candidate attackers a query ranks. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pool {
    records: Vec<AttackerRecord>,
}

impl Pool {
    pub fn new(records: Vec<AttackerRecord>) -> Self {
        Pool { records }
    }

    /// Hand-picked attackers used when no index file is supplied.
    pub fn curated() -> Self {
        use Type::*;
        let records = vec![
            AttackerRecord::new("Regieleki", &[Electric], 95.0, &[Electric]),
            AttackerRecord::new("Zapdos", &[Electric, Flying], 90.0, &[Electric, Flying]),
            AttackerRecord::new(
                "Iron Hands",
                &[Fighting, Electric],
                88.0,
                &[Fighting, Electric],
            ),
            AttackerRecord::new("Zacian", &[Fairy, Steel], 98.0, &[Fairy, Steel])
                .restricted(),
            AttackerRecord::new("Flutter Mane", &[Ghost, Fairy], 94.0, &[Ghost, Fairy]),
            AttackerRecord::new("Mewtwo", &[Psychic], 96.0, &[Psychic])
                .restricted(),
            AttackerRecord::new("Chien-Pao", &[Dark, Ice], 93.0, &[Dark, Ice]),
            AttackerRecord::new("Baxcalibur", &[Dragon, Ice], 92.0, &[Ice, Dragon]),
            AttackerRecord::new("Dragonite", &[Dragon, Flying], 90.0, &[Dragon, Flying]),
            AttackerRecord::new("Rampardos", &[Rock], 96.0, &[Rock]),
            AttackerRecord::new("Tyranitar (Mega)", &[Rock, Dark], 99.0, &[Rock, Dark])
                .with_slug("tyranitar-mega")
                .with_ability("sand-stream")
                .mega(),
            AttackerRecord::new("Aerodactyl (Mega)", &[Rock, Flying], 95.0, &[Rock, Flying])
                .with_slug("aerodactyl-mega")
                .mega(),
            AttackerRecord::new("Heatran", &[Fire, Steel], 92.0, &[Fire, Steel]),
            AttackerRecord::new("Charizard (Mega X)", &[Fire, Dragon], 97.0, &[Fire, Dragon])
                .with_slug("charizard-mega-x")
                .mega(),
            AttackerRecord::new("Charizard (Mega Y)", &[Fire, Flying], 98.0, &[Fire, Flying])
                .with_slug("charizard-mega-y")
                .with_ability("drought")
                .mega(),
            AttackerRecord::new("Garchomp", &[Dragon, Ground], 91.0, &[Ground, Dragon]),
            AttackerRecord::new(
                "Garchomp (Mega)",
                &[Dragon, Ground],
                97.0,
                &[Dragon, Ground],
            )
            .with_slug("garchomp-mega")
            .mega(),
            AttackerRecord::new("Excadrill", &[Ground, Steel], 90.0, &[Ground, Steel]),
            AttackerRecord::new(
                "Metagross (Mega)",
                &[Steel, Psychic],
                98.0,
                &[Steel, Psychic],
            )
            .with_slug("metagross-mega")
            .mega(),
            AttackerRecord::new("Scizor (Mega)", &[Bug, Steel], 95.0, &[Bug, Steel])
                .with_slug("scizor-mega")
                .mega(),
            AttackerRecord::new("Heracross (Mega)", &[Bug, Fighting], 94.0, &[Bug, Fighting])
                .with_slug("heracross-mega")
                .mega(),
            AttackerRecord::new("Greninja", &[Water, Dark], 90.0, &[Water, Dark]),
            AttackerRecord::new("Kingdra", &[Water, Dragon], 88.0, &[Water, Dragon]),
            AttackerRecord::new("Rillaboom", &[Grass], 90.0, &[Grass]),
            AttackerRecord::new("Mamoswine", &[Ice, Ground], 90.0, &[Ice, Ground]),
        ];
        Pool { records }
    }

    /// Parses an index document, skipping entries that lack a name or types.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let doc: IndexDocument =
            serde_json::from_str(raw).context("Index is not a pool document")?;
        let version = doc.version();
        let entries = doc.into_entries();
        let total = entries.len();
        let mut records = Vec::with_capacity(total);
        for (idx, entry) in entries.into_iter().enumerate() {
            let parsed = serde_json::from_value::<RawAttacker>(entry)
                .map_err(anyhow::Error::from)
                .and_then(AttackerRecord::try_from);
            match parsed {
                Ok(record) => records.push(record),
                Err(err) => warn!(entry = idx, reason = %err, "skipping malformed pool entry"),
            }
        }
        info!(
            version = ?version,
            loaded = records.len(),
            skipped = total - records.len(),
            "pool index parsed"
        );
        Ok(Pool { records })
    }

    pub fn records(&self) -> &[AttackerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finds an entry by display name, slug or alias, ignoring case.
    pub fn find(&self, query: &str) -> Option<&AttackerRecord> {
        let key = query.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }
        self.records.iter().find(|r| {
            r.name.to_lowercase() == key
                || r.slug.to_lowercase() == key
                || r.aliases.iter().any(|a| a.to_lowercase() == key)
        })
    }

    pub fn resolve(&self, query: &str) -> Option<Target> {
        self.find(query).map(Target::from)
    }

    /// Autocomplete over names and slugs: prefix matches first, then substring
    /// matches, each group in pool order.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<&str> {
        let q = query.trim().to_lowercase();
        let mut prefix = Vec::new();
        let mut contains = Vec::new();
        for r in &self.records {
            let name = r.name.to_lowercase();
            let slug = r.slug.to_lowercase();
            if q.is_empty() || name.starts_with(&q) || slug.starts_with(&q) {
                prefix.push(r.name.as_str());
            } else if name.contains(&q) || slug.contains(&q) {
                contains.push(r.name.as_str());
            }
        }
        prefix.extend(contains);
        prefix.truncate(limit);
        prefix
    }
}

pub fn load_pool(path: &Path) -> anyhow::Result<Pool> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pool index at {}", path.display()))?;
    Pool::from_json(&raw).with_context(|| format!("Failed to parse JSON from {}", path.display()))
}
