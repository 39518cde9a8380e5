use crate::types::Type;
use anyhow::{anyhow, bail};
use serde::{Deserialize, Serialize};

/// One candidate counter-pick. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackerRecord {
    pub name: String,
    pub slug: String,
    /// Only used to look up artwork.
    pub id: Option<u32>,
    pub types: Vec<Type>,
    /// Offensive rating, roughly the better attacking stat.
    pub power: f64,
    /// Types this candidate reliably hits hard with, in preference order.
    pub strong: Vec<Type>,
    pub ability_tag: Option<String>,
    pub hidden_ability_tag: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    pub is_mega: bool,
    pub restricted: bool,
}

pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

impl AttackerRecord {
    pub fn new(name: &str, types: &[Type], power: f64, strong: &[Type]) -> Self {
        AttackerRecord {
            name: name.to_string(),
            slug: slugify(name),
            id: None,
            types: types.to_vec(),
            power,
            strong: strong.to_vec(),
            ability_tag: None,
            hidden_ability_tag: None,
            aliases: Vec::new(),
            is_mega: false,
            restricted: false,
        }
    }

    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = slug.to_string();
        self
    }

    pub fn with_ability(mut self, tag: &str) -> Self {
        self.ability_tag = Some(tag.to_string());
        self
    }

    pub fn mega(mut self) -> Self {
        self.is_mega = true;
        self
    }

    pub fn restricted(mut self) -> Self {
        self.restricted = true;
        self
    }

    /// Records without a name or types never take part in ranking.
    pub fn is_well_formed(&self) -> bool {
        !self.name.trim().is_empty() && (1..=2).contains(&self.types.len())
    }

    /// The ability used for heuristics: the regular tag, else the hidden one.
    pub fn effective_ability(&self) -> Option<&str> {
        self.ability_tag
            .as_deref()
            .or(self.hidden_ability_tag.as_deref())
    }
}

const DEFAULT_POWER: f64 = 80.0;

/// Loosely-typed pool entry as found in an index file. Every field may be
/// absent or `null`; defaults are applied on conversion.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAttacker {
    pub name: Option<String>,
    #[serde(alias = "apiSlug")]
    pub slug: Option<String>,
    pub id: Option<u32>,
    pub types: Option<Vec<String>>,
    #[serde(alias = "rating")]
    pub power: Option<f64>,
    #[serde(alias = "learnedStrong", alias = "strongMoves")]
    pub strong: Option<Vec<String>>,
    #[serde(alias = "ability")]
    pub ability_tag: Option<String>,
    pub hidden_ability_tag: Option<String>,
    pub aliases: Option<Vec<String>>,
    pub is_mega: Option<bool>,
    pub restricted: Option<bool>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl TryFrom<RawAttacker> for AttackerRecord {
    type Error = anyhow::Error;

    fn try_from(raw: RawAttacker) -> Result<Self, Self::Error> {
        let name = non_empty(raw.name).ok_or_else(|| anyhow!("missing name"))?;
        let type_names = raw.types.ok_or_else(|| anyhow!("missing types"))?;
        let types = type_names
            .iter()
            .map(|t| t.parse::<Type>())
            .collect::<anyhow::Result<Vec<Type>>>()?;
        if types.is_empty() || types.len() > 2 {
            bail!("expected 1 or 2 types, got {}", types.len());
        }
        if types.len() == 2 && types[0] == types[1] {
            bail!("duplicate type {}", types[0]);
        }
        let power = raw.power.unwrap_or(DEFAULT_POWER);
        if !power.is_finite() || power < 0.0 {
            bail!("invalid offensive rating {power}");
        }

        // Unknown strong names are dropped; first occurrence wins.
        let strong_names = raw.strong.unwrap_or_default();
        let mut strong = Vec::with_capacity(strong_names.len());
        for t in strong_names.iter().filter_map(|t| t.parse::<Type>().ok()) {
            if !strong.contains(&t) {
                strong.push(t);
            }
        }

        let slug = non_empty(raw.slug).unwrap_or_else(|| slugify(&name));
        Ok(AttackerRecord {
            name,
            slug,
            id: raw.id,
            types,
            power,
            strong,
            ability_tag: non_empty(raw.ability_tag),
            hidden_ability_tag: non_empty(raw.hidden_ability_tag),
            aliases: raw.aliases.unwrap_or_default(),
            is_mega: raw.is_mega.unwrap_or(false),
            restricted: raw.restricted.unwrap_or(false),
        })
    }
}

/// A resolved target: its typing plus an optional ability tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub name: Option<String>,
    pub types: Vec<Type>,
    pub ability_tag: Option<String>,
}

impl Target {
    pub fn from_types(types: &[Type]) -> Self {
        Target {
            name: None,
            types: types.to_vec(),
            ability_tag: None,
        }
    }

    pub fn with_ability(mut self, tag: &str) -> Self {
        self.ability_tag = Some(tag.to_string());
        self
    }
}

impl From<&AttackerRecord> for Target {
    fn from(record: &AttackerRecord) -> Self {
        Target {
            name: Some(record.name.clone()),
            types: record.types.clone(),
            ability_tag: record.effective_ability().map(str::to_string),
        }
    }
}

pub const INDEX_VERSION: u32 = 1;

/// The index document written by the index builder.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolArtifact {
    pub version: u32,
    pub generated_at: Option<String>,
    pub count: usize,
    pub names: Vec<String>,
    pub pokemon: Vec<AttackerRecord>,
}

/// Index document as read back; entries stay untyped until validated one by one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IndexDocument {
    Wrapped {
        #[serde(default)]
        version: Option<u32>,
        pokemon: Vec<serde_json::Value>,
    },
    Bare(Vec<serde_json::Value>),
}

impl IndexDocument {
    pub fn version(&self) -> Option<u32> {
        match self {
            IndexDocument::Wrapped { version, .. } => *version,
            IndexDocument::Bare(_) => None,
        }
    }

    pub fn into_entries(self) -> Vec<serde_json::Value> {
        match self {
            IndexDocument::Wrapped { pokemon, .. } => pokemon,
            IndexDocument::Bare(entries) => entries,
        }
    }
}
