use anyhow::{anyhow, bail};
use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The 18 elemental types, in canonical chart order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Type {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

static TYPE_NAMES: phf::Map<&'static str, Type> = phf_map! {
    "normal" => Type::Normal,
    "fire" => Type::Fire,
    "water" => Type::Water,
    "electric" => Type::Electric,
    "grass" => Type::Grass,
    "ice" => Type::Ice,
    "fighting" => Type::Fighting,
    "poison" => Type::Poison,
    "ground" => Type::Ground,
    "flying" => Type::Flying,
    "psychic" => Type::Psychic,
    "bug" => Type::Bug,
    "rock" => Type::Rock,
    "ghost" => Type::Ghost,
    "dragon" => Type::Dragon,
    "dark" => Type::Dark,
    "steel" => Type::Steel,
    "fairy" => Type::Fairy,
};

impl Type {
    pub const COUNT: usize = 18;

    pub const ALL: [Type; Type::COUNT] = [
        Type::Normal,
        Type::Fire,
        Type::Water,
        Type::Electric,
        Type::Grass,
        Type::Ice,
        Type::Fighting,
        Type::Poison,
        Type::Ground,
        Type::Flying,
        Type::Psychic,
        Type::Bug,
        Type::Rock,
        Type::Ghost,
        Type::Dragon,
        Type::Dark,
        Type::Steel,
        Type::Fairy,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Type::Normal => "Normal",
            Type::Fire => "Fire",
            Type::Water => "Water",
            Type::Electric => "Electric",
            Type::Grass => "Grass",
            Type::Ice => "Ice",
            Type::Fighting => "Fighting",
            Type::Poison => "Poison",
            Type::Ground => "Ground",
            Type::Flying => "Flying",
            Type::Psychic => "Psychic",
            Type::Bug => "Bug",
            Type::Rock => "Rock",
            Type::Ghost => "Ghost",
            Type::Dragon => "Dragon",
            Type::Dark => "Dark",
            Type::Steel => "Steel",
            Type::Fairy => "Fairy",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Type {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        TYPE_NAMES
            .get(key.as_str())
            .copied()
            .ok_or_else(|| anyhow!("Unknown type {s:?}"))
    }
}

impl TryFrom<String> for Type {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A target's typing: empty (target unknown), or one or two distinct types.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Defender(Vec<Type>);

impl Defender {
    pub fn new(types: &[Type]) -> anyhow::Result<Self> {
        if types.len() > 2 {
            bail!("A defender has at most 2 types, got {}", types.len());
        }
        if types.len() == 2 && types[0] == types[1] {
            bail!("Duplicate defender type {}", types[0]);
        }
        Ok(Defender(types.to_vec()))
    }

    pub fn types(&self) -> &[Type] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Defender {
    type Err = anyhow::Error;

    /// Accepts `Fire`, `fire,flying` or `Fire/Flying`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let types = s
            .split([',', '/'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<anyhow::Result<Vec<Type>>>()?;
        Defender::new(&types)
    }
}

/// Sparse chart description: attacking type -> defending type -> multiplier.
/// Unlisted defending entries are neutral.
pub type SparseChart = HashMap<Type, HashMap<Type, f32>>;

const ALLOWED_MULTIPLIERS: [f32; 4] = [0.0, 0.5, 1.0, 2.0];

/// Dense attacking-by-defending effectiveness table.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeChart {
    cells: [[f32; Type::COUNT]; Type::COUNT],
}

impl TypeChart {
    // Ref: pokemon-showdown/data/typechart.ts (generation 6 onward).
    pub fn standard() -> Self {
        let mut cells = [[1.0; Type::COUNT]; Type::COUNT];
        for atk in Type::ALL {
            for def in Type::ALL {
                cells[atk.index()][def.index()] = standard_multiplier(atk, def);
            }
        }
        TypeChart { cells }
    }

    /// Builds a chart from a sparse description. Every attacking type must be
    /// present and every listed value must be one of 0, 0.5, 1 or 2.
    pub fn from_sparse(sparse: &SparseChart) -> anyhow::Result<Self> {
        let mut cells = [[1.0; Type::COUNT]; Type::COUNT];
        for atk in Type::ALL {
            let row = sparse
                .get(&atk)
                .ok_or_else(|| anyhow!("Type chart is missing attacking type {atk}"))?;
            for (&def, &value) in row {
                if !ALLOWED_MULTIPLIERS.contains(&value) {
                    bail!("Type chart entry {atk} -> {def} has invalid multiplier {value}");
                }
                cells[atk.index()][def.index()] = value;
            }
        }
        Ok(TypeChart { cells })
    }

    pub fn effectiveness(&self, attacking: Type, defending: Type) -> f32 {
        self.cells[attacking.index()][defending.index()]
    }

    /// Product of the chart entries for `attacking` over every defending type.
    pub fn multiplier(&self, attacking: Type, defending: &[Type]) -> f32 {
        defending
            .iter()
            .fold(1.0, |acc, &def| acc * self.effectiveness(attacking, def))
    }
}

impl Default for TypeChart {
    fn default() -> Self {
        TypeChart::standard()
    }
}

fn standard_multiplier(attacking: Type, defending: Type) -> f32 {
    use Type::*;
    match attacking {
        Normal => match defending {
            Rock | Steel => 0.5,
            Ghost => 0.0,
            _ => 1.0,
        },
        Fire => match defending {
            Fire | Water | Rock | Dragon => 0.5,
            Grass | Ice | Bug | Steel => 2.0,
            _ => 1.0,
        },
        Water => match defending {
            Water | Grass | Dragon => 0.5,
            Fire | Ground | Rock => 2.0,
            _ => 1.0,
        },
        Electric => match defending {
            Electric | Grass | Dragon => 0.5,
            Water | Flying => 2.0,
            Ground => 0.0,
            _ => 1.0,
        },
        Grass => match defending {
            Fire | Grass | Poison | Flying | Bug | Dragon | Steel => 0.5,
            Water | Ground | Rock => 2.0,
            _ => 1.0,
        },
        Ice => match defending {
            Fire | Water | Ice | Steel => 0.5,
            Grass | Ground | Flying | Dragon => 2.0,
            _ => 1.0,
        },
        Fighting => match defending {
            Normal | Ice | Rock | Dark | Steel => 2.0,
            Poison | Flying | Psychic | Bug | Fairy => 0.5,
            Ghost => 0.0,
            _ => 1.0,
        },
        Poison => match defending {
            Grass | Fairy => 2.0,
            Poison | Ground | Rock | Ghost => 0.5,
            Steel => 0.0,
            _ => 1.0,
        },
        Ground => match defending {
            Fire | Electric | Poison | Rock | Steel => 2.0,
            Grass | Bug => 0.5,
            Flying => 0.0,
            _ => 1.0,
        },
        Flying => match defending {
            Grass | Fighting | Bug => 2.0,
            Electric | Rock | Steel => 0.5,
            _ => 1.0,
        },
        Psychic => match defending {
            Fighting | Poison => 2.0,
            Psychic | Steel => 0.5,
            Dark => 0.0,
            _ => 1.0,
        },
        Bug => match defending {
            Grass | Psychic | Dark => 2.0,
            Fire | Fighting | Poison | Flying | Ghost | Steel | Fairy => 0.5,
            _ => 1.0,
        },
        Rock => match defending {
            Fire | Ice | Flying | Bug => 2.0,
            Fighting | Ground | Steel => 0.5,
            _ => 1.0,
        },
        Ghost => match defending {
            Ghost | Psychic => 2.0,
            Dark => 0.5,
            Normal => 0.0,
            _ => 1.0,
        },
        Dragon => match defending {
            Dragon => 2.0,
            Steel => 0.5,
            Fairy => 0.0,
            _ => 1.0,
        },
        Dark => match defending {
            Psychic | Ghost => 2.0,
            Fighting | Dark | Fairy => 0.5,
            _ => 1.0,
        },
        Steel => match defending {
            Rock | Ice | Fairy => 2.0,
            Fire | Water | Electric | Steel => 0.5,
            _ => 1.0,
        },
        Fairy => match defending {
            Fighting | Dragon | Dark => 2.0,
            Fire | Poison | Steel => 0.5,
            _ => 1.0,
        },
    }
}
