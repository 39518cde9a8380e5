use crate::types::{Type, TypeChart};
use serde::{Serialize, Serializer};
use std::ops::Index;

/// Combined multiplier of every attacking type against one defender.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaknessVector {
    multipliers: [f32; Type::COUNT],
}

/// One attacking type with its combined multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TypeMultiplier {
    #[serde(rename = "type")]
    pub attacking: Type,
    pub multiplier: f32,
}

/// All 18 attacking types grouped by how hard they hit the defender.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WeaknessBreakdown {
    pub quad: Vec<Type>,
    pub double: Vec<Type>,
    pub neutral: Vec<Type>,
    pub resisted: Vec<TypeMultiplier>,
    pub immune: Vec<Type>,
}

/// Multiplies the chart across the defender's types for every attacking type.
/// An empty defender yields the all-neutral vector.
pub fn weakness_vector(chart: &TypeChart, defender: &[Type]) -> WeaknessVector {
    let mut multipliers = [1.0; Type::COUNT];
    for atk in Type::ALL {
        multipliers[atk.index()] = chart.multiplier(atk, defender);
    }
    WeaknessVector { multipliers }
}

impl WeaknessVector {
    pub fn get(&self, attacking: Type) -> f32 {
        self.multipliers[attacking.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Type, f32)> + '_ {
        Type::ALL.iter().map(move |&t| (t, self.get(t)))
    }

    /// Entries at x2 or above, strongest first; equal multipliers keep chart order.
    pub fn super_effective(&self) -> Vec<TypeMultiplier> {
        let mut weak: Vec<TypeMultiplier> = self
            .iter()
            .filter(|(_, m)| *m >= 2.0)
            .map(|(attacking, multiplier)| TypeMultiplier {
                attacking,
                multiplier,
            })
            .collect();
        weak.sort_by(|a, b| b.multiplier.total_cmp(&a.multiplier));
        weak
    }

    pub fn breakdown(&self) -> WeaknessBreakdown {
        let mut out = WeaknessBreakdown::default();
        for (t, m) in self.iter() {
            if m >= 4.0 {
                out.quad.push(t);
            } else if m >= 2.0 {
                out.double.push(t);
            } else if m == 1.0 {
                out.neutral.push(t);
            } else if m > 0.0 {
                out.resisted.push(TypeMultiplier {
                    attacking: t,
                    multiplier: m,
                });
            } else {
                out.immune.push(t);
            }
        }
        // x0.5 before x0.25
        out.resisted.sort_by(|a, b| b.multiplier.total_cmp(&a.multiplier));
        out
    }
}

impl Index<Type> for WeaknessVector {
    type Output = f32;

    fn index(&self, attacking: Type) -> &f32 {
        &self.multipliers[attacking.index()]
    }
}

impl Serialize for WeaknessVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
