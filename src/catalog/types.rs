//! Catalog data structures

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Game phase a catalog item contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Early,
    Mid,
    Late,
}

/// Phase tags carried by boosts and powers (at most three)
pub type PhaseTags = SmallVec<[Phase; 3]>;

/// Boost category, serialized under its full heading name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Civ – Economy")]
    Economy,
    #[serde(rename = "Civ – Buildings, Walls & Towers")]
    Buildings,
    #[serde(rename = "Civ – General")]
    General,
    #[serde(rename = "Citizens & Fishing Boats")]
    Citizens,
    #[serde(rename = "Infantry – Ranged")]
    RangedInfantry,
    #[serde(rename = "Infantry – Sword / Spear")]
    MeleeInfantry,
    #[serde(rename = "Cavalry – Ranged")]
    RangedCavalry,
    #[serde(rename = "Cavalry – Melee")]
    MeleeCavalry,
    #[serde(rename = "Siege Weapons & Mobile AA")]
    Siege,
    #[serde(rename = "Tanks")]
    Tanks,
    #[serde(rename = "Aircraft")]
    Aircraft,
    #[serde(rename = "Ships")]
    Ships,
    #[serde(rename = "Cyber")]
    Cyber,
    #[serde(rename = "Religion")]
    Religion,
}

impl Category {
    pub const ALL: [Category; 14] = [
        Category::Economy,
        Category::Buildings,
        Category::General,
        Category::Citizens,
        Category::RangedInfantry,
        Category::MeleeInfantry,
        Category::RangedCavalry,
        Category::MeleeCavalry,
        Category::Siege,
        Category::Tanks,
        Category::Aircraft,
        Category::Ships,
        Category::Cyber,
        Category::Religion,
    ];

    /// Full heading name
    pub fn label(self) -> &'static str {
        match self {
            Category::Economy => "Civ – Economy",
            Category::Buildings => "Civ – Buildings, Walls & Towers",
            Category::General => "Civ – General",
            Category::Citizens => "Citizens & Fishing Boats",
            Category::RangedInfantry => "Infantry – Ranged",
            Category::MeleeInfantry => "Infantry – Sword / Spear",
            Category::RangedCavalry => "Cavalry – Ranged",
            Category::MeleeCavalry => "Cavalry – Melee",
            Category::Siege => "Siege Weapons & Mobile AA",
            Category::Tanks => "Tanks",
            Category::Aircraft => "Aircraft",
            Category::Ships => "Ships",
            Category::Cyber => "Cyber",
            Category::Religion => "Religion",
        }
    }

    /// Short name used in summaries
    pub fn short_name(self) -> &'static str {
        match self {
            Category::Economy => "Economy",
            Category::Buildings => "Defenses",
            Category::General => "Utility",
            Category::Citizens => "Citizens",
            Category::RangedInfantry => "Ranged Inf",
            Category::MeleeInfantry => "Melee Inf",
            Category::RangedCavalry => "Ranged Cav",
            Category::MeleeCavalry => "Melee Cav",
            Category::Siege => "Siege",
            Category::Tanks => "Armor",
            Category::Aircraft => "Air Force",
            Category::Ships => "Navy",
            Category::Cyber => "Cyber",
            Category::Religion => "Religion",
        }
    }

    #[inline]
    pub fn is_infantry(self) -> bool {
        matches!(self, Category::RangedInfantry | Category::MeleeInfantry)
    }

    #[inline]
    pub fn is_cavalry(self) -> bool {
        matches!(self, Category::RangedCavalry | Category::MeleeCavalry)
    }
}

/// Category heading: inflation step and unlocking era
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub category: Category,
    /// Added to a boost's cost for each prior boost taken in this category
    pub bonus_cost: u32,
    pub min_epoch: u8,
}

/// Percentage-style stat modifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boost {
    pub name: String,
    pub base_cost: u32,
    pub category: Category,
    pub tags: PhaseTags,
}

/// One-off civilization power
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Power {
    pub name: String,
    pub cost: u32,
    pub min_epoch: u8,
    pub max_epoch: u8,
    pub tags: PhaseTags,
    #[serde(default)]
    pub description: String,
}

/// Named combination of item names flagged when all are present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyRule {
    pub name: String,
    pub items: Vec<String>,
    pub description: String,
}

/// Era index and display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Epoch {
    pub id: u8,
    pub name: String,
}

/// Serialized catalog document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub epochs: Vec<Epoch>,
    pub headings: Vec<Heading>,
    pub boosts: Vec<Boost>,
    pub powers: Vec<Power>,
    #[serde(default)]
    pub synergies: Vec<SynergyRule>,
}

/// Kind of a catalog or generated item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Boost,
    Power,
}

/// Borrowed view over either kind of catalog item
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatalogItem<'a> {
    Boost(&'a Boost),
    Power(&'a Power),
}

impl<'a> CatalogItem<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            CatalogItem::Boost(b) => &b.name,
            CatalogItem::Power(p) => &p.name,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match *self {
            CatalogItem::Boost(_) => ItemKind::Boost,
            CatalogItem::Power(_) => ItemKind::Power,
        }
    }

    /// Boost category; powers have none
    pub fn category(&self) -> Option<Category> {
        match *self {
            CatalogItem::Boost(b) => Some(b.category),
            CatalogItem::Power(_) => None,
        }
    }

    /// Undiscounted, uninflated cost
    pub fn base_cost(&self) -> u32 {
        match *self {
            CatalogItem::Boost(b) => b.base_cost,
            CatalogItem::Power(p) => p.cost,
        }
    }

    pub fn tags(&self) -> &'a [Phase] {
        match *self {
            CatalogItem::Boost(b) => b.tags.as_slice(),
            CatalogItem::Power(p) => p.tags.as_slice(),
        }
    }

    #[inline]
    pub fn has_tag(&self, phase: Phase) -> bool {
        self.tags().contains(&phase)
    }

    #[inline]
    pub fn in_category(&self, category: Category) -> bool {
        self.category() == Some(category)
    }
}
