//! Catalog module for static game-balance data
//!
//! The catalog holds boost and power definitions, category headings, synergy
//! rules and epoch names. It is loaded from JSON and validated once; the
//! generator only ever reads it.

mod types;

pub use types::*;

use crate::error::{ForgeError, Result};
use ahash::{AHashMap, AHashSet};
use once_cell::sync::Lazy;

/// Built-in catalog document
pub const BUILTIN_CATALOG_JSON: &str = include_str!("../../data/catalog.json");

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    Catalog::from_json(BUILTIN_CATALOG_JSON).expect("embedded catalog must be valid")
});

/// Read-only catalog with name indexes
#[derive(Debug, Clone)]
pub struct Catalog {
    data: CatalogData,
    headings: AHashMap<Category, usize>,
    boosts: AHashMap<String, usize>,
    powers: AHashMap<String, usize>,
}

impl Catalog {
    /// Validate catalog data and build lookup indexes
    pub fn new(data: CatalogData) -> Result<Self> {
        let mut headings = AHashMap::with_capacity(data.headings.len());
        for (i, heading) in data.headings.iter().enumerate() {
            if headings.insert(heading.category, i).is_some() {
                return Err(ForgeError::Catalog(format!(
                    "duplicate heading: {}",
                    heading.category.label()
                )));
            }
        }

        let mut boosts = AHashMap::with_capacity(data.boosts.len());
        for (i, boost) in data.boosts.iter().enumerate() {
            if boost.base_cost == 0 {
                return Err(ForgeError::Catalog(format!("boost has zero cost: {}", boost.name)));
            }
            if !headings.contains_key(&boost.category) {
                return Err(ForgeError::Catalog(format!(
                    "boost {} has no heading for {}",
                    boost.name,
                    boost.category.label()
                )));
            }
            if boosts.insert(boost.name.clone(), i).is_some() {
                return Err(ForgeError::Catalog(format!("duplicate boost: {}", boost.name)));
            }
        }

        let mut powers = AHashMap::with_capacity(data.powers.len());
        for (i, power) in data.powers.iter().enumerate() {
            if power.cost == 0 {
                return Err(ForgeError::Catalog(format!("power has zero cost: {}", power.name)));
            }
            if power.min_epoch > power.max_epoch {
                return Err(ForgeError::Catalog(format!(
                    "power {} has min_epoch {} after max_epoch {}",
                    power.name, power.min_epoch, power.max_epoch
                )));
            }
            if boosts.contains_key(&power.name) || powers.insert(power.name.clone(), i).is_some() {
                return Err(ForgeError::Catalog(format!("duplicate item name: {}", power.name)));
            }
        }

        for rule in &data.synergies {
            if rule.items.is_empty() {
                return Err(ForgeError::Catalog(format!("synergy {} lists no items", rule.name)));
            }
            let unique: AHashSet<&str> = rule.items.iter().map(String::as_str).collect();
            if unique.len() != rule.items.len() {
                return Err(ForgeError::Catalog(format!(
                    "synergy {} repeats an item",
                    rule.name
                )));
            }
            for name in &rule.items {
                if !boosts.contains_key(name) && !powers.contains_key(name) {
                    return Err(ForgeError::Catalog(format!(
                        "synergy {} references unknown item {}",
                        rule.name, name
                    )));
                }
            }
        }

        Ok(Self {
            data,
            headings,
            boosts,
            powers,
        })
    }

    /// Parse and validate a catalog document
    pub fn from_json(json: &str) -> Result<Self> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::new(data)
    }

    /// Shared built-in catalog
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn data(&self) -> &CatalogData {
        &self.data
    }

    pub fn headings(&self) -> &[Heading] {
        &self.data.headings
    }

    pub fn boosts(&self) -> &[Boost] {
        &self.data.boosts
    }

    pub fn powers(&self) -> &[Power] {
        &self.data.powers
    }

    pub fn synergies(&self) -> &[SynergyRule] {
        &self.data.synergies
    }

    pub fn heading(&self, category: Category) -> Option<&Heading> {
        self.headings
            .get(&category)
            .map(|&i| &self.data.headings[i])
    }

    /// Inflation step for a category; missing headings never inflate
    pub fn bonus_cost(&self, category: Category) -> u32 {
        self.heading(category).map_or(0, |h| h.bonus_cost)
    }

    pub fn boost(&self, name: &str) -> Option<&Boost> {
        self.boosts.get(name).map(|&i| &self.data.boosts[i])
    }

    pub fn power(&self, name: &str) -> Option<&Power> {
        self.powers.get(name).map(|&i| &self.data.powers[i])
    }

    /// Look up a boost or power by name
    pub fn item(&self, name: &str) -> Option<CatalogItem<'_>> {
        self.boost(name)
            .map(CatalogItem::Boost)
            .or_else(|| self.power(name).map(CatalogItem::Power))
    }

    /// Display name for an epoch index, falling back to the number
    pub fn epoch_name(&self, id: u8) -> String {
        self.data
            .epochs
            .iter()
            .find(|e| e.id == id)
            .map_or_else(|| format!("Epoch {}", id), |e| e.name.clone())
    }
}
