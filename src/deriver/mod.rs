//! Result deriver
//!
//! Turns an allocation into the player-facing read-outs: phase ratings, power
//! score, difficulty, summary and reasoning text, active synergies and the
//! post-hoc validity flag. Everything here is a pure function of the items.


use crate::catalog::{Catalog, Category, ItemKind, Phase};
use crate::config::{Archetype, Preset, ResolvedConfig};
use crate::generator::{in_era, Allocation, GeneratedItem, POINT_BUDGET};
use crate::weight::weight;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Points per rating star
pub const RATING_DIVISOR: f64 = 15.0;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
/// Power-score bonus per repeat pick within a category
pub const CONCENTRATION_BONUS: u32 = 5;
/// Primary spend needed for the focus clause
pub const PRIMARY_FOCUS_SPEND: u32 = 20;
/// Secondary spend needed to be named alongside the primary
pub const SECONDARY_FOCUS_SPEND: u32 = 15;
/// Economy spend below this earns the management caveat
pub const ECONOMY_CAVEAT_SPEND: u32 = 12;
/// Economy spend below this raises difficulty
pub const ECONOMY_DIFFICULTY_SPEND: u32 = 15;
/// Aircraft spend above this raises difficulty
pub const AIRCRAFT_DIFFICULTY_SPEND: u32 = 10;

/// Star ratings per game phase, each in `1..=5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRatings {
    pub early: u8,
    pub mid: u8,
    pub late: u8,
}

impl PhaseRatings {
    pub fn get(&self, phase: Phase) -> u8 {
        match phase {
            Phase::Early => self.early,
            Phase::Mid => self.mid,
            Phase::Late => self.late,
        }
    }

    /// Highest-rated phase; ties go to the earlier phase
    pub fn best(&self) -> (Phase, u8) {
        [Phase::Late, Phase::Mid, Phase::Early]
            .into_iter()
            .map(|phase| (phase, self.get(phase)))
            .fold((Phase::Early, 0), |best, next| if next.1 >= best.1 { next } else { best })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        };
        f.write_str(label)
    }
}

/// Active synergy rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynergyMatch {
    pub name: String,
    pub description: String,
    pub items: Vec<String>,
}

/// Everything derived from an allocation
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    pub ratings: PhaseRatings,
    pub summary: String,
    pub reasoning: String,
    pub power_score: u32,
    pub difficulty: Difficulty,
    pub primary_category: Option<Category>,
    pub synergies: Vec<SynergyMatch>,
    pub valid: bool,
}

/// Boost spend per category, in order of first purchase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySpend(Vec<(Category, u32)>);

impl CategorySpend {
    pub fn from_items(items: &[GeneratedItem]) -> Self {
        let mut spend: Vec<(Category, u32)> = Vec::new();
        for item in items {
            let Some(category) = item.category else {
                continue;
            };
            match spend.iter_mut().find(|(c, _)| *c == category) {
                Some((_, total)) => *total += item.cost,
                None => spend.push((category, item.cost)),
            }
        }
        Self(spend)
    }

    pub fn get(&self, category: Category) -> u32 {
        self.0
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(0, |(_, total)| *total)
    }

    /// Categories by descending spend; ties keep purchase order
    pub fn ranked(&self) -> Vec<(Category, u32)> {
        let mut ranked = self.0.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

fn normalize(sum: u32) -> u8 {
    let stars = (f64::from(sum) / RATING_DIVISOR).round();
    (stars as u8).clamp(MIN_RATING, MAX_RATING)
}

/// Sum item cost per phase tag and convert to stars
pub fn phase_ratings(catalog: &Catalog, items: &[GeneratedItem]) -> PhaseRatings {
    let (mut early, mut mid, mut late) = (0u32, 0u32, 0u32);
    for item in items {
        let Some(entry) = catalog.item(&item.name) else {
            continue;
        };
        for tag in entry.tags() {
            match tag {
                Phase::Early => early += item.cost,
                Phase::Mid => mid += item.cost,
                Phase::Late => late += item.cost,
            }
        }
    }
    PhaseRatings {
        early: normalize(early),
        mid: normalize(mid),
        late: normalize(late),
    }
}

/// Spent points plus half the concentration bonus, capped at the budget
pub fn power_score<I>(points_spent: u32, category_counts: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    let bonus: u32 = category_counts
        .into_iter()
        .filter(|&count| count > 1)
        .map(|count| (count - 1) * CONCENTRATION_BONUS)
        .sum();
    let score = (f64::from(points_spent) + f64::from(bonus) * 0.5).min(f64::from(POINT_BUDGET));
    score.round() as u32
}

pub fn difficulty(spend: &CategorySpend, ratings: &PhaseRatings) -> Difficulty {
    let mut score = 1;
    if spend.get(Category::Economy) < ECONOMY_DIFFICULTY_SPEND {
        score += 1;
    }
    if ratings.early < 2 {
        score += 1;
    }
    if spend.get(Category::Religion) > 0 {
        score += 1;
    }
    if spend.get(Category::Cyber) > 0 {
        score += 1;
    }
    if spend.get(Category::Aircraft) > AIRCRAFT_DIFFICULTY_SPEND {
        score += 1;
    }
    if score <= 1 {
        Difficulty::Beginner
    } else if score >= 4 {
        Difficulty::Advanced
    } else {
        Difficulty::Intermediate
    }
}

fn flavors(items: &[GeneratedItem]) -> Vec<&'static str> {
    let powers: AHashSet<&str> = items
        .iter()
        .filter(|item| item.kind == ItemKind::Power)
        .map(|item| item.name.as_str())
        .collect();
    let mut flavors = Vec::new();
    for (name, flavor) in [
        ("Expansionism", "rapid expansion"),
        ("Missile Base", "nuclear capability"),
        ("Slavery", "sacrificial production"),
        ("Priest Tower", "religious fortification"),
    ] {
        if powers.contains(name) {
            flavors.push(flavor);
        }
    }
    if powers.contains("SAS Commando") || powers.contains("Pathfinding") {
        flavors.push("covert infantry tactics");
    }
    flavors
}

/// One-line build summary.
///
/// Clause order: leaning by best phase, spending focus, flavor powers,
/// economy caveat.
pub fn summary(items: &[GeneratedItem], spend: &CategorySpend, ratings: &PhaseRatings) -> String {
    let (best_phase, best) = ratings.best();
    let leaning = if best >= 4 {
        match best_phase {
            Phase::Early => "Fast early-game aggressor",
            Phase::Mid => "Mid-game powerhouse",
            Phase::Late => "Late-game juggernaut",
        }
    } else if best <= 2 {
        "Scrappy underdog civilization"
    } else {
        "Flexible, well-rounded civilization"
    };
    let mut text = String::from(leaning);

    let ranked = spend.ranked();
    match ranked.first() {
        Some(&(primary, amount)) if amount >= PRIMARY_FOCUS_SPEND => {
            text.push_str(" backed by strong investment in ");
            text.push_str(primary.short_name());
            if let Some(&(secondary, amount)) = ranked.get(1) {
                if amount >= SECONDARY_FOCUS_SPEND {
                    text.push_str(" and ");
                    text.push_str(secondary.short_name());
                }
            }
        }
        _ => text.push_str(" with a balanced approach"),
    }

    let mut flavors = flavors(items);
    if let Some(last) = flavors.pop() {
        text.push_str(". Features ");
        if !flavors.is_empty() {
            text.push_str(&flavors.join(", "));
            text.push_str(" and ");
        }
        text.push_str(last);
    }

    if spend.get(Category::Economy) < ECONOMY_CAVEAT_SPEND {
        text.push_str(", but requires careful economic management.");
    } else {
        text.push('.');
    }
    text
}

/// Why the build looks the way it does
pub fn reasoning(
    config: &ResolvedConfig,
    archetype: Option<Archetype>,
    primary: Option<Category>,
) -> String {
    let mut text = format!(
        "Generated for a {} world using {} rules.",
        config.map_type, config.preset
    );
    match config.preset {
        Preset::Chaos => text.push_str(" Chaos mode amplified streakiness."),
        Preset::Tournament => text.push_str(" Tournament rules favored efficiency."),
        _ => {}
    }
    if let Some(archetype) = archetype {
        text.push_str(&format!(" {} archetype preference influenced choices.", archetype));
    }
    if let Some(primary) = primary {
        text.push_str(&format!(
            " The {} focus emerged naturally from the seed.",
            primary.short_name()
        ));
    }
    text
}

/// Every synergy rule whose items are all present
pub fn active_synergies(catalog: &Catalog, items: &[GeneratedItem]) -> Vec<SynergyMatch> {
    let names: AHashSet<&str> = items.iter().map(|item| item.name.as_str()).collect();
    catalog
        .synergies()
        .iter()
        .filter(|rule| rule.items.iter().all(|name| names.contains(name.as_str())))
        .map(|rule| SynergyMatch {
            name: rule.name.clone(),
            description: rule.description.clone(),
            items: rule.items.clone(),
        })
        .collect()
}

/// Post-hoc invariant check over a finished item list
pub fn validate(catalog: &Catalog, config: &ResolvedConfig, items: &[GeneratedItem]) -> bool {
    let total = items
        .iter()
        .fold(0u32, |total, item| total.saturating_add(item.cost));
    if total > POINT_BUDGET {
        return false;
    }
    let mut seen = AHashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.name.as_str()) {
            return false;
        }
        let Some(entry) = catalog.item(&item.name) else {
            return false;
        };
        if !in_era(catalog, &entry, config) {
            return false;
        }
        if !item.map_rule_relaxed && weight(&entry, config) == 0.0 {
            return false;
        }
    }
    true
}

/// Derive every read-out for one allocation
pub fn derive(
    catalog: &Catalog,
    config: &ResolvedConfig,
    archetype: Option<Archetype>,
    allocation: &Allocation,
) -> Derived {
    let items = &allocation.items;
    let spend = CategorySpend::from_items(items);
    let ratings = phase_ratings(catalog, items);
    let primary_category = spend.ranked().first().map(|&(category, _)| category);

    Derived {
        ratings,
        summary: summary(items, &spend, &ratings),
        reasoning: reasoning(config, archetype, primary_category),
        power_score: power_score(
            allocation.points_spent(),
            allocation.category_counts.values().copied(),
        ),
        difficulty: difficulty(&spend, &ratings),
        primary_category,
        synergies: active_synergies(catalog, items),
        valid: validate(catalog, config, items),
    }
}
