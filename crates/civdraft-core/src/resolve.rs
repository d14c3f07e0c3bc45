//! Weighted-random resolution of voted ruleset categories.
//!
//! For each category the submitted votes form a tally, and one winner is
//! drawn with probability proportional to its vote count. Draws are
//! independent across categories. The engine performs this computation once
//! per session; the result is cached on the session and never re-drawn.

use crate::catalog::SetupCategory;
use crate::session::{ParticipantId, VoteSheet};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// The outcome of resolving one category: the drawn winner plus the full
/// tally it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSetting {
    /// The winning option
    pub selected: String,
    /// Vote counts per option, for display and audit
    pub tally: BTreeMap<String, u32>,
}

/// Resolves every category from the submitted vote sheets.
///
/// A category with zero votes is omitted from the result. Ties need no
/// special handling: the weighted draw covers them.
pub fn resolve_settings<R: Rng>(
    votes: &HashMap<ParticipantId, VoteSheet>,
    categories: &[SetupCategory],
    rng: &mut R,
) -> BTreeMap<String, ResolvedSetting> {
    resolve(votes, categories, rng, false)
}

/// Resolves every category, falling back to the category's default option
/// where zero votes were cast.
///
/// Used by forced phase advances: skipping ahead must still produce a
/// complete ruleset, so empty categories deterministically take their first
/// configured option instead of being dropped.
pub fn resolve_settings_forced<R: Rng>(
    votes: &HashMap<ParticipantId, VoteSheet>,
    categories: &[SetupCategory],
    rng: &mut R,
) -> BTreeMap<String, ResolvedSetting> {
    resolve(votes, categories, rng, true)
}

fn resolve<R: Rng>(
    votes: &HashMap<ParticipantId, VoteSheet>,
    categories: &[SetupCategory],
    rng: &mut R,
    fallback_to_default: bool,
) -> BTreeMap<String, ResolvedSetting> {
    let mut settings = BTreeMap::new();

    for category in categories {
        let mut tally: BTreeMap<String, u32> = BTreeMap::new();
        for sheet in votes.values() {
            if let Some(choice) = sheet.get(&category.name) {
                *tally.entry(choice.clone()).or_insert(0) += 1;
            }
        }

        let selected = if tally.is_empty() {
            if !fallback_to_default {
                continue;
            }
            match category.default_option() {
                Some(option) => option.to_string(),
                // A category without options cannot produce a winner.
                None => continue,
            }
        } else {
            draw_weighted(&tally, rng)
        };

        settings.insert(category.name.clone(), ResolvedSetting { selected, tally });
    }

    settings
}

/// One weighted draw over a non-empty tally.
fn draw_weighted<R: Rng>(tally: &BTreeMap<String, u32>, rng: &mut R) -> String {
    let options: Vec<&String> = tally.keys().collect();
    let weights: Vec<u32> = tally.values().copied().collect();
    // Counts are built by incrementing, so every weight is >= 1.
    let index = WeightedIndex::new(&weights).expect("vote tally weights are positive");
    options[index.sample(rng)].clone()
}
