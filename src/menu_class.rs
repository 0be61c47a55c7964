//! Merging tool matches into `menu_class`.
//!
//! Ventoy takes the first classifier whose selector matches, so order
//! matters: longer selectors come first, ties broken case-insensitively, and
//! a bare `linux` key always goes last so it only catches what nothing more
//! specific did.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use crate::document::{MenuClass, SelectorKind, VentoyConfig};
use crate::matcher::ToolMatch;

const FALLBACK_KEY: &str = "linux";

fn rank(selector: &str) -> (Reverse<usize>, String) {
    (Reverse(selector.chars().count()), selector.to_lowercase())
}

fn is_fallback(entry: &MenuClass) -> bool {
    matches!(entry, MenuClass::Key { key, .. } if key.to_lowercase() == FALLBACK_KEY)
}

/// Orders classifier entries for first-match evaluation.
///
/// Stable: entries with equal rank keep their relative order. Entries with no
/// recognized selector follow the ranked ones, ahead of the `linux` fallbacks.
pub fn order_entries(entries: Vec<MenuClass>) -> Vec<MenuClass> {
    let (mut ranked, unranked): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(|e| e.selector().is_some());
    ranked.sort_by_cached_key(|e| rank(e.selector().map_or("", |(_, s)| s)));

    let (fallbacks, mut ordered): (Vec<_>, Vec<_>) = ranked.into_iter().partition(is_fallback);
    ordered.extend(unranked);
    ordered.extend(fallbacks);
    ordered
}

/// New `key` entries for a set of matches, most specific first.
pub fn entries_from_matches(matches: &BTreeSet<ToolMatch>) -> Vec<MenuClass> {
    let mut sorted: Vec<&ToolMatch> = matches.iter().collect();
    sorted.sort_by_cached_key(|m| rank(&m.matched));
    sorted
        .into_iter()
        .map(|m| MenuClass::key(&m.matched, &m.class))
        .collect()
}

/// Appends `incoming` to `existing`, keeps one entry per (selector kind,
/// selector) and orders the result.
///
/// A later duplicate replaces the earlier entry's class but keeps its slot and
/// any fields only the earlier entry has.
pub fn merge_entries(existing: Vec<MenuClass>, incoming: Vec<MenuClass>) -> Vec<MenuClass> {
    let mut merged: Vec<MenuClass> = Vec::new();
    let mut slots: HashMap<(SelectorKind, String), usize> = HashMap::new();

    for entry in existing.into_iter().chain(incoming) {
        let Some((kind, selector)) = entry.selector() else {
            merged.push(entry);
            continue;
        };
        let composite = (kind, selector.to_string());
        match slots.get(&composite) {
            Some(&slot) => merged[slot].absorb(entry),
            None => {
                slots.insert(composite, merged.len());
                merged.push(entry);
            }
        }
    }

    order_entries(merged)
}

/// Folds `matches` into the document's `menu_class`, creating it if needed.
/// Returns the number of classifier entries afterwards.
pub fn apply_matches(config: &mut VentoyConfig, matches: &BTreeSet<ToolMatch>) -> usize {
    let existing = config.menu_class.take().unwrap_or_default();
    let merged = merge_entries(existing, entries_from_matches(matches));
    let count = merged.len();
    config.menu_class = Some(merged);
    count
}
