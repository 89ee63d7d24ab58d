//! Relation extraction: phrase matches resolved to nearby item numbers.

use std::collections::HashSet;

use mbsfacts_entities::{Relation, RelationType};

use crate::patterns::{
    ALLOW_SAME_DAY_PHRASES, EXCLUDE_PHRASES, GENERIC_EXCLUDE_PHRASES, ITEM_LIST, ITEM_NUMBER_TOKEN,
    PREREQ_PHRASES, PhrasePattern, SAME_DAY_EXCLUDE_PHRASES, SINGLE_ITEM,
};

/// Detail marker for the item-list fallback rule.
const DETAIL_ITEMS_LIST: &str = "items list";

/// Detail marker for the single-mention fallback rule.
///
/// Any bare `item N` mention becomes an exclusion unless it names the source
/// item itself. This is deliberately conservative and over-matches: a mention
/// is not always an exclusion, but the downstream eligibility logic prefers a
/// spurious exclusion over a missed one.
const DETAIL_SINGLE_MENTION: &str = "single item mention";

/// Detail marker for cross-references found in derived-fee text.
const DETAIL_DERIVED_FEE: &str = "derived fee";

/// Extract relation facts from an item's description and derived-fee text.
///
/// Pure function of its inputs; absent text yields no facts. `window` is the
/// number of bytes scanned either side of a phrase match when resolving
/// target item numbers.
pub(crate) fn extract_relations(
    item_num: &str,
    description: Option<&str>,
    derived_fee: Option<&str>,
    window: usize,
) -> Vec<Relation> {
    let text = description.unwrap_or_default();
    let mut relations = Vec::new();

    // Specific exclusions referencing concrete items.
    scan_windowed(
        &mut relations,
        &EXCLUDE_PHRASES,
        RelationType::Excludes,
        item_num,
        text,
        window,
    );

    // Generic exclusion with no explicit item number.
    for phrase in GENERIC_EXCLUDE_PHRASES.iter() {
        if phrase.regex.is_match(text) {
            relations.push(Relation::new(
                item_num,
                RelationType::GenericExcludes,
                None,
                phrase.source,
            ));
        }
    }

    scan_windowed(
        &mut relations,
        &SAME_DAY_EXCLUDE_PHRASES,
        RelationType::SameDayExcludes,
        item_num,
        text,
        window,
    );
    scan_windowed(
        &mut relations,
        &ALLOW_SAME_DAY_PHRASES,
        RelationType::AllowsSameDay,
        item_num,
        text,
        window,
    );
    scan_windowed(
        &mut relations,
        &PREREQ_PHRASES,
        RelationType::Prerequisite,
        item_num,
        text,
        window,
    );

    // Fallback: any `item(s) N, M or P` list is treated as exclusions.
    for caps in ITEM_LIST.captures_iter(text) {
        if let Some(segment) = caps.get(1) {
            for target in expand_item_list(segment.as_str()) {
                if target != item_num {
                    relations.push(Relation::new(
                        item_num,
                        RelationType::Excludes,
                        Some(target),
                        DETAIL_ITEMS_LIST,
                    ));
                }
            }
        }
    }

    // Fallback: lone `item N` mentions.
    for caps in SINGLE_ITEM.captures_iter(text) {
        if let Some(target) = caps.get(1) {
            if target.as_str() != item_num {
                relations.push(Relation::new(
                    item_num,
                    RelationType::Excludes,
                    Some(target.as_str().to_string()),
                    DETAIL_SINGLE_MENTION,
                ));
            }
        }
    }

    // Derived-fee text describes fee cross-references, not eligibility.
    if let Some(fee_text) = derived_fee {
        for caps in SINGLE_ITEM.captures_iter(fee_text) {
            if let Some(target) = caps.get(1) {
                if target.as_str() != item_num {
                    relations.push(Relation::new(
                        item_num,
                        RelationType::DerivedFeeRef,
                        Some(target.as_str().to_string()),
                        DETAIL_DERIVED_FEE,
                    ));
                }
            }
        }
    }

    dedup_first_seen(relations)
}

/// Find every match of each phrase and emit one relation per item number
/// seen inside the surrounding window, skipping self-references.
fn scan_windowed(
    relations: &mut Vec<Relation>,
    phrases: &[PhrasePattern],
    relation_type: RelationType,
    item_num: &str,
    text: &str,
    window: usize,
) {
    for phrase in phrases {
        for m in phrase.regex.find_iter(text) {
            for target in item_numbers_around(text, m.start(), window) {
                if target != item_num {
                    relations.push(Relation::new(
                        item_num,
                        relation_type,
                        Some(target),
                        phrase.source,
                    ));
                }
            }
        }
    }
}

/// All item-number tokens within `window` bytes either side of `anchor`.
///
/// Offsets are clamped outward to UTF-8 character boundaries; a number cut
/// by the window edge simply fails the token pattern and is skipped.
fn item_numbers_around(text: &str, anchor: usize, window: usize) -> Vec<String> {
    let start = floor_char_boundary(text, anchor.saturating_sub(window));
    let end = ceil_char_boundary(text, anchor.saturating_add(window));
    let snippet = &text[start..end];
    ITEM_NUMBER_TOKEN
        .find_iter(snippet)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Expand a captured list segment into its numbers, first-seen order,
/// duplicates within the list collapsed.
fn expand_item_list(segment: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut numbers = Vec::new();
    for m in ITEM_NUMBER_TOKEN.find_iter(segment) {
        if seen.insert(m.as_str()) {
            numbers.push(m.as_str().to_string());
        }
    }
    numbers
}

/// Collapse duplicate facts, keeping the first occurrence of each tuple.
pub(crate) fn dedup_first_seen<T: Clone + Eq + std::hash::Hash>(facts: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(facts.len());
    for fact in facts {
        if seen.insert(fact.clone()) {
            out.push(fact);
        }
    }
    out
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
