//! Compiled pattern registry.
//!
//! Every phrase and regex the extractors match against lives here, compiled
//! once on first use and shared read-only across all extraction calls. A
//! pattern that fails to compile is a defect in this file, not a runtime
//! condition, so compilation panics at first touch of the registry.

use once_cell::sync::Lazy;
use regex::Regex;

/// Bare item-number token: 1-5 digit integers on word boundaries.
pub(crate) const ITEM_NUMBER: &str = r"\b\d{1,5}\b";

/// A relation phrase together with the source text recorded as fact detail.
pub(crate) struct PhrasePattern {
    /// The phrase as written in the phrase set; stored on emitted facts.
    pub source: &'static str,
    /// The compiled case-insensitive matcher.
    pub regex: Regex,
}

#[expect(
    clippy::expect_used,
    reason = "Static pattern literals are validated by the test suite"
)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid extraction pattern")
}

fn phrase_set(sources: &[&'static str]) -> Vec<PhrasePattern> {
    sources
        .iter()
        .copied()
        .map(|source| PhrasePattern {
            source,
            regex: compile(&format!("(?i){source}")),
        })
        .collect()
}

/// Matches `item 106` / `items 106, 109, 125 or 16401`, capturing the list.
pub(crate) static ITEM_LIST: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)\bitems?\s+((?:{ITEM_NUMBER}(?:\s*,\s*|\s+or\s+|\s+and\s+))*{ITEM_NUMBER})"
    ))
});

/// Matches a lone `item N` mention, capturing the number.
pub(crate) static SINGLE_ITEM: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"(?i)\bitem\s+({ITEM_NUMBER})")));

/// Standalone item-number matcher for scanning snippets and list segments.
pub(crate) static ITEM_NUMBER_TOKEN: Lazy<Regex> = Lazy::new(|| compile(ITEM_NUMBER));

// Relation phrase sets. Exclusion language that names a concrete item is
// resolved to targets near the match; the generic form stands alone.

pub(crate) static EXCLUDE_PHRASES: Lazy<Vec<PhrasePattern>> = Lazy::new(|| {
    phrase_set(&[
        r"other than a service to which item",
        r"not in association with item",
        r"not claimable with item",
        r"not being a service to which item",
    ])
});

pub(crate) static GENERIC_EXCLUDE_PHRASES: Lazy<Vec<PhrasePattern>> = Lazy::new(|| {
    phrase_set(&[r"other than a service to which another item in the table applies"])
});

pub(crate) static SAME_DAY_EXCLUDE_PHRASES: Lazy<Vec<PhrasePattern>> = Lazy::new(|| {
    phrase_set(&[
        r"not on the same day as item",
        r"must not be performed on the same day as item",
    ])
});

pub(crate) static ALLOW_SAME_DAY_PHRASES: Lazy<Vec<PhrasePattern>> = Lazy::new(|| {
    phrase_set(&[
        r"may be claimed on the same day as item",
        r"can be performed on the same day as item",
    ])
});

pub(crate) static PREREQ_PHRASES: Lazy<Vec<PhrasePattern>> = Lazy::new(|| {
    phrase_set(&[
        r"after the initial attendance",
        r"following referral",
        r"requires (?:a )?service to which item",
    ])
});

// Occasion and lifetime flags.

pub(crate) static ONCE_PER_LIFETIME: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bonce per lifetime\b"));

pub(crate) static SAME_OCCASION: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bsame (?:occasion|visit)\b"));

pub(crate) static SAME_DAY_ONLY: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\bon the same day\b"));

// Frequency windows and cooldowns.

pub(crate) static PRECEDING_MONTHS: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bpreceding\s+(\d+)\s+months\b"));

pub(crate) static MAX_TIMES_IN_WINDOW: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\b(?:no more than|not more than|maximum of)\s+(\d+)\s+(?:times|services?)\s+in\s+(\d+)\s+months\b")
});

pub(crate) static MAX_PER_WINDOW: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\b(?:no more than|not more than|maximum of)\s+(\d+)\s+(?:times|services?)\s+per\s+(day|week|month|year)\b")
});

pub(crate) static ONCE_PER_WINDOW: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bonce per\s+(day|week|month|year)\b"));

pub(crate) static COOLDOWN_GENERIC: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\b(?:not within|preceding)\s+(\d+)\s+(days?|weeks?|months?|years?)\b")
});

pub(crate) static EVERY_PERIOD: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bevery\s+(\d+)\s+(day|week|month|year)s?\b"));

pub(crate) static NOT_MORE_THAN_PER_YEAR: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bnot more than\s+(\d+)\s+(?:times|services?)\s+per\s+year\b"));

pub(crate) static NOT_MORE_THAN_PER_MONTH: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bnot more than\s+(\d+)\s+(?:times|services?)\s+per\s+month\b"));

pub(crate) static NOT_MORE_THAN_PER_WEEK: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bnot more than\s+(\d+)\s+(?:times|services?)\s+per\s+week\b"));

pub(crate) static NOT_MORE_THAN_PER_DAY: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bnot more than\s+(\d+)\s+(?:times|services?)\s+per\s+day\b"));

pub(crate) static WITHIN_PERIOD: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bwithin\s+(\d+)\s+(days?|weeks?|months?|years?)\b"));

pub(crate) static AFTER_PERIOD: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bafter\s+(\d+)\s+(days?|weeks?|months?|years?)\b"));

// Durations. Hour-denominated captures are converted to minutes downstream.

pub(crate) static DURATION_MIN: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bat least\s+(\d+)\s+minutes\b"));

pub(crate) static DURATION_MAX: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\b(?:less than|up to|no more than)\s+(\d+)\s+minutes\b"));

pub(crate) static DURATION_MIN_HOURS: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bat least\s+(\d+)\s+hours?\b"));

pub(crate) static DURATION_RANGE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\b(\d+)\s*(?:to|-|–)\s*(\d+)\s+minutes\b"));

pub(crate) static DURATION_EXACT_HOURS: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\b(\d+)\s+hours?\b"));

pub(crate) static DURATION_APPROXIMATE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bapproximately\s+(\d+)\s+minutes?\b"));

pub(crate) static DURATION_ABOUT: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\babout\s+(\d+)\s+minutes?\b"));

pub(crate) static DURATION_OR_MORE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\b(\d+)\s+minutes?\s+or\s+more\b"));

pub(crate) static DURATION_OR_LESS: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\b(\d+)\s+minutes?\s+or\s+less\b"));

// Age bounds. Each alternation captures the bound in one of two groups.

pub(crate) static AGE_MIN: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\bat least\s+(\d+)\s+years?\b|\baged\s+(\d+)\s+years?\s+or\s+older\b")
});

pub(crate) static AGE_MAX: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\bunder\s+(\d+)\s+years?\b|\baged\s+(\d+)\s+years?\s+or\s+younger\b")
});

pub(crate) static TELEHEALTH: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\btelehealth|video attendance\b"));

/// Lettered requirement clauses: `(a) text;` up to the next semicolon/newline.
pub(crate) static LETTERED_CLAUSES: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\(([a-z])\)\s*([^;\n]+)[;\n]"));

// Referral and attendance-type flags.

pub(crate) static REFERRAL: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bfollowing referral|valid referral|referral\b"));

pub(crate) static INITIAL_ATTENDANCE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\binitial attendance\b"));

pub(crate) static SUBSEQUENT_ATTENDANCE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bsubsequent attendance\b"));

pub(crate) static SINGLE_COURSE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bsingle course of treatment\b"));

pub(crate) static REFERRAL_REQUIRED: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\breferral required|requires referral|must be referred\b"));

pub(crate) static SPECIALIST_REFERRAL: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\breferral required from specialist|specialist referral|referral to specialist\b")
});

pub(crate) static GP_REFERRAL: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)\bgp referral|referral from gp|general practitioner referral|must be referred from gp\b",
    )
});

pub(crate) static TREATMENT_PLAN: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\btreatment plan|management plan\b"));

pub(crate) static CONTINUING_TREATMENT: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bcontinuing treatment|ongoing treatment\b"));

pub(crate) static FIRST_VISIT: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bfirst visit|first attendance|initial visit\b"));

pub(crate) static FOLLOW_UP: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bfollow.?up|follow.?up visit\b"));
