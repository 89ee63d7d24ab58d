//! Controlled vocabularies for service locations and provider roles.
//!
//! Each entry is matched as a case-insensitive whole phrase anywhere in a
//! description, and every hit emits one constraint valued with the entry
//! itself, so downstream consumers only ever see these exact strings.

use once_cell::sync::Lazy;
use regex::Regex;

/// Recognized service locations.
pub(crate) const LOCATIONS: &[&str] = &[
    "consulting rooms",
    "hospital",
    "home",
    "residential aged care facility",
    "emergency department",
    "intensive care unit",
    "icu",
    "theatre",
    "outpatient",
    "inpatient",
    "clinic",
    "medical centre",
    "general practice",
    "specialist rooms",
    "day surgery",
    "day procedure unit",
    "recovery room",
    "ward",
    "private hospital",
    "public hospital",
    "community health centre",
    "mental health facility",
    "rehabilitation centre",
    "palliative care unit",
    "maternity ward",
    "paediatric ward",
    "cardiac unit",
    "neurology unit",
    "oncology unit",
    "radiology department",
    "pathology laboratory",
    "pharmacy",
    "dental surgery",
    "physiotherapy clinic",
    "occupational therapy",
    "speech therapy",
    "dietitian clinic",
    "psychology clinic",
    "counselling centre",
    "telehealth",
    "video consultation",
    "phone consultation",
    "remote consultation",
];

/// Recognized provider roles.
pub(crate) const PROVIDERS: &[&str] = &[
    "general practitioner",
    "specialist",
    "consultant physician",
    "medical practitioner",
    "practice nurse",
    "gp registrar",
    "diagnostic radiologist",
    "surgeon",
    "anaesthetist",
    "psychiatrist",
    "psychologist",
    "physiotherapist",
    "occupational therapist",
    "speech therapist",
    "dietitian",
    "pharmacist",
    "dentist",
    "dental specialist",
    "nurse practitioner",
    "midwife",
    "mental health nurse",
    "community health nurse",
    "palliative care nurse",
    "oncology nurse",
    "cardiac nurse",
    "diabetes educator",
    "social worker",
    "counsellor",
    "mental health worker",
    "allied health professional",
    "health professional",
    "healthcare professional",
    "medical specialist",
    "surgical specialist",
    "paediatrician",
    "geriatrician",
    "cardiologist",
    "neurologist",
    "oncologist",
    "dermatologist",
    "ophthalmologist",
    "orthopaedic surgeon",
    "plastic surgeon",
    "neurosurgeon",
    "cardiothoracic surgeon",
    "urologist",
    "gynaecologist",
    "obstetrician",
    "endocrinologist",
    "gastroenterologist",
    "respiratory physician",
    "rheumatologist",
    "nephrologist",
    "haematologist",
    "pathologist",
    "radiologist",
    "nuclear medicine physician",
    "emergency physician",
    "intensive care physician",
    "palliative care physician",
    "rehabilitation physician",
    "sports physician",
    "occupational physician",
    "public health physician",
    "forensic physician",
    "medical officer",
    "resident medical officer",
    "registrar",
    "resident",
    "intern",
    "medical student",
    "nursing student",
    "allied health student",
];

/// A vocabulary entry paired with its whole-phrase matcher.
pub(crate) struct VocabMatcher {
    /// The controlled vocabulary string emitted as the constraint value.
    pub term: &'static str,
    /// The compiled case-insensitive whole-phrase matcher.
    pub regex: Regex,
}

#[expect(
    clippy::expect_used,
    reason = "Escaped vocabulary terms always form valid patterns"
)]
fn vocab_matchers(terms: &[&'static str]) -> Vec<VocabMatcher> {
    terms
        .iter()
        .copied()
        .map(|term| VocabMatcher {
            term,
            regex: Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term)))
                .expect("invalid vocabulary pattern"),
        })
        .collect()
}

pub(crate) static LOCATION_MATCHERS: Lazy<Vec<VocabMatcher>> =
    Lazy::new(|| vocab_matchers(LOCATIONS));

pub(crate) static PROVIDER_MATCHERS: Lazy<Vec<VocabMatcher>> =
    Lazy::new(|| vocab_matchers(PROVIDERS));
