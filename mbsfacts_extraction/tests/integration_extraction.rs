//! Integration tests for the extraction engine and batch orchestrator.
//!
//! These tests verify the complete flow of:
//! - Relation extraction (windowed targets, list expansion, fallbacks)
//! - Constraint extraction (durations, frequencies, cooldowns, flags, vocab)
//! - Batch aggregation and the store handoff

use std::sync::Mutex;

use async_trait::async_trait;
use mbsfacts_entities::{Constraint, ConstraintType, Item, Relation, RelationType};
use mbsfacts_extraction::{BatchExtractor, ExtractionEngine, FactStore, LoadMeta};

fn relations_of(item_num: &str, description: &str) -> Vec<Relation> {
    ExtractionEngine::with_defaults().extract_relations(item_num, Some(description), None)
}

fn constraints_of(item_num: &str, description: &str) -> Vec<Constraint> {
    ExtractionEngine::with_defaults().extract_constraints(item_num, Some(description))
}

fn values_of(constraints: &[Constraint], constraint_type: ConstraintType) -> Vec<String> {
    constraints
        .iter()
        .filter(|c| c.constraint_type == constraint_type)
        .map(|c| c.value.clone())
        .collect()
}

/// A same-day exclusion phrase resolves to the exact nearby target.
#[test]
fn same_day_exclusion() {
    let rels = relations_of("23", "not on the same day as item 36");
    assert!(rels.contains(&Relation::new(
        "23",
        RelationType::SameDayExcludes,
        Some("36".into()),
        "not on the same day as item",
    )));
}

/// An `item N, M, ... or P` list expands to one exclusion per number.
#[test]
fn exclusion_items_list() {
    let rels = relations_of(
        "104",
        "other than a service to which item 106, 109, 125 or 16401 applies",
    );
    for target in ["106", "109", "125", "16401"] {
        assert!(
            rels.contains(&Relation::new(
                "104",
                RelationType::Excludes,
                Some(target.into()),
                "items list",
            )),
            "missing list exclusion to {target}"
        );
    }
}

/// A bare `item N` mention is recorded as a conservative exclusion.
///
/// This fallback over-matches on purpose: a mention is not always an
/// exclusion, but downstream eligibility checks prefer the false positive.
#[test]
fn single_item_mention_is_conservative_excludes() {
    let rels = relations_of("23", "see also item 36 for the longer attendance");
    assert!(rels.contains(&Relation::new(
        "23",
        RelationType::Excludes,
        Some("36".into()),
        "single item mention",
    )));
}

#[test]
fn no_output_ever_targets_the_source_item() {
    let texts = [
        "not on the same day as item 23",
        "other than a service to which item 23, 24 or 25 applies",
        "see item 23",
    ];
    for text in texts {
        for rel in relations_of("23", text) {
            assert_ne!(rel.target_item_num.as_deref(), Some("23"), "in: {text}");
        }
    }
}

#[test]
fn duration_constraints() {
    let cons = constraints_of("23", "lasting at least 6 minutes and less than 20 minutes");
    assert!(cons.contains(&Constraint::new("23", ConstraintType::DurationMinMinutes, "6")));
    assert!(cons.contains(&Constraint::new("23", ConstraintType::DurationMaxMinutes, "20")));
}

#[test]
fn duration_hours_and_range() {
    let cons = constraints_of(
        "200",
        "lasting at least 1 hour and 45–60 minutes for certain components",
    );
    let mins = values_of(&cons, ConstraintType::DurationMinMinutes);
    assert!(mins.iter().any(|v| v == "60"));
    assert!(mins.iter().any(|v| v == "45"));
    assert!(values_of(&cons, ConstraintType::DurationMaxMinutes).iter().any(|v| v == "60"));
}

#[test]
fn frequency_and_cooldowns() {
    let cons = constraints_of(
        "300",
        "no more than 2 services per month; once per week; not within 12 months; preceding 14 days",
    );
    let windows = values_of(&cons, ConstraintType::MaxPerWindow);
    assert!(windows.iter().any(|v| v == "2/month"));
    assert!(windows.iter().any(|v| v == "1/week"));
    assert!(values_of(&cons, ConstraintType::CooldownMonths).iter().any(|v| v == "12"));
    assert!(values_of(&cons, ConstraintType::CooldownDays).iter().any(|v| v == "14"));
}

#[test]
fn referral_and_same_occasion_and_locations() {
    let cons = constraints_of(
        "400",
        "following referral in a single course of treatment on the same occasion in emergency department by a medical practitioner",
    );
    assert!(cons.contains(&Constraint::new("400", ConstraintType::RequiresReferral, "true")));
    assert!(cons.contains(&Constraint::new(
        "400",
        ConstraintType::SingleCourseOfTreatment,
        "true"
    )));
    assert!(cons.contains(&Constraint::new("400", ConstraintType::SameOccasion, "true")));
    assert!(cons.contains(&Constraint::new(
        "400",
        ConstraintType::Location,
        "emergency department"
    )));
    assert!(cons.contains(&Constraint::new(
        "400",
        ConstraintType::Provider,
        "medical practitioner"
    )));
}

#[test]
fn complex_duration_and_frequency_combinations() {
    let cons = constraints_of(
        "800",
        "lasting approximately 40 minutes, not more than 2 services per month, within 30 days of previous service, every 14 days",
    );
    assert!(cons.contains(&Constraint::new("800", ConstraintType::DurationMinMinutes, "40")));
    assert!(values_of(&cons, ConstraintType::MaxPerWindow).iter().any(|v| v == "2/month"));
    assert!(values_of(&cons, ConstraintType::CooldownDays).iter().any(|v| v == "30"));
    assert!(values_of(&cons, ConstraintType::MaxPerWindow).iter().any(|v| v == "1/2weeks"));
}

/// Specialist and GP referral phrasings each record their own value and the
/// generic mention still records `"true"` — none suppress the others.
#[test]
fn referral_specificity() {
    let cons = constraints_of(
        "1000",
        "requires specialist referral, must be referred from gp, referral to specialist required",
    );
    let referrals = values_of(&cons, ConstraintType::RequiresReferral);
    assert!(referrals.iter().any(|v| v == "specialist"));
    assert!(referrals.iter().any(|v| v == "gp"));
    assert!(referrals.iter().any(|v| v == "true"));
}

#[test]
fn visit_type_patterns() {
    let cons = constraints_of(
        "1100",
        "first attendance only, subsequent attendance, initial visit, follow-up visit, ongoing treatment",
    );
    assert!(cons.contains(&Constraint::new("1100", ConstraintType::InitialAttendance, "true")));
    assert!(cons.contains(&Constraint::new(
        "1100",
        ConstraintType::SubsequentAttendance,
        "true"
    )));
    assert!(cons.contains(&Constraint::new(
        "1100",
        ConstraintType::Requirement,
        "continuing treatment"
    )));
}

#[test]
fn lettered_requirement_clauses() {
    let cons = constraints_of("44", "(a) taking a history; (b) examining the patient;");
    let reqs = values_of(&cons, ConstraintType::Requirement);
    assert_eq!(reqs, vec!["(a) taking a history", "(b) examining the patient"]);
}

#[test]
fn expanded_locations() {
    let text = "in the emergency department, at home, in consulting rooms, at the clinic, in the hospital, in specialist rooms, at the medical centre, in day surgery, in the ward, at the community health centre, in the mental health facility, at the rehabilitation centre, in the palliative care unit, in the maternity ward, in the paediatric ward, in the cardiac unit, in the neurology unit, in the oncology unit, in the radiology department, in the pathology laboratory, at the pharmacy, in the dental surgery, at the physiotherapy clinic, in occupational therapy, in speech therapy, at the dietitian clinic, at the psychology clinic, at the counselling centre, via telehealth, video consultation, phone consultation, remote consultation";
    let cons = constraints_of("1200", text);
    let locations = values_of(&cons, ConstraintType::Location);

    for expected in [
        "emergency department",
        "home",
        "consulting rooms",
        "clinic",
        "hospital",
        "specialist rooms",
        "medical centre",
        "day surgery",
        "ward",
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
    ] {
        assert!(
            locations.iter().any(|v| v == expected),
            "missing location {expected}"
        );
    }
}

#[test]
fn expanded_providers() {
    let text = "by a general practitioner, by a specialist, by a consultant physician, by a medical practitioner, by a practice nurse, by a gp registrar, by a diagnostic radiologist, by a surgeon, by an anaesthetist, by a psychiatrist, by a psychologist, by a physiotherapist, by an occupational therapist, by a speech therapist, by a dietitian, by a pharmacist, by a dentist, by a dental specialist, by a nurse practitioner, by a midwife, by a mental health nurse, by a community health nurse, by a palliative care nurse, by an oncology nurse, by a cardiac nurse, by a diabetes educator, by a social worker, by a counsellor, by a mental health worker, by an allied health professional, by a health professional, by a healthcare professional, by a medical specialist, by a surgical specialist, by a paediatrician, by a geriatrician, by a cardiologist, by a neurologist, by an oncologist, by a dermatologist, by an ophthalmologist, by an orthopaedic surgeon, by a plastic surgeon, by a neurosurgeon, by a cardiothoracic surgeon, by a urologist, by a gynaecologist, by an obstetrician, by an endocrinologist, by a gastroenterologist, by a respiratory physician, by a rheumatologist, by a nephrologist, by a haematologist, by a pathologist, by a radiologist, by a nuclear medicine physician, by an emergency physician, by an intensive care physician, by a palliative care physician, by a rehabilitation physician, by a sports physician, by an occupational physician, by a public health physician, by a forensic physician, by a medical officer, by a resident medical officer, by a registrar, by a resident, by an intern, by a medical student, by a nursing student, by an allied health student";
    let cons = constraints_of("1300", text);
    let providers = values_of(&cons, ConstraintType::Provider);

    for expected in [
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
    ] {
        assert!(
            providers.iter().any(|v| v == expected),
            "missing provider {expected}"
        );
    }
}

/// Running the extractors twice over identical input yields identical,
/// order-preserving output.
#[test]
fn extraction_is_idempotent() {
    let engine = ExtractionEngine::with_defaults();
    let description = Some(
        "not on the same day as item 36; lasting at least 20 minutes in consulting rooms (a) taking a history;",
    );
    let fee = Some("the fee for item 104");

    assert_eq!(
        engine.extract_relations("23", description, fee),
        engine.extract_relations("23", description, fee)
    );
    assert_eq!(
        engine.extract_constraints("23", description),
        engine.extract_constraints("23", description)
    );
}

/// The same phrase and target appearing twice collapse to one tuple.
#[test]
fn duplicate_phrase_hits_dedup_to_one_tuple() {
    let rels = relations_of(
        "23",
        "not on the same day as item 36. If claimed, not on the same day as item 36.",
    );
    let same_day: Vec<_> = rels
        .iter()
        .filter(|r| {
            r.relation_type == RelationType::SameDayExcludes
                && r.target_item_num.as_deref() == Some("36")
        })
        .collect();
    assert_eq!(same_day.len(), 1);
}

#[test]
fn empty_input_yields_empty_output() {
    let engine = ExtractionEngine::with_defaults();
    assert!(engine.extract_relations("23", None, None).is_empty());
    assert!(engine.extract_relations("23", Some(""), None).is_empty());
    assert!(engine.extract_constraints("23", None).is_empty());
    assert!(engine.extract_constraints("23", Some("")).is_empty());
}

/// In-memory store used to verify the batch handoff contract.
#[derive(Default)]
struct MemoryStore {
    relations: Mutex<Vec<Relation>>,
    constraints: Mutex<Vec<Constraint>>,
    meta: Mutex<Option<LoadMeta>>,
}

#[async_trait]
impl FactStore for MemoryStore {
    async fn insert_relations(&self, relations: &[Relation]) -> anyhow::Result<()> {
        self.relations.lock().unwrap().extend_from_slice(relations);
        Ok(())
    }

    async fn insert_constraints(&self, constraints: &[Constraint]) -> anyhow::Result<()> {
        self.constraints
            .lock()
            .unwrap()
            .extend_from_slice(constraints);
        Ok(())
    }

    async fn insert_meta(&self, meta: &LoadMeta) -> anyhow::Result<()> {
        *self.meta.lock().unwrap() = Some(meta.clone());
        Ok(())
    }
}

#[tokio::test]
async fn batch_hands_off_flat_batches_and_meta() {
    let items = vec![
        Item::new("23").with_description("not on the same day as item 36"),
        Item::new("300").with_description("once per lifetime"),
    ];
    let store = MemoryStore::default();

    let outcome = BatchExtractor::with_defaults()
        .run_and_store(&items, &store, "schedule.jsonl")
        .await
        .unwrap();

    assert_eq!(*store.relations.lock().unwrap(), outcome.relations);
    assert_eq!(*store.constraints.lock().unwrap(), outcome.constraints);

    let meta = store.meta.lock().unwrap().clone().unwrap();
    assert_eq!(meta.source_path, "schedule.jsonl");
    assert_eq!(meta.item_count, 2);
    assert_eq!(meta.relation_count, outcome.relations.len());
    assert_eq!(meta.constraint_count, outcome.constraints.len());
}
