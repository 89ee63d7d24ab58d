//! Constraint extraction: standalone applicability facts from description text.
//!
//! Unlike relations, constraints need no nearby target; each category scans
//! the whole description and normalizes whatever it captures. Emission order
//! is fixed so the final first-seen dedup is deterministic.

use mbsfacts_entities::{Constraint, ConstraintType};

use crate::patterns::{
    AFTER_PERIOD, AGE_MAX, AGE_MIN, CONTINUING_TREATMENT, COOLDOWN_GENERIC, DURATION_ABOUT,
    DURATION_APPROXIMATE, DURATION_EXACT_HOURS, DURATION_MAX, DURATION_MIN, DURATION_MIN_HOURS,
    DURATION_OR_LESS, DURATION_OR_MORE, DURATION_RANGE, EVERY_PERIOD, FIRST_VISIT, FOLLOW_UP,
    GP_REFERRAL, INITIAL_ATTENDANCE, LETTERED_CLAUSES, MAX_PER_WINDOW, MAX_TIMES_IN_WINDOW,
    NOT_MORE_THAN_PER_DAY, NOT_MORE_THAN_PER_MONTH, NOT_MORE_THAN_PER_WEEK,
    NOT_MORE_THAN_PER_YEAR, ONCE_PER_LIFETIME, ONCE_PER_WINDOW, PRECEDING_MONTHS, REFERRAL,
    REFERRAL_REQUIRED, SAME_DAY_ONLY, SAME_OCCASION, SINGLE_COURSE, SPECIALIST_REFERRAL,
    SUBSEQUENT_ATTENDANCE, TELEHEALTH, TREATMENT_PLAN, WITHIN_PERIOD,
};
use crate::relations::dedup_first_seen;
use crate::vocab::{LOCATION_MATCHERS, PROVIDER_MATCHERS};

/// Extract constraint facts from an item's description.
///
/// Pure function of its inputs; absent text yields no facts.
pub(crate) fn extract_constraints(item_num: &str, description: Option<&str>) -> Vec<Constraint> {
    let text = description.unwrap_or_default();
    let mut constraints: Vec<Constraint> = Vec::new();
    let mut push = |constraint_type: ConstraintType, value: String| {
        constraints.push(Constraint::new(item_num, constraint_type, value));
    };

    if ONCE_PER_LIFETIME.is_match(text) {
        push(ConstraintType::OncePerLifetime, "true".into());
    }

    if let Some(caps) = PRECEDING_MONTHS.captures(text) {
        if let Some(months) = caps.get(1) {
            push(ConstraintType::CooldownMonths, months.as_str().into());
        }
    }

    // Only the common 12-month window gets its own dedicated type.
    if let Some(caps) = MAX_TIMES_IN_WINDOW.captures(text) {
        if let (Some(max_times), Some(months)) = (caps.get(1), caps.get(2)) {
            if months.as_str() == "12" {
                push(ConstraintType::MaxPer12Months, max_times.as_str().into());
            }
        }
    }

    // General frequency windows.
    for caps in MAX_PER_WINDOW.captures_iter(text) {
        if let (Some(count), Some(unit)) = (caps.get(1), caps.get(2)) {
            let unit = unit.as_str().to_lowercase();
            push(
                ConstraintType::MaxPerWindow,
                format!("{}/{unit}", count.as_str()),
            );
        }
    }
    for caps in ONCE_PER_WINDOW.captures_iter(text) {
        if let Some(unit) = caps.get(1) {
            let unit = unit.as_str().to_lowercase();
            push(ConstraintType::MaxPerWindow, format!("1/{unit}"));
        }
    }

    // Generic cooldowns.
    for caps in COOLDOWN_GENERIC.captures_iter(text) {
        if let (Some(amount), Some(unit)) = (caps.get(1), caps.get(2)) {
            if let Some(constraint_type) = cooldown_type(unit.as_str()) {
                push(constraint_type, amount.as_str().into());
            }
        }
    }

    if SAME_DAY_ONLY.is_match(text) {
        push(ConstraintType::SameDayOnly, "true".into());
    }

    if SAME_OCCASION.is_match(text) {
        push(ConstraintType::SameOccasion, "true".into());
    }

    // Durations. A range yields both bounds; hour captures convert to
    // minutes; a bare hours mention is taken as a minimum.
    if let Some(caps) = DURATION_RANGE.captures(text) {
        if let (Some(min), Some(max)) = (caps.get(1), caps.get(2)) {
            push(ConstraintType::DurationMinMinutes, min.as_str().into());
            push(ConstraintType::DurationMaxMinutes, max.as_str().into());
        }
    }

    if let Some(caps) = DURATION_MIN.captures(text) {
        if let Some(minutes) = caps.get(1) {
            push(ConstraintType::DurationMinMinutes, minutes.as_str().into());
        }
    }

    for caps in DURATION_MIN_HOURS.captures_iter(text) {
        if let Some(hours) = caps.get(1) {
            push(
                ConstraintType::DurationMinMinutes,
                minutes_from_hours(hours.as_str()).to_string(),
            );
        }
    }
    for caps in DURATION_EXACT_HOURS.captures_iter(text) {
        if let Some(hours) = caps.get(1) {
            push(
                ConstraintType::DurationMinMinutes,
                minutes_from_hours(hours.as_str()).to_string(),
            );
        }
    }

    if let Some(caps) = DURATION_MAX.captures(text) {
        if let Some(minutes) = caps.get(1) {
            push(ConstraintType::DurationMaxMinutes, minutes.as_str().into());
        }
    }

    for caps in DURATION_APPROXIMATE.captures_iter(text) {
        if let Some(minutes) = caps.get(1) {
            push(ConstraintType::DurationMinMinutes, minutes.as_str().into());
        }
    }
    for caps in DURATION_ABOUT.captures_iter(text) {
        if let Some(minutes) = caps.get(1) {
            push(ConstraintType::DurationMinMinutes, minutes.as_str().into());
        }
    }
    for caps in DURATION_OR_MORE.captures_iter(text) {
        if let Some(minutes) = caps.get(1) {
            push(ConstraintType::DurationMinMinutes, minutes.as_str().into());
        }
    }
    for caps in DURATION_OR_LESS.captures_iter(text) {
        if let Some(minutes) = caps.get(1) {
            push(ConstraintType::DurationMaxMinutes, minutes.as_str().into());
        }
    }

    // `every N <unit>` canonicalizes day counts to the tightest window name.
    for caps in EVERY_PERIOD.captures_iter(text) {
        if let (Some(count), Some(unit)) = (caps.get(1), caps.get(2)) {
            let count = count.as_str();
            let unit = unit.as_str().to_lowercase();
            if unit == "day" && count != "1" {
                let value = match count {
                    "7" => "1/week".to_string(),
                    "14" => "1/2weeks".to_string(),
                    _ => format!("1/{count}days"),
                };
                push(ConstraintType::MaxPerWindow, value);
            } else {
                push(ConstraintType::MaxPerWindow, format!("1/{unit}"));
            }
        }
    }
    for caps in NOT_MORE_THAN_PER_YEAR.captures_iter(text) {
        if let Some(count) = caps.get(1) {
            push(ConstraintType::MaxPerWindow, format!("{}/year", count.as_str()));
        }
    }
    for caps in NOT_MORE_THAN_PER_MONTH.captures_iter(text) {
        if let Some(count) = caps.get(1) {
            push(ConstraintType::MaxPerWindow, format!("{}/month", count.as_str()));
        }
    }
    for caps in NOT_MORE_THAN_PER_WEEK.captures_iter(text) {
        if let Some(count) = caps.get(1) {
            push(ConstraintType::MaxPerWindow, format!("{}/week", count.as_str()));
        }
    }
    for caps in NOT_MORE_THAN_PER_DAY.captures_iter(text) {
        if let Some(count) = caps.get(1) {
            push(ConstraintType::MaxPerWindow, format!("{}/day", count.as_str()));
        }
    }

    // `within N <unit>` / `after N <unit>` cooldowns.
    for caps in WITHIN_PERIOD.captures_iter(text) {
        if let (Some(amount), Some(unit)) = (caps.get(1), caps.get(2)) {
            if let Some(constraint_type) = cooldown_type(unit.as_str()) {
                push(constraint_type, amount.as_str().into());
            }
        }
    }
    for caps in AFTER_PERIOD.captures_iter(text) {
        if let (Some(amount), Some(unit)) = (caps.get(1), caps.get(2)) {
            if let Some(constraint_type) = cooldown_type(unit.as_str()) {
                push(constraint_type, amount.as_str().into());
            }
        }
    }

    // Controlled vocabularies: every hit emits its own constraint.
    for matcher in LOCATION_MATCHERS.iter() {
        if matcher.regex.is_match(text) {
            push(ConstraintType::Location, matcher.term.into());
        }
    }
    for matcher in PROVIDER_MATCHERS.iter() {
        if matcher.regex.is_match(text) {
            push(ConstraintType::Provider, matcher.term.into());
        }
    }

    // Lettered requirement clauses `(a) ...;`.
    for caps in LETTERED_CLAUSES.captures_iter(text) {
        if let (Some(letter), Some(clause)) = (caps.get(1), caps.get(2)) {
            let letter = letter.as_str().to_lowercase();
            let clause = clause.as_str().trim();
            if !clause.is_empty() {
                push(ConstraintType::Requirement, format!("({letter}) {clause}"));
            }
        }
    }

    // Referral, attendance-type and course flags. The specific referral
    // variants never suppress the generic one; each records its own value.
    if REFERRAL.is_match(text) {
        push(ConstraintType::RequiresReferral, "true".into());
    }
    if INITIAL_ATTENDANCE.is_match(text) {
        push(ConstraintType::InitialAttendance, "true".into());
    }
    if SUBSEQUENT_ATTENDANCE.is_match(text) {
        push(ConstraintType::SubsequentAttendance, "true".into());
    }
    if SINGLE_COURSE.is_match(text) {
        push(ConstraintType::SingleCourseOfTreatment, "true".into());
    }

    if REFERRAL_REQUIRED.is_match(text) {
        push(ConstraintType::RequiresReferral, "true".into());
    }
    if SPECIALIST_REFERRAL.is_match(text) {
        push(ConstraintType::RequiresReferral, "specialist".into());
    }
    if GP_REFERRAL.is_match(text) {
        push(ConstraintType::RequiresReferral, "gp".into());
    }
    if TREATMENT_PLAN.is_match(text) {
        push(ConstraintType::Requirement, "treatment plan required".into());
    }
    if CONTINUING_TREATMENT.is_match(text) {
        push(ConstraintType::Requirement, "continuing treatment".into());
    }
    if FIRST_VISIT.is_match(text) {
        push(ConstraintType::InitialAttendance, "true".into());
    }
    if FOLLOW_UP.is_match(text) {
        push(ConstraintType::SubsequentAttendance, "true".into());
    }

    // Age bounds: take whichever alternation branch captured.
    for caps in AGE_MIN.captures_iter(text) {
        if let Some(years) = caps.iter().skip(1).flatten().next() {
            push(ConstraintType::AgeMinYears, years.as_str().into());
        }
    }
    for caps in AGE_MAX.captures_iter(text) {
        if let Some(years) = caps.iter().skip(1).flatten().next() {
            push(ConstraintType::AgeMaxYears, years.as_str().into());
        }
    }

    if TELEHEALTH.is_match(text) {
        push(ConstraintType::Telehealth, "true".into());
    }

    dedup_first_seen(constraints)
}

/// Map a captured period unit onto its cooldown constraint type.
fn cooldown_type(unit: &str) -> Option<ConstraintType> {
    let unit = unit.to_lowercase();
    if unit.starts_with("day") {
        Some(ConstraintType::CooldownDays)
    } else if unit.starts_with("week") {
        Some(ConstraintType::CooldownWeeks)
    } else if unit.starts_with("month") {
        Some(ConstraintType::CooldownMonths)
    } else if unit.starts_with("year") {
        Some(ConstraintType::CooldownYears)
    } else {
        None
    }
}

/// Convert an hour count captured as text into minutes.
///
/// Captures are digit-only, so the only parse failure is overflow; that
/// degrades to zero rather than discarding the surrounding fact.
fn minutes_from_hours(raw: &str) -> u64 {
    raw.parse::<u64>().map_or(0, |hours| hours.saturating_mul(60))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values_of(constraints: &[Constraint], constraint_type: ConstraintType) -> Vec<&str> {
        constraints
            .iter()
            .filter(|c| c.constraint_type == constraint_type)
            .map(|c| c.value.as_str())
            .collect()
    }

    #[test]
    fn duration_min_and_max() {
        let cons = extract_constraints(
            "23",
            Some("lasting at least 6 minutes and less than 20 minutes"),
        );
        assert!(cons.contains(&Constraint::new("23", ConstraintType::DurationMinMinutes, "6")));
        assert!(cons.contains(&Constraint::new("23", ConstraintType::DurationMaxMinutes, "20")));
    }

    #[test]
    fn hours_convert_to_minutes_and_ranges_emit_both_bounds() {
        let cons = extract_constraints(
            "200",
            Some("lasting at least 1 hour and 45–60 minutes for certain components"),
        );
        let mins = values_of(&cons, ConstraintType::DurationMinMinutes);
        assert!(mins.contains(&"60"));
        assert!(mins.contains(&"45"));
        assert!(values_of(&cons, ConstraintType::DurationMaxMinutes).contains(&"60"));
    }

    #[test]
    fn approximate_about_or_more_or_less() {
        let cons = extract_constraints(
            "500",
            Some("approximately 30 minutes, about 45 minutes, 20 minutes or more, 60 minutes or less"),
        );
        let mins = values_of(&cons, ConstraintType::DurationMinMinutes);
        assert!(mins.contains(&"30"));
        assert!(mins.contains(&"45"));
        assert!(mins.contains(&"20"));
        assert!(values_of(&cons, ConstraintType::DurationMaxMinutes).contains(&"60"));
    }

    #[test]
    fn frequency_windows_and_cooldowns() {
        let cons = extract_constraints(
            "300",
            Some("no more than 2 services per month; once per week; not within 12 months; preceding 14 days"),
        );
        let windows = values_of(&cons, ConstraintType::MaxPerWindow);
        assert!(windows.contains(&"2/month"));
        assert!(windows.contains(&"1/week"));
        assert!(values_of(&cons, ConstraintType::CooldownMonths).contains(&"12"));
        assert!(values_of(&cons, ConstraintType::CooldownDays).contains(&"14"));
    }

    #[test]
    fn every_n_days_is_canonicalized() {
        let cons = extract_constraints("600", Some("every 7 days and then every 14 days"));
        let windows = values_of(&cons, ConstraintType::MaxPerWindow);
        assert!(windows.contains(&"1/week"));
        assert!(windows.contains(&"1/2weeks"));

        let cons = extract_constraints("601", Some("every 10 days"));
        assert!(values_of(&cons, ConstraintType::MaxPerWindow).contains(&"1/10days"));

        let cons = extract_constraints("602", Some("every 2 months"));
        assert!(values_of(&cons, ConstraintType::MaxPerWindow).contains(&"1/month"));
    }

    #[test]
    fn within_and_after_cooldowns_cover_all_units() {
        let cons = extract_constraints(
            "700",
            Some("within 14 days, within 2 weeks, within 6 months, within 1 year, after 7 days, after 3 weeks, after 12 months, after 2 years"),
        );
        let days = values_of(&cons, ConstraintType::CooldownDays);
        assert!(days.contains(&"14") && days.contains(&"7"));
        let weeks = values_of(&cons, ConstraintType::CooldownWeeks);
        assert!(weeks.contains(&"2") && weeks.contains(&"3"));
        let months = values_of(&cons, ConstraintType::CooldownMonths);
        assert!(months.contains(&"6") && months.contains(&"12"));
        let years = values_of(&cons, ConstraintType::CooldownYears);
        assert!(years.contains(&"1") && years.contains(&"2"));
    }

    #[test]
    fn referral_variants_do_not_suppress_each_other() {
        let cons = extract_constraints(
            "1000",
            Some("requires specialist referral, must be referred from gp, referral to specialist required"),
        );
        let referrals = values_of(&cons, ConstraintType::RequiresReferral);
        assert!(referrals.contains(&"true"));
        assert!(referrals.contains(&"specialist"));
        assert!(referrals.contains(&"gp"));
    }

    #[test]
    fn lettered_clauses_become_requirements() {
        let cons = extract_constraints(
            "44",
            Some("(a) taking a history; (b) examining the patient;"),
        );
        let reqs = values_of(&cons, ConstraintType::Requirement);
        assert_eq!(reqs, vec!["(a) taking a history", "(b) examining the patient"]);
    }

    #[test]
    fn age_bounds_pick_the_populated_branch() {
        let cons = extract_constraints(
            "900",
            Some("the patient is at least 4 years old but under 18 years, or aged 65 years or older"),
        );
        let min = values_of(&cons, ConstraintType::AgeMinYears);
        assert!(min.contains(&"4"));
        assert!(min.contains(&"65"));
        assert!(values_of(&cons, ConstraintType::AgeMaxYears).contains(&"18"));
    }

    #[test]
    fn flags_are_presence_checks() {
        let cons = extract_constraints(
            "400",
            Some("once per lifetime, on the same day, same occasion, telehealth, single course of treatment"),
        );
        for constraint_type in [
            ConstraintType::OncePerLifetime,
            ConstraintType::SameDayOnly,
            ConstraintType::SameOccasion,
            ConstraintType::Telehealth,
            ConstraintType::SingleCourseOfTreatment,
        ] {
            assert!(
                values_of(&cons, constraint_type).contains(&"true"),
                "missing flag {constraint_type:?}"
            );
        }
    }

    #[test]
    fn max_times_in_window_only_maps_twelve_months() {
        let cons = extract_constraints("12", Some("maximum of 3 services in 12 months"));
        assert!(values_of(&cons, ConstraintType::MaxPer12Months).contains(&"3"));

        let cons = extract_constraints("12", Some("maximum of 3 services in 6 months"));
        assert!(values_of(&cons, ConstraintType::MaxPer12Months).is_empty());
    }

    #[test]
    fn vocabulary_hits_emit_one_constraint_each() {
        let cons = extract_constraints(
            "1400",
            Some("in the emergency department or consulting rooms by a general practitioner"),
        );
        let locations = values_of(&cons, ConstraintType::Location);
        assert!(locations.contains(&"emergency department"));
        assert!(locations.contains(&"consulting rooms"));
        assert!(values_of(&cons, ConstraintType::Provider).contains(&"general practitioner"));
    }

    #[test]
    fn empty_description_yields_no_constraints() {
        assert!(extract_constraints("23", None).is_empty());
        assert!(extract_constraints("23", Some("")).is_empty());
    }

    #[test]
    fn minutes_from_hours_converts_and_saturates() {
        assert_eq!(minutes_from_hours("2"), 120);
        assert_eq!(minutes_from_hours("99999999999999999999"), 0);
    }
}
