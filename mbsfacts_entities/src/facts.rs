//! Extracted fact types.
//!
//! Facts are plain tuples of strings plus a closed type enum. They carry no
//! identity of their own: two facts with equal fields are the same fact, and
//! a reload recomputes them from scratch. The enums serialize to the exact
//! snake_case strings the downstream store keys on.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of directed link between two schedule items.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum RelationType {
    /// The source item cannot be claimed together with the target.
    Excludes = 0,
    /// The source item cannot be claimed on the same day as the target.
    SameDayExcludes = 1,
    /// The source item is explicitly claimable on the same day as the target.
    AllowsSameDay = 2,
    /// The target must have been provided before the source applies.
    Prerequisite = 3,
    /// The source's fee is calculated with reference to the target's fee.
    DerivedFeeRef = 4,
    /// Exclusion language with no identifiable concrete target.
    GenericExcludes = 5,
}

impl RelationType {
    /// Returns the string representation of this relation type.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Excludes => "excludes",
            Self::SameDayExcludes => "same_day_excludes",
            Self::AllowsSameDay => "allows_same_day",
            Self::Prerequisite => "prerequisite",
            Self::DerivedFeeRef => "derived_fee_ref",
            Self::GenericExcludes => "generic_excludes",
        }
    }
}

impl FromStr for RelationType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excludes" => Ok(Self::Excludes),
            "same_day_excludes" => Ok(Self::SameDayExcludes),
            "allows_same_day" => Ok(Self::AllowsSameDay),
            "prerequisite" => Ok(Self::Prerequisite),
            "derived_fee_ref" => Ok(Self::DerivedFeeRef),
            "generic_excludes" => Ok(Self::GenericExcludes),
            _ => Err("unknown relation type"),
        }
    }
}

/// The kind of applicability condition on a single schedule item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ConstraintType {
    /// Claimable once in a patient's lifetime.
    OncePerLifetime = 0,
    /// At most N services in any 12-month window.
    #[serde(rename = "max_per_12_months")]
    MaxPer12Months = 1,
    /// Frequency cap, value like `"1/day"` or `"2/month"`.
    MaxPerWindow = 2,
    /// Months that must elapse since the prior service.
    CooldownMonths = 3,
    /// Days that must elapse since the prior service.
    CooldownDays = 4,
    /// Weeks that must elapse since the prior service.
    CooldownWeeks = 5,
    /// Years that must elapse since the prior service.
    CooldownYears = 6,
    /// The companion service must occur on the same day.
    SameDayOnly = 7,
    /// The companion service must occur on the same occasion/visit.
    SameOccasion = 8,
    /// Where the service must be provided, from the location vocabulary.
    Location = 9,
    /// Minimum duration in minutes.
    DurationMinMinutes = 10,
    /// Maximum duration in minutes.
    DurationMaxMinutes = 11,
    /// Who must provide the service, from the provider vocabulary.
    Provider = 12,
    /// Minimum patient age in years.
    AgeMinYears = 13,
    /// Maximum patient age in years.
    AgeMaxYears = 14,
    /// Service is (or may be) delivered by telehealth.
    Telehealth = 15,
    /// Free-text requirement clause, e.g. a lettered `(a) ...` clause.
    Requirement = 16,
    /// Referral needed; value `"true"`, `"specialist"` or `"gp"`.
    RequiresReferral = 17,
    /// Applies to the initial/first attendance.
    InitialAttendance = 18,
    /// Applies to a subsequent/follow-up attendance.
    SubsequentAttendance = 19,
    /// Applies within a single course of treatment.
    SingleCourseOfTreatment = 20,
}

impl ConstraintType {
    /// Returns the string representation of this constraint type.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::OncePerLifetime => "once_per_lifetime",
            Self::MaxPer12Months => "max_per_12_months",
            Self::MaxPerWindow => "max_per_window",
            Self::CooldownMonths => "cooldown_months",
            Self::CooldownDays => "cooldown_days",
            Self::CooldownWeeks => "cooldown_weeks",
            Self::CooldownYears => "cooldown_years",
            Self::SameDayOnly => "same_day_only",
            Self::SameOccasion => "same_occasion",
            Self::Location => "location",
            Self::DurationMinMinutes => "duration_min_minutes",
            Self::DurationMaxMinutes => "duration_max_minutes",
            Self::Provider => "provider",
            Self::AgeMinYears => "age_min_years",
            Self::AgeMaxYears => "age_max_years",
            Self::Telehealth => "telehealth",
            Self::Requirement => "requirement",
            Self::RequiresReferral => "requires_referral",
            Self::InitialAttendance => "initial_attendance",
            Self::SubsequentAttendance => "subsequent_attendance",
            Self::SingleCourseOfTreatment => "single_course_of_treatment",
        }
    }
}

impl FromStr for ConstraintType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "once_per_lifetime" => Ok(Self::OncePerLifetime),
            "max_per_12_months" => Ok(Self::MaxPer12Months),
            "max_per_window" => Ok(Self::MaxPerWindow),
            "cooldown_months" => Ok(Self::CooldownMonths),
            "cooldown_days" => Ok(Self::CooldownDays),
            "cooldown_weeks" => Ok(Self::CooldownWeeks),
            "cooldown_years" => Ok(Self::CooldownYears),
            "same_day_only" => Ok(Self::SameDayOnly),
            "same_occasion" => Ok(Self::SameOccasion),
            "location" => Ok(Self::Location),
            "duration_min_minutes" => Ok(Self::DurationMinMinutes),
            "duration_max_minutes" => Ok(Self::DurationMaxMinutes),
            "provider" => Ok(Self::Provider),
            "age_min_years" => Ok(Self::AgeMinYears),
            "age_max_years" => Ok(Self::AgeMaxYears),
            "telehealth" => Ok(Self::Telehealth),
            "requirement" => Ok(Self::Requirement),
            "requires_referral" => Ok(Self::RequiresReferral),
            "initial_attendance" => Ok(Self::InitialAttendance),
            "subsequent_attendance" => Ok(Self::SubsequentAttendance),
            "single_course_of_treatment" => Ok(Self::SingleCourseOfTreatment),
            _ => Err("unknown constraint type"),
        }
    }
}

/// A directed fact linking one item to another (or to no target).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Relation {
    /// The item whose description produced this fact.
    pub item_num: String,

    /// What kind of link this is.
    pub relation_type: RelationType,

    /// The referenced item; `None` only for [`RelationType::GenericExcludes`].
    pub target_item_num: Option<String>,

    /// The phrase (or fallback marker) that triggered the fact.
    pub detail: Option<String>,
}

impl Relation {
    /// Create a relation fact.
    #[must_use]
    pub fn new(
        item_num: impl Into<String>,
        relation_type: RelationType,
        target_item_num: Option<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            item_num: item_num.into(),
            relation_type,
            target_item_num,
            detail: Some(detail.into()),
        }
    }
}

/// An applicability condition on a single item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Constraint {
    /// The item the condition applies to.
    pub item_num: String,

    /// What kind of condition this is.
    pub constraint_type: ConstraintType,

    /// Normalized value text, e.g. `"20"`, `"1/week"`, `"hospital"`.
    pub value: String,
}

impl Constraint {
    /// Create a constraint fact.
    #[must_use]
    pub fn new(
        item_num: impl Into<String>,
        constraint_type: ConstraintType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            item_num: item_num.into(),
            constraint_type,
            value: value.into(),
        }
    }
}

/// An item together with everything extracted from its description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemAggregate {
    /// The schedule item.
    pub item: crate::Item,

    /// Relations extracted from the item's text.
    pub relations: Vec<Relation>,

    /// Constraints extracted from the item's text.
    pub constraints: Vec<Constraint>,
}

impl ItemAggregate {
    /// Group this item's constraints by type for display.
    ///
    /// Groups appear in first-seen order of the constraint list, and each
    /// group keeps its constraints in extraction order.
    #[must_use]
    pub fn constraints_by_type(&self) -> Vec<(ConstraintType, Vec<&Constraint>)> {
        let mut groups: Vec<(ConstraintType, Vec<&Constraint>)> = Vec::new();
        for constraint in &self.constraints {
            match groups
                .iter_mut()
                .find(|(ty, _)| *ty == constraint.constraint_type)
            {
                Some((_, bucket)) => bucket.push(constraint),
                None => groups.push((constraint.constraint_type, vec![constraint])),
            }
        }
        groups
    }
}
