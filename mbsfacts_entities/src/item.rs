//! Schedule item records as produced by the upstream parser.

use serde::{Deserialize, Serialize};

/// One billing schedule entry.
///
/// `item_num` is a short numeric-string token and is kept as a string: the
/// schedule uses it as an opaque identifier and leading zeros / formatting
/// must survive a round trip. Everything except `item_num` is optional —
/// real schedule exports routinely omit fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// The schedule item number, e.g. `"23"` or `"16401"`.
    pub item_num: String,

    /// Schedule category code.
    #[serde(default)]
    pub category: Option<String>,

    /// Group code within the category.
    #[serde(default)]
    pub group_code: Option<String>,

    /// Schedule fee in dollars.
    #[serde(default)]
    pub schedule_fee: Option<f64>,

    /// Free-text description of the clinical service.
    #[serde(default)]
    pub description: Option<String>,

    /// Derived-fee text; may itself reference other item numbers.
    #[serde(default)]
    pub derived_fee: Option<String>,

    /// Date the item became claimable.
    #[serde(default)]
    pub start_date: Option<String>,

    /// Date the item ceased, if any.
    #[serde(default)]
    pub end_date: Option<String>,

    /// Provider class the schedule assigns to this item.
    #[serde(default)]
    pub provider_type: Option<String>,

    /// Extended Medicare Safety Net description.
    #[serde(default)]
    pub emsn_description: Option<String>,
}

impl Item {
    /// Create an item carrying only an item number.
    #[must_use]
    pub fn new(item_num: impl Into<String>) -> Self {
        Self {
            item_num: item_num.into(),
            category: None,
            group_code: None,
            schedule_fee: None,
            description: None,
            derived_fee: None,
            start_date: None,
            end_date: None,
            provider_type: None,
            emsn_description: None,
        }
    }

    /// Set the description text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the derived-fee text.
    #[must_use]
    pub fn with_derived_fee(mut self, derived_fee: impl Into<String>) -> Self {
        self.derived_fee = Some(derived_fee.into());
        self
    }

    /// Description length in bytes; zero when the description is absent.
    #[must_use]
    pub fn description_len(&self) -> usize {
        self.description.as_deref().map_or(0, str::len)
    }
}
