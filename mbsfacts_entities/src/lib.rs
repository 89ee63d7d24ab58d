#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Domain types for the MBS fact extraction pipeline.
//!
//! A schedule [`Item`] carries the free text a billing code is described by;
//! extraction derives [`Relation`] and [`Constraint`] facts from that text.

mod facts;
mod item;

pub use facts::{Constraint, ConstraintType, ItemAggregate, Relation, RelationType};
pub use item::Item;
