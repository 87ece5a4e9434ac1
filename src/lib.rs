//! Learning value transformations from a handful of input-output examples.
//!
//! This crate infers a transformation from a few demonstrations and applies it to new inputs, in
//! the spirit of fill-by-example features in spreadsheets. Rather than searching a single program
//! space, it keeps an ensemble of small *theories* (case changes, memorization, constant
//! wrappers, dropped characters, per-character substitutions, field selection) and trusts
//! whichever one cross-validates best on the examples at hand. Structural theories peel a wrapper
//! off the problem and hand the rest to a nested ensemble, so simple theories compose into
//! transformations such as the one in the following table:
//!
//! | Input | Output |
//! |---|---|
//! | hi | ...Hi!!! |
//! | you | ...You!!! |
//! | green | ? |
//!
//! The following example uses [`Rule`] to learn the above transformation and apply it to the
//! input with unknown output (the last row in the table).
//!
//! ```
//! use smalldata::{MuseFactory, Rule, Value};
//!
//! # fn main() -> smalldata::Result<()> {
//! let examples = &[("hi",  "...Hi!!!"),
//!                  ("you", "...You!!!")];
//!
//! // the factory decides which theories every (nested) ensemble is made of
//! let rule = Rule::learn(&MuseFactory::standard(), examples)?;
//!
//! // one answer per input; None where no theory is willing to answer
//! let result = rule.apply(&["green"])?;
//! assert_eq!(result, vec![Some(Value::from("...Green!!!"))]);
//! # Ok(())
//! # }
//! ```
//!
//! For finer control, spawn a [`Muse`] from a [`MuseFactory`] and drive the [`Theory`] interface
//! directly. Additional theories, such as lookups against an external data source, can be
//! registered on a [`Registry`] and become candidates in every ensemble the factory spawns.

#![doc(html_root_url = "https://docs.rs/smalldata/0.1.0")]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod muse;
mod rule;
pub mod theories;
mod theory;
pub mod value;

pub use config::{Config, Registry};
pub use error::{Error, Result};
pub use muse::{Muse, MuseFactory, ScoredTheory};
pub use rule::Rule;
pub use theory::{Prediction, Theory};
pub use value::{flags, Context, Example, Input, Output, Value};
