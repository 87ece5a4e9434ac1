//! The candidate theories an ensemble is composed of.
//!
//! Leaf theories ([`SimpleTheory`], [`Memorization`], [`Constant`]) answer directly. The others
//! reduce the problem and hand it to a nested ensemble obtained from a
//! [`MuseFactory`](crate::MuseFactory): [`PatternTheory`] strips a structural wrapper,
//! [`FragmentTheory`] cuts strings into windows, and [`FieldTheory`] and [`TransformTheory`]
//! project inputs.

mod field;
mod fragment;
mod memory;
mod pattern;
mod simple;
mod transform;

pub use field::{FieldSelect, FieldTheory};
pub use fragment::FragmentTheory;
pub use memory::{Constant, Memorization};
pub use pattern::{
    PatternState, PatternTheory, PatternTool, PrefixTool, RemovalTool, SuffixTool, TrimTool,
};
pub use simple::SimpleTheory;
pub use transform::{Transform, TransformTheory};
