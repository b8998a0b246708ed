//! Core translation logic — types, normalization, parsing, selection, assembly, emission.

pub mod dependency;
pub mod emit;
pub mod normalize;
pub mod parser;
pub mod script;
pub mod selector;
pub mod types;
pub mod unit;
