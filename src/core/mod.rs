//! Core generation machinery: transition model, provenance index,
//! constrained generator, semantic steering, and corpus orchestration.

pub mod corpus;
pub mod generate;
pub mod index;
pub mod model;
pub mod semantic;
