//! Closest-approach selection.

/// Tabular projection, stable sort and rank assignment.
pub mod table;
