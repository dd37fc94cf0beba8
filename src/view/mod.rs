//! Pure projections over the task snapshot.
//!
//! Each view is a function from entity slices to a render-ready structure.
//! No I/O happens here; rendering lives with the CLI.

pub mod board;
pub mod gantt;
pub mod table;
