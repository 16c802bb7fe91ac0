//! Satchel
//!
//! Satchel picks the shares that earn the most within a budget. Each share is
//! bought at most once, so the choice is an exact 0/1 knapsack, solved by dynamic
//! programming over integer minor units.

pub mod catalog;
pub mod fixtures;
pub mod items;
pub mod prelude;
pub mod report;
pub mod solvers;
pub mod utils;
