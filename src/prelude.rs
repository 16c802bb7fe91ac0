//! Satchel prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{Catalog, CatalogError, PreparationError, Prepared, RETURN_SCALE, Share},
    fixtures::{Fixture, FixtureError},
    items::Item,
    report::{Report, ReportError},
    solvers::{
        ItemField, Solution, Solver, SolverError,
        dynamic::{DynamicSolver, SolverConfig, Strategy, table::ValueTable},
    },
};
