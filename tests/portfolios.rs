//! End-to-end checks over the bundled portfolio fixtures

use rust_decimal::Decimal;
use rusty_money::{Money, iso::EUR};
use testresult::TestResult;

use satchel::{catalog::RejectReason, prelude::*};

#[test]
fn training_portfolio_finds_best_return() -> TestResult {
    let fixture = Fixture::from_set("training")?;
    let catalog = fixture.catalog()?;
    let prepared = catalog.prepare()?;
    let budget = catalog.budget_units(&fixture.budget()?)?;

    assert_eq!(prepared.items().len(), 20);
    assert!(prepared.rejected().is_empty());

    let solution = DynamicSolver::default().solve(prepared.items(), budget)?;
    let report = Report::from_solution(&catalog, &prepared, &solution, budget)?;

    let mut names: Vec<&str> = solution.selected_items().map(Item::id).collect();
    names.sort_unstable();

    assert_eq!(
        names,
        [
            "Action-10",
            "Action-11",
            "Action-13",
            "Action-18",
            "Action-19",
            "Action-20",
            "Action-4",
            "Action-5",
            "Action-6",
            "Action-8",
        ]
    );
    assert_eq!(report.best_return(), Decimal::new(9908, 2));
    assert_eq!(report.total_cost(), Money::from_minor(49_800, EUR));
    assert_eq!(report.remaining(), Money::from_minor(200, EUR));

    Ok(())
}

#[test]
fn training_portfolio_compact_matches_full_table() -> TestResult {
    let fixture = Fixture::from_set("training")?;
    let catalog = fixture.catalog()?;
    let prepared = catalog.prepare()?;
    let budget = catalog.budget_units(&fixture.budget()?)?;

    let full = DynamicSolver::new(SolverConfig::full_table()).solve(prepared.items(), budget)?;
    let compact = DynamicSolver::new(SolverConfig::compact()).solve(prepared.items(), budget)?;

    assert_eq!(full, compact);

    Ok(())
}

#[test]
fn small_portfolio_rejects_bad_records() -> TestResult {
    let fixture = Fixture::from_set("small")?;
    let catalog = fixture.catalog()?;
    let prepared = catalog.prepare()?;

    let ids: Vec<&str> = prepared.items().iter().map(Item::id).collect();
    assert_eq!(ids, ["Share-GRUT", "Share-KMTG", "Share-XJMO"]);

    let reasons: Vec<RejectReason> = prepared
        .rejected()
        .iter()
        .map(|rejection| rejection.reason)
        .collect();
    assert_eq!(
        reasons,
        [
            RejectReason::NonPositivePrice,
            RejectReason::Duplicate,
            RejectReason::NonPositiveRate,
        ]
    );

    let budget = catalog.budget_units(&fixture.budget()?)?;
    let solution = DynamicSolver::default().solve(prepared.items(), budget)?;
    let report = Report::from_solution(&catalog, &prepared, &solution, budget)?;

    assert_eq!(report.best_return(), Decimal::new(196_611_192, 6));
    assert_eq!(report.best_return_money()?, Money::from_minor(19_661, EUR));

    Ok(())
}

#[test]
fn cell_limit_guards_large_budgets() -> TestResult {
    let fixture = Fixture::from_set("training")?;
    let catalog = fixture.catalog()?;
    let prepared = catalog.prepare()?;
    let budget = catalog.budget_units(&fixture.budget()?)?;

    let solver = DynamicSolver::new(SolverConfig::compact().with_max_cells(10_000));

    assert!(matches!(
        solver.solve(prepared.items(), budget),
        Err(SolverError::TableTooLarge { limit: 10_000, .. })
    ));

    Ok(())
}
