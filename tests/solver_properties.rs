//! Property checks for the dynamic solver against exhaustive enumeration

use rand::{Rng, SeedableRng, rngs::StdRng};
use testresult::TestResult;

use satchel::prelude::*;

fn random_items(rng: &mut StdRng, n: usize) -> Vec<Item> {
    (0..n)
        .map(|idx| {
            Item::new(
                format!("Share-{idx}"),
                rng.gen_range(1..=60),
                rng.gen_range(0..=40),
            )
        })
        .collect()
}

/// Best return by trying every subset.
fn brute_force(items: &[Item], budget: i64) -> i64 {
    (0_u32..1 << items.len())
        .filter_map(|mask| {
            let chosen = items
                .iter()
                .enumerate()
                .filter(|(idx, _)| mask & (1 << idx) != 0)
                .map(|(_, item)| item);

            let (cost, value) = chosen.fold((0, 0), |(cost, value), item| {
                (cost + item.cost(), value + item.return_value())
            });

            (cost <= budget).then_some(value)
        })
        .max()
        .unwrap_or(0)
}

fn solvers() -> [DynamicSolver; 2] {
    [
        DynamicSolver::new(SolverConfig::full_table()),
        DynamicSolver::new(SolverConfig::compact()),
    ]
}

#[test]
fn matches_exhaustive_search_on_random_instances() -> TestResult {
    let mut rng = StdRng::seed_from_u64(0x5A7C_4E1);

    for _ in 0..200 {
        let n = rng.gen_range(0..=12);
        let items = random_items(&mut rng, n);
        let budget = rng.gen_range(0..=200);

        let expected = brute_force(&items, budget);

        for solver in solvers() {
            let solution = solver.solve(&items, budget)?;

            assert_eq!(solution.best_return(), expected, "items: {items:?}, budget: {budget}");
        }
    }

    Ok(())
}

#[test]
fn selection_is_feasible_and_accounts_for_best_return() -> TestResult {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let n = rng.gen_range(0..=30);
        let items = random_items(&mut rng, n);
        let budget = rng.gen_range(0..=500);

        for solver in solvers() {
            let solution = solver.solve(&items, budget)?;

            let cost: i64 = solution.selected_items().map(Item::cost).sum();
            let value: i64 = solution.selected_items().map(Item::return_value).sum();

            assert!(cost <= budget, "cost {cost} over budget {budget}");
            assert_eq!(value, solution.best_return());
            assert!(
                solution
                    .selected_indices()
                    .windows(2)
                    .all(|pair| matches!(pair, [a, b] if a < b)),
                "indices must be unique and ascending"
            );
        }
    }

    Ok(())
}

#[test]
fn best_return_never_decreases_with_budget() -> TestResult {
    let mut rng = StdRng::seed_from_u64(11);
    let items = random_items(&mut rng, 15);

    for solver in solvers() {
        let mut previous = 0;

        for budget in 0..=400 {
            let best = solver.solve(&items, budget)?.best_return();

            assert!(best >= previous, "budget {budget}: {best} < {previous}");
            previous = best;
        }
    }

    Ok(())
}

#[test]
fn strategies_agree_on_the_selection() -> TestResult {
    let mut rng = StdRng::seed_from_u64(23);
    let [full, compact] = solvers();

    for _ in 0..100 {
        let n = rng.gen_range(1..=25);
        // Narrow ranges make ties common.
        let items: Vec<Item> = (0..n)
            .map(|idx| Item::new(format!("{idx}"), rng.gen_range(0..=5), rng.gen_range(0..=3)))
            .collect();
        let budget = rng.gen_range(0..=30);

        assert_eq!(full.solve(&items, budget)?, compact.solve(&items, budget)?);
    }

    Ok(())
}

#[test]
fn repeated_solves_are_identical() -> TestResult {
    let mut rng = StdRng::seed_from_u64(31);
    let items = random_items(&mut rng, 20);
    let solver = DynamicSolver::default();
    let mut table = ValueTable::new();

    let first = solver.solve(&items, 300)?;
    let second = solver.solve(&items, 300)?;
    let reused = solver.solve_in(&items, 300, &mut table)?;

    assert_eq!(first, second);
    assert_eq!(first, reused);

    Ok(())
}

#[test]
fn zero_budget_and_empty_input_select_nothing() -> TestResult {
    let mut rng = StdRng::seed_from_u64(41);
    let items = random_items(&mut rng, 10);

    for solver in solvers() {
        let solution = solver.solve(&items, 0)?;
        assert_eq!(solution.best_return(), 0);
        assert!(solution.is_empty());

        let solution = solver.solve(&[], 100)?;
        assert_eq!(solution.best_return(), 0);
        assert!(solution.is_empty());
    }

    Ok(())
}

#[test]
fn duplicate_ids_are_distinct_items() -> TestResult {
    let items = [Item::new("Same", 10, 5), Item::new("Same", 10, 5)];

    let solution = DynamicSolver::default().solve(&items, 20)?;

    assert_eq!(solution.best_return(), 10);
    assert_eq!(solution.selected_indices(), [0, 1]);

    Ok(())
}
