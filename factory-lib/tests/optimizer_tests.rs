//! Tests for the production mix optimizer.

mod common;

use common::{assert_close, names};
use factory_lib::prelude::*;

fn solve<'data>(
    catalog: &'data Catalog,
    available: &[(&str, Rate)],
    desired: &[(&str, Rate)],
) -> OptimizedPlan<'data> {
    match optimize(catalog, available, &RecipeOverrides::new(), desired).unwrap() {
        Optimization::Solved(plan) => plan,
        other => panic!("expected a solved plan, got {other:?}"),
    }
}

fn assert_feasible(plan: &OptimizedPlan) {
    let model = &plan.model;
    let quantities: Vec<Rate> = plan.produced.iter().map(|(_, rate)| *rate).collect();

    for (quantity, maximum) in quantities.iter().zip(&model.maxima) {
        assert!(*quantity >= 0.0 && *quantity <= *maximum);
    }
    for (used, budget) in model.consumption(&quantities).iter().zip(&model.adjusted_budget) {
        assert!(*used <= budget + 1e-6, "used {used} over budget {budget}");
    }
}

#[test]
fn test_cheapest_output_takes_the_whole_budget() {
    let catalog = common::catalog();
    let plan = solve(
        &catalog,
        &[("Iron Ore", 60.0)],
        &[("Iron Ingot", 100.0), ("Iron Plate", 100.0)],
    );

    assert_close(plan.produced[0].1, 60.0);
    assert_close(plan.produced[1].1, 0.0);
    assert_eq!(names(&plan.remaining), vec!["Iron Ore"]);
    assert_close(plan.remaining[0].1, 0.0);
    assert!(plan.needed.is_empty());
    assert_feasible(&plan);
}

#[test]
fn test_caps_redirect_budget_to_other_outputs() {
    let catalog = common::catalog();
    let plan = solve(
        &catalog,
        &[("Iron Ore", 60.0)],
        &[("Iron Ingot", 20.0), ("Iron Plate", 100.0)],
    );

    assert_close(plan.produced[0].1, 20.0);
    assert_close(plan.produced[1].1, 40.0 / 1.5);
    assert_feasible(&plan);
}

#[test]
fn test_leftover_budget_is_remaining() {
    let catalog = common::catalog();
    let plan = solve(
        &catalog,
        &[("Iron Ore", 60.0)],
        &[("Iron Ingot", 10.0), ("Iron Plate", 10.0)],
    );

    assert_close(plan.produced[0].1, 10.0);
    assert_close(plan.produced[1].1, 10.0);
    assert_close(plan.remaining[0].1, 35.0);
    assert!(plan.needed.is_empty());
}

#[test]
fn test_intermediate_inputs_count_as_their_raw_cost() {
    let catalog = common::catalog();
    let plan = solve(&catalog, &[("Iron Ingot", 30.0)], &[("Iron Plate", 100.0)]);

    assert_eq!(plan.model.budget, vec![30.0]);
    assert_close(plan.produced[0].1, 20.0);
}

#[test]
fn test_missing_ingredient_is_backfilled_and_reported_as_needed() {
    let catalog = common::catalog();
    let plan = solve(&catalog, &[("Iron Ore", 45.0)], &[("Steel Ingot", 1000.0)]);

    let universe: Vec<&str> = plan
        .model
        .universe
        .iter()
        .map(|item| item.name.as_str())
        .collect();
    assert_eq!(universe, vec!["Coal", "Iron Ore"]);
    assert_eq!(plan.model.budget, vec![0.0, 45.0]);
    assert_close(plan.model.adjusted_budget[0], 45.0);
    assert_eq!(plan.model.adjusted_budget[1], 45.0);

    assert_close(plan.produced[0].1, 45.0);
    assert_eq!(names(&plan.needed), vec!["Coal"]);
    assert_close(plan.needed[0].1, 45.0);
    assert_eq!(names(&plan.remaining), vec!["Iron Ore"]);
    assert_close(plan.remaining[0].1, 0.0);
}

#[test]
fn test_unused_inputs_stay_in_remaining() {
    let catalog = common::catalog();
    let plan = solve(
        &catalog,
        &[("Iron Ore", 60.0), ("Copper Ore", 100.0)],
        &[("Iron Ingot", 100.0)],
    );

    assert_close(plan.produced[0].1, 60.0);
    assert_eq!(names(&plan.remaining), vec!["Copper Ore", "Iron Ore"]);
    assert_eq!(plan.remaining[0].1, 100.0);
    assert_close(plan.remaining[1].1, 0.0);
    assert!(plan.needed.is_empty());
}

#[test]
fn test_output_without_any_budgeted_ingredient_is_capped() {
    let catalog = common::catalog();
    let plan = solve(&catalog, &[("Iron Plate", 30.0)], &[("Wire", 10.0)]);

    // Every ingredient of wire is unbudgeted, the cap bounds the backfill
    assert_eq!(plan.model.budget, vec![0.0]);
    assert_close(plan.model.adjusted_budget[0], 5.0);

    assert_close(plan.produced[0].1, 10.0);
    assert_eq!(names(&plan.needed), vec!["Copper Ore"]);
    assert_close(plan.needed[0].1, 5.0);

    // Ore paid for by the plates is untouched
    assert_eq!(names(&plan.remaining), vec!["Iron Ore"]);
    assert_close(plan.remaining[0].1, 45.0);
}

#[test]
fn test_first_output_decides_backfilled_budget() {
    let catalog = common::catalog();
    let plan = solve(
        &catalog,
        &[("Iron Ore", 60.0)],
        &[("Steel Ingot", 1000.0), ("Iron Ingot", 1000.0)],
    );

    // Steel sees the whole ore budget and sets the coal budget alone
    assert_close(plan.model.adjusted_budget[0], 60.0);
    assert_eq!(plan.model.adjusted_budget[1], 60.0);
    let total: Rate = plan.produced.iter().map(|(_, rate)| rate).sum();
    assert_close(total, 60.0);
    assert_feasible(&plan);
}

#[test]
fn test_overrides_change_the_cost_model() {
    let catalog = common::catalog();
    let overrides = RecipeOverrides::from_recipe_names(&catalog, ["Pure Iron Ingot"]).unwrap();

    let optimization = optimize(
        &catalog,
        &[("Iron Ore", 35.0), ("Water", 20.0)],
        &overrides,
        &[("Iron Ingot", 1000.0)],
    )
    .unwrap();
    let plan = optimization.solved().unwrap();

    assert_close(plan.produced[0].1, 65.0);
    assert!(plan.needed.is_empty());
    assert_feasible(plan);
}

#[test]
fn test_produced_keeps_requested_order() {
    let catalog = common::catalog();
    let plan = solve(
        &catalog,
        &[("Iron Ore", 100.0), ("Copper Ore", 100.0)],
        &[("Wire", 50.0), ("Iron Rod", 50.0), ("Copper Ingot", 50.0)],
    );

    assert_eq!(names(&plan.produced), vec!["Wire", "Iron Rod", "Copper Ingot"]);
    assert_feasible(&plan);
}

#[test]
fn test_empty_request_is_not_applicable() {
    let catalog = common::catalog();
    let none: [(&str, Rate); 0] = [];
    let overrides = RecipeOverrides::new();

    assert_eq!(
        optimize(&catalog, &none, &overrides, &[("Iron Ingot", 10.0)]).unwrap(),
        Optimization::NotApplicable
    );
    assert_eq!(
        optimize(&catalog, &[("Iron Ore", 10.0)], &overrides, &none).unwrap(),
        Optimization::NotApplicable
    );
    assert!(render_optimization(&Optimization::NotApplicable)
        .unwrap()
        .starts_with("Not applicable"));
}

#[test]
fn test_invalid_requests_are_errors() {
    let catalog = common::catalog();
    let overrides = RecipeOverrides::new();

    assert!(matches!(
        optimize(
            &catalog,
            &[("Iron Ore", 10.0)],
            &overrides,
            &[("Unobtainium", 10.0)]
        ),
        Err(FactoryError::UnknownItem(_))
    ));
    assert!(matches!(
        optimize(
            &catalog,
            &[("Iron Ore", -10.0)],
            &overrides,
            &[("Iron Ingot", 10.0)]
        ),
        Err(FactoryError::InvalidQuantity { .. })
    ));
}

#[test]
fn test_rendered_optimization() {
    let catalog = common::catalog();
    let optimization = optimize(
        &catalog,
        &[("Iron Ore", 60.0)],
        &RecipeOverrides::new(),
        &[("Iron Ingot", 100.0)],
    )
    .unwrap();

    let rendered = render_optimization(&optimization).unwrap();

    assert!(rendered.contains("Required ingredients"));
    assert!(rendered.contains("Remaining items"));
    assert!(rendered.contains("Output items"));
    assert_eq!(
        render_optimization(&Optimization::Infeasible).unwrap(),
        "No feasible plan\n"
    );
}
