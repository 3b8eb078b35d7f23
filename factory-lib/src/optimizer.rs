//! Best production mix under a fixed budget of raw and intermediate items.
//!
//! Every desired output is expanded once at 1/min to learn how much of each raw ingredient a
//! unit of it consumes. The items the planner already owns are converted into the same raw
//! ingredient units, and a linear program maximizes total output subject to that budget and
//! the caller's per-output caps. The chosen mix is then expanded again and compared against
//! the budget the caller actually has, covering every raw ingredient owned or consumed.
//!
//! # Zero budget rows
//!
//! A raw ingredient that some output needs but the caller has none of would pin that output to
//! zero. Instead its budget is backfilled: the output's provisional bound is the most it could
//! make from the ingredients that do have a budget, and the missing ingredient is assumed to be
//! available in exactly the amount that bound would consume. The first output to touch such a
//! row decides its value. This does not allocate optimally when several outputs compete for the
//! same missing ingredient, and since reconciliation uses the unadjusted budget a solved plan
//! can still report items in [`OptimizedPlan::needed`].

use std::collections::BTreeMap;

use minilp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem, Variable};
use tracing::{debug, info, warn};

use crate::{
    aggregate::sum_base_by_item,
    data::Catalog,
    entities::{Item, Rate},
    error::FactoryResult,
    expansion::{expand_item, validate_amount, Expansion, DEFAULT_MAX_DEPTH},
    overrides::RecipeOverrides,
    traits::DataSource as _,
};

/// Differences smaller than this are reported as exact matches.
pub const RECONCILE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub enum Optimization<'data> {
    /// Either no inputs or no outputs were given, nothing was solved.
    NotApplicable,
    /// The solver found no feasible production mix.
    Infeasible,
    Solved(OptimizedPlan<'data>),
}

impl<'data> Optimization<'data> {
    pub fn solved(&self) -> Option<&OptimizedPlan<'data>> {
        match self {
            Optimization::Solved(plan) => Some(plan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedPlan<'data> {
    /// Raw ingredients left over, in raw item name order. Owned ingredients that no output
    /// consumes are listed in full.
    pub remaining: Vec<(&'data Item, Rate)>,
    /// Raw ingredients missing from the budget, in raw item name order.
    pub needed: Vec<(&'data Item, Rate)>,
    /// Per-minute rate of each desired output, in the order they were requested.
    pub produced: Vec<(&'data Item, Rate)>,
    pub model: ProductionModel<'data>,
}

/// The linear program behind an optimization: `coefficients[i][j]` is how much of raw
/// ingredient `universe[j]` one unit of `outputs[i]` consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionModel<'data> {
    pub outputs: Vec<&'data Item>,
    pub maxima: Vec<Rate>,
    pub universe: Vec<&'data Item>,
    pub coefficients: Vec<Vec<f64>>,
    pub budget: Vec<Rate>,
    pub adjusted_budget: Vec<Rate>,
    /// Raw ingredient value of everything the caller owns, in raw item name order.
    /// Includes ingredients none of the outputs consume.
    pub owned: Vec<(&'data Item, Rate)>,
}

impl<'data> ProductionModel<'data> {
    /// Raw ingredient consumption of a production mix, one entry per universe item.
    pub fn consumption(&self, quantities: &[Rate]) -> Vec<Rate> {
        (0..self.universe.len())
            .map(|j| {
                self.coefficients
                    .iter()
                    .zip(quantities)
                    .map(|(coeffs, quantity)| coeffs[j] * quantity)
                    .sum()
            })
            .collect()
    }

    /// Most of `outputs[output_idx]` the budgeted ingredients alone could make.
    /// Falls back to the caller's cap when every ingredient it needs is unbudgeted.
    fn provisional_bound(&self, output_idx: usize) -> Rate {
        self.coefficients[output_idx]
            .iter()
            .zip(&self.budget)
            .filter(|&(&coeff, &budget)| coeff > 0.0 && budget > 0.0)
            .map(|(coeff, budget)| budget / coeff)
            .min_by(f64::total_cmp)
            .unwrap_or(self.maxima[output_idx])
    }

    fn backfill_zero_budgets(&mut self) {
        for output_idx in 0..self.outputs.len() {
            let bound = self.provisional_bound(output_idx);

            for j in 0..self.universe.len() {
                if self.adjusted_budget[j] == 0.0 {
                    self.adjusted_budget[j] = self.coefficients[output_idx][j] * bound;

                    if self.adjusted_budget[j] > 0.0 {
                        warn!(
                            ingredient = %self.universe[j].name,
                            output = %self.outputs[output_idx].name,
                            assumed = self.adjusted_budget[j],
                            "No budget for ingredient, assuming enough for the provisional bound"
                        );
                    }
                }
            }
        }
    }

    /// Maximize the sum of all outputs against the adjusted budget.
    pub fn solve(&self) -> Result<Vec<Rate>, minilp::Error> {
        let mut problem = Problem::new(OptimizationDirection::Maximize);

        let vars: Vec<Variable> = self
            .maxima
            .iter()
            .map(|&maximum| problem.add_var(1.0, (0.0, maximum)))
            .collect();

        for (j, &bound) in self.adjusted_budget.iter().enumerate() {
            let mut row = LinearExpr::empty();
            let mut terms = 0;

            for (&var, coeffs) in vars.iter().zip(&self.coefficients) {
                if coeffs[j] > 0.0 {
                    row.add(var, coeffs[j]);
                    terms += 1;
                }
            }

            if terms == 0 {
                continue;
            }

            problem.add_constraint(row, ComparisonOp::Le, bound);
        }

        let solution = problem.solve()?;
        debug!(objective = solution.objective(), "Solved production program");

        Ok(vars
            .iter()
            .zip(&self.maxima)
            .map(|(&var, &maximum)| solution[var].clamp(0.0, maximum))
            .collect())
    }
}

/// [`optimize_with_depth`] with the default expansion depth.
pub fn optimize<'data, S: AsRef<str>, T: AsRef<str>>(
    catalog: &'data Catalog,
    available: &[(S, Rate)],
    overrides: &RecipeOverrides<'data>,
    desired: &[(T, Rate)],
) -> FactoryResult<Optimization<'data>> {
    optimize_with_depth(catalog, available, overrides, desired, DEFAULT_MAX_DEPTH)
}

/// Find the largest total output, each desired output capped at its maximum, that the
/// `available` items can pay for.
pub fn optimize_with_depth<'data, S: AsRef<str>, T: AsRef<str>>(
    catalog: &'data Catalog,
    available: &[(S, Rate)],
    overrides: &RecipeOverrides<'data>,
    desired: &[(T, Rate)],
    max_depth: usize,
) -> FactoryResult<Optimization<'data>> {
    if available.is_empty() || desired.is_empty() {
        return Ok(Optimization::NotApplicable);
    }

    let available = resolve(catalog, available)?;
    let desired = resolve(catalog, desired)?;
    if !overrides.is_empty() {
        debug!(overrides = overrides.len(), "Costing outputs with recipe overrides");
    }

    let mut model = build_model(catalog, &available, overrides, &desired, max_depth)?;
    model.backfill_zero_budgets();

    let quantities = match model.solve() {
        Ok(quantities) => quantities,
        Err(err) => {
            warn!(error = ?err, "No feasible production plan");
            return Ok(Optimization::Infeasible);
        }
    };

    let produced: Vec<(&Item, Rate)> = model
        .outputs
        .iter()
        .copied()
        .zip(quantities.iter().copied())
        .collect();

    let consumed = base_costs(catalog, &produced, overrides, max_depth)?;

    let mut ledger: BTreeMap<&str, (&Item, Rate)> = model
        .owned
        .iter()
        .map(|&(item, amount)| (item.name.as_str(), (item, amount)))
        .collect();
    for &item in &model.universe {
        ledger.entry(item.name.as_str()).or_insert((item, 0.0));
    }

    let mut remaining = vec![];
    let mut needed = vec![];

    for (item, budget) in ledger.into_values() {
        let used = consumed
            .get(item.name.as_str())
            .map_or(0.0, |(_, amount)| *amount);
        let difference = match budget - used {
            d if d.abs() < RECONCILE_TOLERANCE => 0.0,
            d => d,
        };

        if difference >= 0.0 {
            remaining.push((item, difference));
        } else {
            needed.push((item, -difference));
        }
    }

    info!(
        outputs = produced.len(),
        total = quantities.iter().sum::<f64>(),
        needed = needed.len(),
        "Optimized production mix"
    );

    Ok(Optimization::Solved(OptimizedPlan {
        remaining,
        needed,
        produced,
        model,
    }))
}

fn resolve<'data, S: AsRef<str>>(
    catalog: &'data Catalog,
    quantities: &[(S, Rate)],
) -> FactoryResult<Vec<(&'data Item, Rate)>> {
    quantities
        .iter()
        .map(|(name, amount)| {
            let item = catalog.get_item(name.as_ref())?;
            validate_amount(item, *amount)?;
            Ok((item, *amount))
        })
        .collect()
}

/// Raw ingredient totals of producing every `(item, rate)` pair.
fn base_costs<'data>(
    catalog: &'data Catalog,
    targets: &[(&'data Item, Rate)],
    overrides: &RecipeOverrides<'data>,
    max_depth: usize,
) -> FactoryResult<BTreeMap<&'data str, (&'data Item, Rate)>> {
    let mut expansion = Expansion::default();

    for &(item, amount) in targets {
        expansion.extend(expand_item(catalog, item, amount, overrides, max_depth)?);
    }

    Ok(sum_base_by_item(&expansion.ingredients))
}

fn build_model<'data>(
    catalog: &'data Catalog,
    available: &[(&'data Item, Rate)],
    overrides: &RecipeOverrides<'data>,
    desired: &[(&'data Item, Rate)],
    max_depth: usize,
) -> FactoryResult<ProductionModel<'data>> {
    let unit_costs = desired
        .iter()
        .map(|&(item, _)| base_costs(catalog, &[(item, 1.0)], overrides, max_depth))
        .collect::<FactoryResult<Vec<_>>>()?;

    let universe: BTreeMap<&str, &Item> = unit_costs
        .iter()
        .flat_map(|costs| costs.iter().map(|(&name, &(item, _))| (name, item)))
        .collect();

    let coefficients: Vec<Vec<f64>> = unit_costs
        .iter()
        .map(|costs| {
            universe
                .keys()
                .map(|name| costs.get(name).map_or(0.0, |(_, amount)| *amount))
                .collect()
        })
        .collect();

    let (raw, intermediate): (Vec<_>, Vec<_>) = available
        .iter()
        .copied()
        .partition(|(item, _)| item.is_raw_ingredient());

    let mut owned: BTreeMap<&str, (&Item, Rate)> = BTreeMap::new();
    for (item, amount) in raw {
        owned.entry(item.name.as_str()).or_insert((item, 0.0)).1 += amount;
    }
    for (name, (item, amount)) in base_costs(catalog, &intermediate, overrides, max_depth)? {
        owned.entry(name).or_insert((item, 0.0)).1 += amount;
    }

    let budget: Vec<Rate> = universe
        .keys()
        .map(|name| owned.get(name).map_or(0.0, |(_, amount)| *amount))
        .collect();

    debug!(
        outputs = desired.len(),
        ingredients = universe.len(),
        "Built production model"
    );

    Ok(ProductionModel {
        outputs: desired.iter().map(|&(item, _)| item).collect(),
        maxima: desired.iter().map(|&(_, maximum)| maximum).collect(),
        universe: universe.into_values().collect(),
        coefficients,
        adjusted_budget: budget.clone(),
        budget,
        owned: owned.into_values().collect(),
    })
}
