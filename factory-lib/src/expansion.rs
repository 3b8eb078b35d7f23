//! Recursive expansion of a production target into the ingredients it consumes and the
//! machines it keeps busy.

use tracing::{debug, trace};

use crate::{
    data::Catalog,
    entities::{Item, Machine, Rate, Recipe},
    error::{FactoryError, FactoryResult},
    overrides::RecipeOverrides,
    traits::DataSource as _,
};

/// Deep enough for every real crafting chain, shallow enough to stop runaway cycles.
pub const DEFAULT_MAX_DEPTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngredientUse<'data> {
    pub item: &'data Item,
    pub amount: Rate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineUse<'data> {
    pub machine: &'data Machine,
    /// Number of machines (possibly fractional) running the recipe at 1x clock speed.
    pub usage: f64,
    pub recipe: &'data Recipe,
}

/// Unaggregated result of one or more expansions, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expansion<'data> {
    pub ingredients: Vec<IngredientUse<'data>>,
    pub machines: Vec<MachineUse<'data>>,
}

impl<'data> Expansion<'data> {
    fn raw(item: &'data Item, amount: Rate) -> Self {
        Self {
            ingredients: vec![IngredientUse { item, amount }],
            machines: vec![],
        }
    }

    pub fn extend(&mut self, other: Expansion<'data>) {
        self.ingredients.extend(other.ingredients);
        self.machines.extend(other.machines);
    }
}

pub(crate) fn validate_amount(item: &Item, amount: Rate) -> FactoryResult<()> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(FactoryError::InvalidQuantity {
            item: item.name.clone(),
            amount,
        })
    }
}

/// Expand `amount` per minute of `target` made with `recipe`.
///
/// The top-level call sits at depth 0 and a call at depth `d` only expands when
/// `d < max_depth`: a depth of 0 yields nothing, a depth of 1 yields the machines of `recipe`
/// and its direct inputs, and so on. Expansion past the limit is silently dropped.
///
/// A raw target is returned as its own single ingredient without looking at `recipe`.
pub fn expand<'data>(
    catalog: &'data Catalog,
    target: &'data Item,
    amount: Rate,
    recipe: &'data Recipe,
    overrides: &RecipeOverrides<'data>,
    max_depth: usize,
) -> FactoryResult<Expansion<'data>> {
    validate_amount(target, amount)?;

    if target.is_raw_ingredient() {
        return Ok(Expansion::raw(target, amount));
    }

    if recipe.output_for(&target.name).is_none() {
        return Err(FactoryError::OutputNotProduced {
            recipe: recipe.name.clone(),
            item: target.name.clone(),
        });
    }

    debug!(
        item = %target.name,
        amount,
        recipe = %recipe.name,
        max_depth,
        "Expanding production target"
    );

    let mut expansion = Expansion::default();
    expand_into(
        catalog,
        target,
        amount,
        recipe,
        overrides,
        max_depth,
        0,
        &mut expansion,
    )?;

    Ok(expansion)
}

/// Expand `target` with the recipe the overrides select for it, falling back to its default
/// recipe. Raw ingredients come back unchanged.
pub fn expand_item<'data>(
    catalog: &'data Catalog,
    target: &'data Item,
    amount: Rate,
    overrides: &RecipeOverrides<'data>,
    max_depth: usize,
) -> FactoryResult<Expansion<'data>> {
    if target.is_raw_ingredient() {
        validate_amount(target, amount)?;
        return Ok(Expansion::raw(target, amount));
    }

    match overrides.choose(catalog, target)? {
        Some(choice) => expand(
            catalog,
            target,
            amount,
            choice.recipe(),
            overrides,
            max_depth,
        ),
        None => Ok(Expansion::raw(target, amount)),
    }
}

#[allow(clippy::too_many_arguments)]
fn expand_into<'data>(
    catalog: &'data Catalog,
    item: &'data Item,
    amount: Rate,
    recipe: &'data Recipe,
    overrides: &RecipeOverrides<'data>,
    max_depth: usize,
    depth: usize,
    expansion: &mut Expansion<'data>,
) -> FactoryResult<()> {
    if depth >= max_depth {
        trace!(item = %item.name, depth, "Expansion truncated at depth limit");
        return Ok(());
    }

    let Some(output) = recipe.output_for(&item.name) else {
        return Ok(());
    };

    let scalar = amount / output.rate;

    expansion.machines.push(MachineUse {
        machine: catalog.get_machine(&recipe.machine)?,
        usage: scalar,
        recipe,
    });

    for input in &recipe.inputs {
        let input_item = catalog.get_item(&input.item)?;
        let input_amount = input.rate * scalar;

        expansion.ingredients.push(IngredientUse {
            item: input_item,
            amount: input_amount,
        });

        if let Some(choice) = overrides.choose(catalog, input_item)? {
            expand_into(
                catalog,
                input_item,
                input_amount,
                choice.recipe(),
                overrides,
                max_depth,
                depth + 1,
                expansion,
            )?;
        }
    }

    Ok(())
}
