use std::collections::BTreeMap;

use itertools::Itertools as _;

use crate::{
    entities::{Item, Machine, Rate, Recipe},
    expansion::{Expansion, IngredientUse},
};

/// Summed machine usage of a single recipe. Several recipes can share a machine kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecipeUsage<'data> {
    pub recipe: &'data Recipe,
    pub machine: &'data Machine,
    pub usage: f64,
}

impl RecipeUsage<'_> {
    /// Machines needed when none of them is overclocked.
    pub fn machines_no_overclock(&self) -> u64 {
        self.usage.ceil() as u64
    }

    /// Machines needed when each can be overclocked with one power crystal,
    /// adding roughly one machine's worth of throughput.
    pub fn machines_with_crystal(&self) -> u64 {
        (self.usage.floor() as u64).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineTotal<'data> {
    pub machine: &'data Machine,
    pub no_overclock: u64,
    pub with_crystal: u64,
}

/// Aggregated view of an [`Expansion`].
///
/// Ordering is fixed so that identical inputs always render identically:
/// - ingredients by amount descending, then item name,
/// - recipe usage by machine name, recipe name, then usage,
/// - machine totals by machine name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report<'data> {
    pub ingredients: Vec<(&'data Item, Rate)>,
    pub base_ingredients: Vec<(&'data Item, Rate)>,
    pub recipe_usage: Vec<RecipeUsage<'data>>,
    pub machine_totals: Vec<MachineTotal<'data>>,
}

impl<'data> Report<'data> {
    pub fn from_expansion(expansion: &Expansion<'data>) -> Self {
        let totals = sum_by_item(&expansion.ingredients);

        let base_ingredients = totals
            .values()
            .filter(|(item, _)| item.is_raw_ingredient())
            .copied()
            .sorted_by(by_amount_then_name)
            .collect();

        let ingredients = totals
            .into_values()
            .sorted_by(by_amount_then_name)
            .collect();

        let recipe_usage = sum_by_recipe(expansion);
        let machine_totals = sum_by_machine(&recipe_usage);

        Self {
            ingredients,
            base_ingredients,
            recipe_usage,
            machine_totals,
        }
    }

    pub fn ingredient_amount(&self, item_name: &str) -> Option<Rate> {
        find_amount(&self.ingredients, item_name)
    }

    pub fn base_amount(&self, item_name: &str) -> Option<Rate> {
        find_amount(&self.base_ingredients, item_name)
    }

    pub fn recipe_usage(&self, recipe_name: &str) -> Option<&RecipeUsage<'data>> {
        self.recipe_usage
            .iter()
            .find(|usage| usage.recipe.name == recipe_name)
    }

    pub fn machine_total(&self, machine_name: &str) -> Option<&MachineTotal<'data>> {
        self.machine_totals
            .iter()
            .find(|total| total.machine.name == machine_name)
    }
}

fn find_amount(amounts: &[(&Item, Rate)], item_name: &str) -> Option<Rate> {
    amounts
        .iter()
        .find(|(item, _)| item.name == item_name)
        .map(|(_, amount)| *amount)
}

fn by_amount_then_name(a: &(&Item, Rate), b: &(&Item, Rate)) -> std::cmp::Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.name.cmp(&b.0.name))
}

/// Total amount per item, keyed by item name.
pub fn sum_by_item<'data>(
    ingredients: &[IngredientUse<'data>],
) -> BTreeMap<&'data str, (&'data Item, Rate)> {
    let mut totals: BTreeMap<&str, (&Item, Rate)> = BTreeMap::new();

    for ingredient in ingredients {
        totals
            .entry(ingredient.item.name.as_str())
            .or_insert((ingredient.item, 0.0))
            .1 += ingredient.amount;
    }

    totals
}

/// Total amount per raw ingredient, keyed by item name.
pub fn sum_base_by_item<'data>(
    ingredients: &[IngredientUse<'data>],
) -> BTreeMap<&'data str, (&'data Item, Rate)> {
    let mut totals = sum_by_item(ingredients);
    totals.retain(|_, (item, _)| item.is_raw_ingredient());
    totals
}

fn sum_by_recipe<'data>(expansion: &Expansion<'data>) -> Vec<RecipeUsage<'data>> {
    let mut by_recipe: BTreeMap<&str, RecipeUsage> = BTreeMap::new();

    for machine_use in &expansion.machines {
        by_recipe
            .entry(machine_use.recipe.name.as_str())
            .or_insert(RecipeUsage {
                recipe: machine_use.recipe,
                machine: machine_use.machine,
                usage: 0.0,
            })
            .usage += machine_use.usage;
    }

    by_recipe
        .into_values()
        .sorted_by(|a, b| {
            a.machine
                .name
                .cmp(&b.machine.name)
                .then_with(|| a.recipe.name.cmp(&b.recipe.name))
                .then_with(|| a.usage.total_cmp(&b.usage))
        })
        .collect()
}

fn sum_by_machine<'data>(recipe_usage: &[RecipeUsage<'data>]) -> Vec<MachineTotal<'data>> {
    let mut by_machine: BTreeMap<&str, MachineTotal> = BTreeMap::new();

    for usage in recipe_usage {
        let total = by_machine
            .entry(usage.machine.name.as_str())
            .or_insert(MachineTotal {
                machine: usage.machine,
                no_overclock: 0,
                with_crystal: 0,
            });

        total.no_overclock += usage.machines_no_overclock();
        total.with_crystal += usage.machines_with_crystal();
    }

    by_machine.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::RecipeKind;
    use crate::expansion::MachineUse;
    use std::time::Duration;

    fn recipe(name: &str) -> Recipe {
        Recipe {
            name: name.to_string(),
            time: Duration::from_secs(1),
            machine: "Constructor".to_string(),
            outputs: vec![],
            inputs: vec![],
            kind: RecipeKind::Base,
        }
    }

    #[test]
    fn overclock_policies() {
        let machine = Machine {
            name: "Constructor".to_string(),
        };
        let recipe = recipe("Screw");
        let usage = |usage| RecipeUsage {
            recipe: &recipe,
            machine: &machine,
            usage,
        };

        assert_eq!(usage(1.5).machines_no_overclock(), 2);
        assert_eq!(usage(1.5).machines_with_crystal(), 1);
        assert_eq!(usage(0.25).machines_no_overclock(), 1);
        assert_eq!(usage(0.25).machines_with_crystal(), 1);
        assert_eq!(usage(3.0).machines_no_overclock(), 3);
        assert_eq!(usage(3.0).machines_with_crystal(), 3);
    }

    #[test]
    fn recipes_sharing_a_machine_are_grouped_separately() {
        let machine = Machine {
            name: "Constructor".to_string(),
        };
        let screw = recipe("Screw");
        let rod = recipe("Iron Rod");
        let expansion = Expansion {
            ingredients: vec![],
            machines: vec![
                machine_use(&machine, 0.5, &screw),
                machine_use(&machine, 1.0, &rod),
                machine_use(&machine, 1.0, &screw),
            ],
        };

        let report = Report::from_expansion(&expansion);

        assert_eq!(report.recipe_usage.len(), 2);
        assert_eq!(report.recipe_usage[0].recipe.name, "Iron Rod");
        assert_eq!(report.recipe_usage[1].recipe.name, "Screw");
        assert_eq!(report.recipe_usage[1].usage, 1.5);
        assert_eq!(
            report.machine_totals,
            vec![MachineTotal {
                machine: &machine,
                no_overclock: 3,
                with_crystal: 2,
            }]
        );
    }

    fn machine_use<'a>(machine: &'a Machine, usage: f64, recipe: &'a Recipe) -> MachineUse<'a> {
        MachineUse {
            machine,
            usage,
            recipe,
        }
    }
}
