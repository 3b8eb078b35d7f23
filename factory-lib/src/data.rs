use crate::{
    domain::CraftingGraph,
    entities::{Item, ItemQuantity, Machine, Recipe, RecipeKind},
    error::{FactoryError, FactoryResult},
    traits,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use std::{
    collections::{btree_map::Entry, BTreeMap},
    time::Duration,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecipeJson {
    pub name: String,
    pub time: f64,
    pub machine: String,
    pub outputs: Vec<ItemJson>,
    #[serde(default)]
    pub inputs: Vec<ItemJson>,
    #[serde(rename = "type")]
    pub kind: RecipeKind,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ItemJson {
    pub item: String,
    pub amount: f64,
    #[serde(rename = "perMin")]
    pub rate: f64,
}

impl From<ItemJson> for ItemQuantity {
    fn from(entry: ItemJson) -> Self {
        Self {
            item: entry.item,
            quantity: entry.amount,
            rate: entry.rate,
        }
    }
}

/// The item, machine and recipe registry. Built once by [`Catalog::from_records`] and never
/// mutated afterwards, so a single instance can be shared by any number of planning requests.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: BTreeMap<String, Item>,
    machines: BTreeMap<String, Machine>,
    recipes: BTreeMap<String, Recipe>,
}

impl traits::DataSource for Catalog {
    fn from_str(recipes_str: &str) -> FactoryResult<Self>
    where
        Self: Sized,
    {
        let records: Vec<RecipeJson> =
            serde_json::from_str(recipes_str).map_err(FactoryError::BadJson)?;

        Self::from_records(records)
    }

    fn iter_items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    fn iter_recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    fn iter_machines(&self) -> impl Iterator<Item = &Machine> {
        self.machines.values()
    }

    fn try_get_item(&self, name: &str) -> Option<&Item> {
        self.items.get(name)
    }

    fn try_get_recipe(&self, name: &str) -> Option<&Recipe> {
        self.recipes.get(name)
    }

    fn try_get_machine(&self, name: &str) -> Option<&Machine> {
        self.machines.get(name)
    }
}

impl Catalog {
    /// Populate the registry from parsed recipe records, in the order they were declared.
    /// Items and machines are created the first time their name is referenced and shared afterwards.
    pub fn from_records(records: impl IntoIterator<Item = RecipeJson>) -> FactoryResult<Self> {
        let mut catalog = Self::default();

        for record in records {
            catalog.register(record)?;
        }

        let graph = CraftingGraph::from_catalog(&catalog);
        if graph.has_cycles() {
            warn!("Recipe catalog contains cyclic crafting chains, expansion relies on depth bounding");
        }

        debug!(
            items = catalog.items.len(),
            machines = catalog.machines.len(),
            recipes = catalog.recipes.len(),
            "Loaded recipe catalog"
        );

        Ok(catalog)
    }

    fn register(&mut self, record: RecipeJson) -> FactoryResult<()> {
        if self.recipes.contains_key(&record.name) {
            return Err(FactoryError::DuplicateRecipe(record.name));
        }

        if record.outputs.is_empty() {
            return Err(FactoryError::RecipeWithoutOutputs(record.name));
        }

        if let Some(output) = record
            .outputs
            .iter()
            .find(|output| !output.rate.is_finite() || output.rate <= 0.0)
        {
            return Err(FactoryError::InvalidOutputRate {
                recipe: record.name.clone(),
                item: output.item.clone(),
                rate: output.rate,
            });
        }

        let time = Duration::try_from_secs_f64(record.time).map_err(|_| {
            FactoryError::InvalidCycleTime {
                recipe: record.name.clone(),
                time: record.time,
            }
        })?;

        self.machines
            .entry(record.machine.clone())
            .or_insert_with(|| Machine {
                name: record.machine.clone(),
            });

        for entry in record.outputs.iter().chain(record.inputs.iter()) {
            self.item_entry(&entry.item);
        }

        for output in &record.outputs {
            let item = self.item_entry(&output.item);

            if record.kind == RecipeKind::Base && item.name == record.name {
                item.base_recipes.push(record.name.clone());
            } else {
                item.alt_recipes.push(record.name.clone());
            }
        }

        let recipe = Recipe {
            name: record.name,
            time,
            machine: record.machine,
            outputs: record.outputs.into_iter().map(Into::into).collect(),
            inputs: record.inputs.into_iter().map(Into::into).collect(),
            kind: record.kind,
        };

        self.recipes.insert(recipe.name.clone(), recipe);

        Ok(())
    }

    fn item_entry(&mut self, name: &str) -> &mut Item {
        match self.items.entry(name.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(Item::new(name)),
        }
    }

    /// The recipe an item is crafted with when no override is selected.
    /// Raw ingredients have none.
    pub fn default_recipe(&self, item: &Item) -> FactoryResult<Option<&Recipe>> {
        item.default_recipe()
            .map(|name| traits::DataSource::get_recipe(self, name))
            .transpose()
    }

    pub fn len_items(&self) -> usize {
        self.items.len()
    }

    pub fn len_recipes(&self) -> usize {
        self.recipes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::DataSource;

    const SMALL: &str = r#"[
        {"name": "Iron Ingot", "time": 2, "machine": "Smelter", "type": "base",
         "outputs": [{"item": "Iron Ingot", "amount": 1, "perMin": 30}],
         "inputs": [{"item": "Iron Ore", "amount": 1, "perMin": 30}]},
        {"name": "Pure Iron Ingot", "time": 12, "machine": "Refinery", "type": "alternate",
         "outputs": [{"item": "Iron Ingot", "amount": 13, "perMin": 65}],
         "inputs": [{"item": "Iron Ore", "amount": 7, "perMin": 35},
                    {"item": "Water", "amount": 4, "perMin": 20}]}
    ]"#;

    #[test]
    fn items_and_machines_are_shared_by_name() {
        let catalog = Catalog::from_str(SMALL).unwrap();

        assert_eq!(catalog.len_items(), 3);
        assert_eq!(catalog.iter_machines().count(), 2);

        let ingot = catalog.get_item("Iron Ingot").unwrap();
        assert_eq!(ingot.base_recipes, vec!["Iron Ingot".to_string()]);
        assert_eq!(ingot.alt_recipes, vec!["Pure Iron Ingot".to_string()]);
        assert!(!ingot.is_raw_ingredient());
        assert!(catalog.get_item("Water").unwrap().is_raw_ingredient());
    }

    #[test]
    fn duplicate_recipe_is_rejected() {
        let records: Vec<RecipeJson> = serde_json::from_str(SMALL).unwrap();
        let doubled = records.iter().chain(records.iter()).cloned();

        assert!(matches!(
            Catalog::from_records(doubled),
            Err(FactoryError::DuplicateRecipe(name)) if name == "Iron Ingot"
        ));
    }

    #[test]
    fn unknown_recipe_type_is_malformed_json() {
        let json = SMALL.replace("\"alternate\"", "\"experimental\"");

        assert!(matches!(
            Catalog::from_str(&json),
            Err(FactoryError::BadJson(_))
        ));
    }

    #[test]
    fn zero_output_rate_is_rejected() {
        let json = SMALL.replace("\"perMin\": 65", "\"perMin\": 0");

        assert!(matches!(
            Catalog::from_str(&json),
            Err(FactoryError::InvalidOutputRate { .. })
        ));
    }

    #[test]
    fn negative_cycle_time_is_rejected() {
        let json = SMALL.replace("\"time\": 12", "\"time\": -12");

        assert!(matches!(
            Catalog::from_str(&json),
            Err(FactoryError::InvalidCycleTime { recipe, .. }) if recipe == "Pure Iron Ingot"
        ));
    }
}
