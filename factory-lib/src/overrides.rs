use std::collections::HashMap;

use crate::{
    data::Catalog,
    entities::{Item, Recipe},
    error::FactoryResult,
    traits::DataSource as _,
};

/// Per-request substitutions of an item's default recipe, keyed by item name.
#[derive(Debug, Clone, Default)]
pub struct RecipeOverrides<'data> {
    by_item: HashMap<&'data str, &'data Recipe>,
}

/// Which recipe an item is crafted with during expansion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecipeChoice<'data> {
    /// Selected by the caller for this request.
    Override(&'data Recipe),
    /// The first base recipe declared in the catalog.
    Default(&'data Recipe),
}

impl<'data> RecipeChoice<'data> {
    pub fn recipe(&self) -> &'data Recipe {
        match *self {
            RecipeChoice::Override(recipe) | RecipeChoice::Default(recipe) => recipe,
        }
    }
}

impl<'data> RecipeOverrides<'data> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every selected recipe overrides the default recipe of each item it outputs,
    /// byproducts included. When two selections output the same item, the later one wins.
    pub fn from_recipe_names<S: AsRef<str>>(
        catalog: &'data Catalog,
        recipe_names: impl IntoIterator<Item = S>,
    ) -> FactoryResult<Self> {
        let mut overrides = Self::new();

        for name in recipe_names {
            let recipe = catalog.get_recipe(name.as_ref())?;

            for output in &recipe.outputs {
                let item = catalog.get_item(&output.item)?;
                overrides.insert(item, recipe);
            }
        }

        Ok(overrides)
    }

    pub fn insert(&mut self, item: &'data Item, recipe: &'data Recipe) {
        self.by_item.insert(&item.name, recipe);
    }

    pub fn get(&self, item_name: &str) -> Option<&'data Recipe> {
        self.by_item.get(item_name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_item.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_item.is_empty()
    }

    /// The override for the item if there is one, otherwise its default recipe.
    /// `None` means the item has nothing to be crafted with and is treated as a leaf.
    pub fn choose(
        &self,
        catalog: &'data Catalog,
        item: &'data Item,
    ) -> FactoryResult<Option<RecipeChoice<'data>>> {
        match self.get(&item.name) {
            Some(recipe) => Ok(Some(RecipeChoice::Override(recipe))),
            None => Ok(catalog.default_recipe(item)?.map(RecipeChoice::Default)),
        }
    }
}
