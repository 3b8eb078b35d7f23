use std::{fs, path::Path};

use crate::{
    entities::{Item, Machine, Recipe, RecipeKind},
    error::{FactoryError, FactoryResult},
};

/// Read-only access to a recipe dataset. Implementors provide parsing, iteration and
/// name lookups; filtered views and failing lookups are derived from those.
pub trait DataSource {
    fn from_str(recipes_str: &str) -> FactoryResult<Self>
    where
        Self: std::marker::Sized;

    fn iter_items(&self) -> impl Iterator<Item = &Item>;

    fn iter_recipes(&self) -> impl Iterator<Item = &Recipe>;

    fn iter_machines(&self) -> impl Iterator<Item = &Machine>;

    fn from_file(path: impl AsRef<Path>) -> FactoryResult<Self>
    where
        Self: std::marker::Sized,
    {
        let file_content = fs::read_to_string(path).map_err(FactoryError::Io)?;

        Self::from_str(&file_content)
    }

    fn raw_ingredients(&self) -> Vec<&Item> {
        self.iter_items()
            .filter(|item| item.is_raw_ingredient())
            .collect()
    }

    fn recipes_by_kind(&self, kind: RecipeKind) -> Vec<&Recipe> {
        self.iter_recipes()
            .filter(|recipe| recipe.kind == kind)
            .collect()
    }

    fn try_get_item(&self, name: &str) -> Option<&Item>;

    fn get_item(&self, name: &str) -> FactoryResult<&Item> {
        self.try_get_item(name)
            .ok_or_else(|| FactoryError::UnknownItem(name.to_string()))
    }

    fn try_get_recipe(&self, name: &str) -> Option<&Recipe>;

    fn get_recipe(&self, name: &str) -> FactoryResult<&Recipe> {
        self.try_get_recipe(name)
            .ok_or_else(|| FactoryError::UnknownRecipe(name.to_string()))
    }

    fn try_get_machine(&self, name: &str) -> Option<&Machine>;

    fn get_machine(&self, name: &str) -> FactoryResult<&Machine> {
        self.try_get_machine(name)
            .ok_or_else(|| FactoryError::UnknownMachine(name.to_string()))
    }
}
