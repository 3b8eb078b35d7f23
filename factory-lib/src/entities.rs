use std::time::Duration;

use serde::{Deserialize, Serialize};

pub type ItemName = String;
pub type RecipeName = String;
pub type MachineName = String;
/// Items per minute at 1x clock speed.
pub type Rate = f64;

#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub name: RecipeName,
    pub time: Duration,
    pub machine: MachineName,
    pub outputs: Vec<ItemQuantity>,
    pub inputs: Vec<ItemQuantity>,
    pub kind: RecipeKind,
}

impl Recipe {
    /// Find the output entry that produces the item with the given name.
    /// A recipe can have byproducts, so this is not necessarily the first output.
    pub fn output_for(&self, item_name: &str) -> Option<&ItemQuantity> {
        self.outputs.iter().find(|output| output.item == item_name)
    }

    pub fn is_manual(&self) -> bool {
        self.kind == RecipeKind::Manual
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemQuantity {
    pub item: ItemName,
    /// Nominal batch quantity of one cycle.
    pub quantity: f64,
    pub rate: Rate,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    pub name: ItemName,
    /// Canonical crafting paths, in catalog order. The first one is the default.
    pub base_recipes: Vec<RecipeName>,
    pub alt_recipes: Vec<RecipeName>,
}

impl Item {
    pub fn new(name: impl Into<ItemName>) -> Self {
        Self {
            name: name.into(),
            base_recipes: vec![],
            alt_recipes: vec![],
        }
    }

    /// An item without any base recipe is sourced externally and is a leaf of every crafting tree.
    pub fn is_raw_ingredient(&self) -> bool {
        self.base_recipes.is_empty()
    }

    pub fn default_recipe(&self) -> Option<&RecipeName> {
        self.base_recipes.first()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Machine {
    pub name: MachineName,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecipeKind {
    Base,
    Alternate,
    Manual,
}

impl std::fmt::Display for RecipeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RecipeKind::Base => "base",
            RecipeKind::Alternate => "alternate",
            RecipeKind::Manual => "manual",
        })
    }
}

impl std::str::FromStr for RecipeKind {
    type Err = String;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "base" => Ok(RecipeKind::Base),
            "alternate" => Ok(RecipeKind::Alternate),
            "manual" => Ok(RecipeKind::Manual),
            other => Err(format!("unknown recipe kind `{other}`")),
        }
    }
}
