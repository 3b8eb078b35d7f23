use std::path::PathBuf;

use clap::{Parser, Subcommand};
use factory_lib::prelude::*;

/// Plan and optimize production chains from a recipe catalog.
#[derive(Parser, Debug)]
#[command(name = "factory", version, about, long_about = None)]
pub struct Cli {
    /// Recipe catalog in JSON format
    #[arg(long, env = "FACTORY_CATALOG", default_value = "recipes.json")]
    pub catalog: PathBuf,

    /// How many recipe levels deep a target is expanded
    #[arg(long, env = "FACTORY_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the recipes of the catalog
    Recipes {
        /// Only show recipes of this kind (base, alternate or manual)
        #[arg(long)]
        kind: Option<RecipeKind>,

        /// Only show recipes that output this item
        #[arg(long, value_name = "ITEM")]
        produces: Option<String>,

        /// Only show recipes that consume this item
        #[arg(long, value_name = "ITEM")]
        uses: Option<String>,
    },

    /// Ingredients and machines needed for the given production targets
    Plan {
        /// Target as NAME=RATE, in items per minute
        #[arg(long = "target", required = true, value_parser = parse_quantity)]
        targets: Vec<(String, Rate)>,

        /// Alternate recipe to use instead of the default one of each item it outputs
        #[arg(long = "alt")]
        alternates: Vec<String>,
    },

    /// Best mix of outputs the given inputs can sustain
    Optimize {
        /// Available item as NAME=RATE, in items per minute
        #[arg(long = "input", value_parser = parse_quantity)]
        inputs: Vec<(String, Rate)>,

        /// Desired output as NAME=MAX, in items per minute
        #[arg(long = "output", value_parser = parse_quantity)]
        outputs: Vec<(String, Rate)>,

        /// Alternate recipe to use instead of the default one of each item it outputs
        #[arg(long = "alt")]
        alternates: Vec<String>,
    },
}

/// Recipes of the catalog matching every given filter, in recipe name order.
pub fn select_recipes<'data>(
    catalog: &'data Catalog,
    kind: Option<RecipeKind>,
    produces: Option<&str>,
    uses: Option<&str>,
) -> FactoryResult<Vec<&'data Recipe>> {
    let mut recipes: Vec<&Recipe> = match kind {
        Some(kind) => catalog.recipes_by_kind(kind),
        None => catalog.iter_recipes().collect(),
    };

    if produces.is_none() && uses.is_none() {
        return Ok(recipes);
    }

    let graph = CraftingGraph::from_catalog(catalog);

    if let Some(name) = produces {
        let item = Node::Item(catalog.get_item(name)?);
        let producers = recipe_names(graph.get_recipes_with_item_in_outputs(item));
        recipes.retain(|recipe| producers.contains(&recipe.name.as_str()));
    }

    if let Some(name) = uses {
        let item = Node::Item(catalog.get_item(name)?);
        let consumers = recipe_names(graph.get_items_as_ingredients_in_recipes(item));
        recipes.retain(|recipe| consumers.contains(&recipe.name.as_str()));
    }

    Ok(recipes)
}

fn recipe_names<'data>(nodes: Option<Vec<Node<'data>>>) -> Vec<&'data str> {
    nodes
        .unwrap_or_default()
        .into_iter()
        .filter_map(|node| match node {
            Node::Recipe(recipe) => Some(recipe.name.as_str()),
            Node::Item(_) => None,
        })
        .collect()
}

/// Parse `NAME=RATE`. Item names may themselves contain `=`, the rate is after the last one.
pub fn parse_quantity(arg: &str) -> Result<(String, Rate), String> {
    let (name, rate) = arg
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=RATE, got `{arg}`"))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing item name in `{arg}`"));
    }

    let rate: Rate = rate
        .trim()
        .parse()
        .map_err(|_| format!("invalid rate `{}` in `{arg}`", rate.trim()))?;

    if !rate.is_finite() || rate < 0.0 {
        return Err(format!("rate must be finite and non-negative in `{arg}`"));
    }

    Ok((name.to_string(), rate))
}
