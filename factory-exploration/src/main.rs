use std::{fs, path::PathBuf};

use anyhow::{Context as _, Result};

use factory_lib::prelude::*;
use itertools::Itertools as _;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let save_figures = true;

    let catalog = Catalog::from_file("factory-lib/tests/data/recipes.json")
        .context("Failed to load the sample catalog")?;

    let overrides = RecipeOverrides::from_recipe_names(&catalog, ["Cast Screw"])?;
    let report = plan(
        &catalog,
        &[("Reinforced Iron Plate", 10.0), ("Steel Ingot", 45.0)],
        &overrides,
        DEFAULT_MAX_DEPTH,
    )?;
    print!("{}", render_plan(&report)?);

    let used_recipes = report
        .recipe_usage
        .iter()
        .map(|usage| usage.recipe)
        .unique_by(|recipe| recipe.name.as_str())
        .collect_vec();

    let plan_graph = CraftingGraph::from_recipes(&catalog, used_recipes);
    let full_graph = CraftingGraph::from_catalog(&catalog);
    println!(
        "Plan graph has cycles: {}, full catalog graph has cycles: {}",
        plan_graph.has_cycles(),
        full_graph.has_cycles()
    );

    if save_figures {
        fs::create_dir_all("outputs")?;

        let file_name: PathBuf = "outputs/plan.svg".into();
        plan_graph.save_as_svg(file_name)?;

        let file_name: PathBuf = "outputs/catalog.svg".into();
        full_graph.save_as_svg(file_name)?;
    }

    Ok(())
}
