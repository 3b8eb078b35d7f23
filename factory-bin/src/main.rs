//! Command line front end of the production planner.
//!
//! Run with `--help` to see all available options. Log verbosity follows `RUST_LOG`.

mod cli;
mod error;

use clap::Parser;
use factory_lib::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{select_recipes, Cli, Command};
use crate::error::ApplicationError;

fn main() -> Result<(), ApplicationError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog =
        Catalog::from_file(&cli.catalog).map_err(|source| ApplicationError::Catalog {
            path: cli.catalog.display().to_string(),
            source,
        })?;
    info!(
        catalog = %cli.catalog.display(),
        recipes = catalog.len_recipes(),
        items = catalog.len_items(),
        "Catalog loaded"
    );

    match cli.command {
        Command::Recipes {
            kind,
            produces,
            uses,
        } => {
            let recipes =
                select_recipes(&catalog, kind, produces.as_deref(), uses.as_deref())?;

            for recipe in recipes {
                println!("{recipe}\n");
            }
        }
        Command::Plan {
            targets,
            alternates,
        } => {
            let overrides = RecipeOverrides::from_recipe_names(&catalog, &alternates)?;
            let report = plan(&catalog, &targets, &overrides, cli.max_depth)?;

            print!("{}", render_plan(&report)?);
        }
        Command::Optimize {
            inputs,
            outputs,
            alternates,
        } => {
            let overrides = RecipeOverrides::from_recipe_names(&catalog, &alternates)?;
            let optimization =
                optimize_with_depth(&catalog, &inputs, &overrides, &outputs, cli.max_depth)?;

            print!("{}", render_optimization(&optimization)?);
        }
    }

    Ok(())
}
