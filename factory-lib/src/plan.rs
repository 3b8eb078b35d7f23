use tracing::info;

use crate::{
    aggregate::Report,
    data::Catalog,
    entities::Rate,
    error::FactoryResult,
    expansion::{expand_item, Expansion},
    overrides::RecipeOverrides,
    traits::DataSource as _,
};

/// Ingredients and machines needed to produce every `(item name, rate)` target.
/// An unknown item name aborts the whole request.
pub fn plan<'data, S: AsRef<str>>(
    catalog: &'data Catalog,
    targets: &[(S, Rate)],
    overrides: &RecipeOverrides<'data>,
    max_depth: usize,
) -> FactoryResult<Report<'data>> {
    let expansion = expand_targets(catalog, targets, overrides, max_depth)?;
    let report = Report::from_expansion(&expansion);

    info!(
        targets = targets.len(),
        overrides = overrides.len(),
        ingredients = report.ingredients.len(),
        recipes = report.recipe_usage.len(),
        "Planned production"
    );

    Ok(report)
}

pub(crate) fn expand_targets<'data, S: AsRef<str>>(
    catalog: &'data Catalog,
    targets: &[(S, Rate)],
    overrides: &RecipeOverrides<'data>,
    max_depth: usize,
) -> FactoryResult<Expansion<'data>> {
    let mut expansion = Expansion::default();

    for (name, rate) in targets {
        let item = catalog.get_item(name.as_ref())?;
        expansion.extend(expand_item(catalog, item, *rate, overrides, max_depth)?);
    }

    Ok(expansion)
}
