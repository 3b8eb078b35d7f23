pub use crate::aggregate::{MachineTotal, RecipeUsage, Report};
pub use crate::data::Catalog;
pub use crate::display::{render_optimization, render_plan};
pub use crate::domain::{CraftingGraph, Node};
pub use crate::entities::{Item, ItemQuantity, Machine, Rate, Recipe, RecipeKind};
pub use crate::error::{FactoryError, FactoryResult};
pub use crate::expansion::{expand, expand_item, Expansion, DEFAULT_MAX_DEPTH};
pub use crate::optimizer::{optimize, optimize_with_depth, Optimization, OptimizedPlan};
pub use crate::overrides::{RecipeChoice, RecipeOverrides};
pub use crate::plan::plan;
pub use crate::traits::DataSource;
