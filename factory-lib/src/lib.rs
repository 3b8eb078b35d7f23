//! Production chain planning for crafting games.
//!
//! A [`data::Catalog`] is loaded once from a recipe dataset and shared read-only.
//! [`plan::plan`] answers "what does producing these rates take", while
//! [`optimizer::optimize`] answers "what is the most I can produce with what I have".

pub mod aggregate;
pub mod data;
pub mod display;
pub mod domain;
pub mod entities;
pub mod error;
pub mod expansion;
pub mod optimizer;
pub mod overrides;
pub mod plan;
pub mod prelude;
pub mod traits;
