use std::io;
use thiserror::Error;

pub type FactoryResult<T> = Result<T, FactoryError>;

#[derive(Error, Debug)]
pub enum FactoryError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("Failed to parse provided json file `{0}`")]
    BadJson(serde_json::Error),

    #[error("Recipe `{0}` is declared more than once")]
    DuplicateRecipe(String),

    #[error("Recipe `{0}` has no outputs")]
    RecipeWithoutOutputs(String),

    #[error("Recipe `{recipe}` produces `{item}` at an invalid rate {rate}")]
    InvalidOutputRate {
        recipe: String,
        item: String,
        rate: f64,
    },

    #[error("Recipe `{recipe}` has an invalid cycle time {time}")]
    InvalidCycleTime { recipe: String, time: f64 },

    #[error("Item `{0}` not found")]
    UnknownItem(String),

    #[error("Recipe `{0}` not found")]
    UnknownRecipe(String),

    #[error("Machine `{0}` not found")]
    UnknownMachine(String),

    #[error("Recipe `{recipe}` does not produce `{item}`")]
    OutputNotProduced { recipe: String, item: String },

    #[error("Quantity {amount} of `{item}` must be finite and non-negative")]
    InvalidQuantity { item: String, amount: f64 },

    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),

    #[error("Can't represent amount {0} as decimal")]
    CantRepresentAmountAsDecimal(f64),

    #[error("Error when spawning command: `{0}`")]
    CommandSpawn(String),

    #[error("Failed to interpret the output of command")]
    CommandOutputError(#[from] std::str::Utf8Error),
}
