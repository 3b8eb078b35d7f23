use factory_lib::error::FactoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error(transparent)]
    Data(#[from] FactoryError),

    #[error("Can't load catalog `{path}`: {source}")]
    Catalog {
        path: String,
        #[source]
        source: FactoryError,
    },
}
