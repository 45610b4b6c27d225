use covidash::error::CovidashError;

#[derive(thiserror::Error, Debug)]
pub enum CovidashCliError {
    #[error("Anyhow error")]
    Anyhow(#[from] anyhow::Error),
    #[error("serde JSON error")]
    SerdeJSONError(#[from] serde_json::Error),
    #[error("covidash error")]
    CovidashError(#[from] CovidashError),
    #[error("std IO error")]
    IOError(#[from] std::io::Error),
}

pub type CovidashCliResult<T> = Result<T, CovidashCliError>;
