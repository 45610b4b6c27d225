use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum CovidashError {
    #[error("failed to read dataset '{path}'")]
    DatasetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dataset '{path}'")]
    DatasetParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("dataset '{path}' is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },
}

pub type CovidashResult<T> = Result<T, CovidashError>;
