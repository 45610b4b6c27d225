use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Semicolon-delimited daily hospitalisation counts
    pub hospitalisations_path: PathBuf,
    /// Comma-delimited test centre listing
    pub centres_path: PathBuf,
    pub listen_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            hospitalisations_path: "histogramme.csv".into(),
            centres_path: "carte.csv".into(),
            listen_addr: "127.0.0.1:8050".into(),
        }
    }
}
