//! Typed loading of the two source datasets.
//!
//! Both files are parsed eagerly into record structs so that every column is
//! validated once, at startup. A malformed row or a missing required column
//! fails the whole load; there is no partial table.

use std::fs::File;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Deserializer, Serialize};
use tokio::try_join;

use crate::config::Config;
use crate::error::{CovidashError, CovidashResult};
use crate::COL;

/// One row of the hospitalisation file: counts for a single
/// (day, sex, département) combination. `sexe == 0` rows carry the combined
/// total for both sexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalisationRow {
    pub sexe: u8,
    pub jour: NaiveDate,
    pub hosp: u64,
    pub rea: u64,
    pub rad: u64,
    pub dc: u64,
}

/// One row of the test centre file. Apart from the address and coordinates,
/// every field may be absent and is carried through as such.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCentreRow {
    pub adresse: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, deserialize_with = "optional_text")]
    pub horaire: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub mod_prel: Option<String>,
    #[serde(default, deserialize_with = "optional_flag")]
    pub do_prel: Option<bool>,
    #[serde(default, deserialize_with = "optional_flag")]
    pub do_antigenic: Option<bool>,
    #[serde(default, deserialize_with = "optional_flag")]
    pub check_rdv: Option<bool>,
    #[serde(default, deserialize_with = "optional_text")]
    pub tel_rdv: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub web_rdv: Option<String>,
    #[serde(default, deserialize_with = "optional_flag")]
    pub public: Option<bool>,
}

/// The two in-memory tables everything downstream is derived from. Built once
/// at startup and treated as read-only thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct Datasets {
    pub hospitalisations: Vec<HospitalisationRow>,
    pub centres: Vec<TestCentreRow>,
}

impl Datasets {
    /// Loads both files concurrently. A missing or malformed file is fatal.
    pub async fn load(config: &Config) -> Result<Self> {
        let hosp_path = config.hospitalisations_path.clone();
        let centre_path = config.centres_path.clone();
        let (hospitalisations, centres) = try_join!(
            tokio::task::spawn_blocking(move || load_hospitalisations(&hosp_path)),
            tokio::task::spawn_blocking(move || load_test_centres(&centre_path)),
        )?;
        let datasets = Self {
            hospitalisations: hospitalisations?,
            centres: centres?,
        };
        info!(
            "Loaded {} hospitalisation row(s) and {} centre(s)",
            datasets.hospitalisations.len(),
            datasets.centres.len()
        );
        Ok(datasets)
    }
}

/// Parses the semicolon-delimited hospitalisation file
pub fn load_hospitalisations(path: &Path) -> CovidashResult<Vec<HospitalisationRow>> {
    read_rows(path, b';', COL::HOSPITALISATION_COLUMNS)
}

/// Parses the comma-delimited test centre file
pub fn load_test_centres(path: &Path) -> CovidashResult<Vec<TestCentreRow>> {
    read_rows(path, b',', COL::TEST_CENTRE_COLUMNS)
}

fn read_rows<T: serde::de::DeserializeOwned>(
    path: &Path,
    delimiter: u8,
    required_columns: &'static [&'static str],
) -> CovidashResult<Vec<T>> {
    info!("Attempting to load dataset from {}", path.display());
    let file = File::open(path).map_err(|source| CovidashError::DatasetRead {
        path: path.to_owned(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(file);
    let headers = reader
        .headers()
        .map_err(|source| dataset_parse(path, source))?
        .clone();
    for column in required_columns {
        if !headers.iter().any(|header| header == *column) {
            return Err(CovidashError::MissingColumn {
                path: path.to_owned(),
                column,
            });
        }
    }
    reader
        .deserialize()
        .map(|row| row.map_err(|source| dataset_parse(path, source)))
        .collect()
}

fn dataset_parse(path: &Path, source: csv::Error) -> CovidashError {
    CovidashError::DatasetParse {
        path: path.to_owned(),
        source,
    }
}

/// Empty fields become `None` rather than an empty string
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.trim().is_empty()))
}

/// The source encodes booleans as `0`/`1`; exports occasionally carry
/// `true`/`false` instead, so both spellings are accepted.
fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some("0") | Some("false") | Some("False") | Some("FALSE") => Ok(Some(false)),
        Some("1") | Some("true") | Some("True") | Some("TRUE") => Ok(Some(true)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid flag value '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_fixture(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn hospitalisations_should_parse_semicolon_rows() {
        let file = write_fixture(
            "dep;sexe;jour;hosp;rea;rad;dc\n\
             01;0;2020-03-18;2;0;1;0\n\
             01;1;2020-03-18;1;0;1;0\n",
        );
        let rows = load_hospitalisations(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            HospitalisationRow {
                sexe: 0,
                jour: NaiveDate::from_ymd_opt(2020, 3, 18).unwrap(),
                hosp: 2,
                rea: 0,
                rad: 1,
                dc: 0,
            }
        );
    }

    #[test]
    fn hospitalisations_should_reject_non_numeric_counts() {
        let file = write_fixture("sexe;jour;hosp;rea;rad;dc\n0;2020-03-18;abc;0;0;0\n");
        let result = load_hospitalisations(file.path());
        assert!(matches!(
            result,
            Err(CovidashError::DatasetParse { .. })
        ));
    }

    #[test]
    fn hospitalisations_should_reject_missing_columns() {
        let file = write_fixture("sexe;jour;hosp\n0;2020-03-18;1\n");
        let result = load_hospitalisations(file.path());
        assert!(matches!(
            result,
            Err(CovidashError::MissingColumn { column: COL::REA, .. })
        ));
    }

    #[test]
    fn missing_file_should_be_fatal() {
        let result = load_hospitalisations(Path::new("does-not-exist.csv"));
        assert!(matches!(result, Err(CovidashError::DatasetRead { .. })));
    }

    #[test]
    fn centres_should_parse_optional_fields() {
        let file = write_fixture(
            "adresse,latitude,longitude,horaire,mod_prel,do_prel,do_antigenic,check_rdv,tel_rdv,web_rdv,public\n\
             1 rue de Paris,48.85,2.35,9h-18h,Sans RDV,1,0,1,0102030405,https://example.fr,1\n\
             2 rue de Lyon,45.76,4.83,,,,,,,,\n",
        );
        let centres = load_test_centres(file.path()).unwrap();
        assert_eq!(centres.len(), 2);
        assert_eq!(centres[0].do_prel, Some(true));
        assert_eq!(centres[0].do_antigenic, Some(false));
        assert_eq!(centres[0].horaire.as_deref(), Some("9h-18h"));
        // Second row only carries the required columns
        assert_eq!(centres[1].do_antigenic, None);
        assert_eq!(centres[1].horaire, None);
        assert_eq!(centres[1].tel_rdv, None);
    }

    #[test]
    fn centres_should_accept_spelled_out_flags() {
        let file = write_fixture(
            "adresse,latitude,longitude,do_antigenic\n1 rue de Paris,48.85,2.35,true\n",
        );
        let centres = load_test_centres(file.path()).unwrap();
        assert_eq!(centres[0].do_antigenic, Some(true));
    }

    #[test]
    fn centres_should_reject_unknown_flag_values() {
        let file = write_fixture(
            "adresse,latitude,longitude,do_antigenic\n1 rue de Paris,48.85,2.35,maybe\n",
        );
        assert!(load_test_centres(file.path()).is_err());
    }

    #[test]
    fn empty_centre_file_should_load_as_empty_table() {
        let file = write_fixture("adresse,latitude,longitude\n");
        let centres = load_test_centres(file.path()).unwrap();
        assert!(centres.is_empty());
    }

    #[tokio::test]
    async fn datasets_should_load_both_files() {
        let hosp = write_fixture("sexe;jour;hosp;rea;rad;dc\n0;2020-03-18;2;0;1;0\n");
        let centres = write_fixture("adresse,latitude,longitude\n1 rue de Paris,48.85,2.35\n");
        let config = Config {
            hospitalisations_path: hosp.path().to_owned(),
            centres_path: centres.path().to_owned(),
            ..Config::default()
        };
        let datasets = Datasets::load(&config).await.unwrap();
        assert_eq!(datasets.hospitalisations.len(), 1);
        assert_eq!(datasets.centres.len(), 1);
    }

    #[tokio::test]
    async fn datasets_load_should_fail_when_a_file_is_missing() {
        let hosp = write_fixture("sexe;jour;hosp;rea;rad;dc\n");
        let config = Config {
            hospitalisations_path: hosp.path().to_owned(),
            centres_path: "missing-centres.csv".into(),
            ..Config::default()
        };
        assert!(Datasets::load(&config).await.is_err());
    }
}
