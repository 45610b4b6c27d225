//! This module contains the column names of the two source datasets.

// Hospitalisation dataset (semicolon-delimited)
pub const SEXE: &str = "sexe";
pub const JOUR: &str = "jour";
pub const HOSP: &str = "hosp";
pub const REA: &str = "rea";
pub const RAD: &str = "rad";
pub const DC: &str = "dc";

// Test centre dataset (comma-delimited)
pub const ADRESSE: &str = "adresse";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const HORAIRE: &str = "horaire";
pub const MOD_PREL: &str = "mod_prel";
pub const DO_PREL: &str = "do_prel";
pub const DO_ANTIGENIC: &str = "do_antigenic";
pub const CHECK_RDV: &str = "check_rdv";
pub const TEL_RDV: &str = "tel_rdv";
pub const WEB_RDV: &str = "web_rdv";
pub const PUBLIC: &str = "public";

/// Columns that must be present in the hospitalisation file
pub const HOSPITALISATION_COLUMNS: &[&str] = &[SEXE, JOUR, HOSP, REA, RAD, DC];

/// Columns that must be present in the test centre file. The remaining centre
/// columns are optional and pass through as absent when missing.
pub const TEST_CENTRE_COLUMNS: &[&str] = &[ADRESSE, LATITUDE, LONGITUDE];
