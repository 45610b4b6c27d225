use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use covidash::config::Config;
use covidash::dashboard::{Dashboard, HISTOGRAM_GRAPH_ID, MAP_GRAPH_ID, TREND_GRAPH_ID};
use covidash::Covidash;
use enum_dispatch::enum_dispatch;
use log::info;
use serde::{Deserialize, Serialize};
use spinners::{Spinner, Spinners};
use strum_macros::EnumString;

use crate::display::display_daily_census;
use crate::error::CovidashCliResult;

const DEFAULT_PROGRESS_SPINNER: Spinners = Spinners::Dots;
const COMPLETE_PROGRESS_STRING: &str = "✔";
const RUNNING_TAIL_STRING: &str = "...";
const LOADING_DATASETS_STRING: &str = "Loading datasets";

/// Trait that defines what to run when a given subcommand is invoked.
#[enum_dispatch]
pub trait RunCommand {
    async fn run(&self, config: Config) -> CovidashCliResult<()>;
}

/// Loads both datasets with a progress spinner unless `--quiet` is set
async fn load_covidash(config: Config, quiet: bool) -> CovidashCliResult<Covidash> {
    let sp = (!quiet).then(|| {
        Spinner::with_timer(
            DEFAULT_PROGRESS_SPINNER,
            LOADING_DATASETS_STRING.to_string() + RUNNING_TAIL_STRING,
        )
    });
    let covidash = Covidash::new_with_config(config).await?;
    if let Some(mut s) = sp {
        s.stop_with_symbol(COMPLETE_PROGRESS_STRING);
    }
    Ok(covidash)
}

/// The `serve` command loads the datasets, composes the dashboard page and
/// serves it until the process is stopped.
#[derive(Args, Debug, Default)]
pub struct ServeCommand {
    #[arg(
        short,
        long,
        help = "Address to listen on, overriding the configured one",
        value_name = "HOST:PORT"
    )]
    listen_addr: Option<String>,
    #[arg(from_global)]
    quiet: bool,
}

impl RunCommand for ServeCommand {
    async fn run(&self, config: Config) -> CovidashCliResult<()> {
        info!("Running `serve` subcommand");
        let mut config = config;
        if let Some(listen_addr) = self.listen_addr.as_ref() {
            config.listen_addr = listen_addr.clone();
        }
        let covidash = load_covidash(config, self.quiet).await?;
        println!("Dashboard on http://{}", covidash.config.listen_addr);
        covidash.serve().await?;
        Ok(())
    }
}

/// The `summary` command prints the aggregated daily census as a table.
#[derive(Args, Debug)]
pub struct SummaryCommand {
    #[arg(long, help = "Maximum number of days to display")]
    max_results: Option<usize>,
    #[arg(from_global)]
    quiet: bool,
}

impl RunCommand for SummaryCommand {
    async fn run(&self, config: Config) -> CovidashCliResult<()> {
        info!("Running `summary` subcommand");
        let covidash = load_covidash(config, self.quiet).await?;
        let census = covidash.census();
        print_day_count(census.len());
        display_daily_census(&census, self.max_results);
        Ok(())
    }
}

/// Defines the outputs the `export` command can produce.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, EnumString, PartialEq, Eq)]
#[strum(ascii_case_insensitive)]
pub enum ExportTarget {
    Histogramme,
    Plan,
    Carte,
    Page,
}

/// The `export` command writes one chart specification as JSON, or the whole
/// page as HTML, to a file or stdout.
#[derive(Args, Debug)]
pub struct ExportCommand {
    #[arg(
        short = 't',
        long,
        value_name = "histogramme|plan|carte|page",
        help = "Which output to export"
    )]
    target: ExportTarget,
    #[arg(short = 'o', long, help = "Output file to place the results")]
    output_file: Option<String>,
    #[arg(from_global)]
    quiet: bool,
}

impl RunCommand for ExportCommand {
    async fn run(&self, config: Config) -> CovidashCliResult<()> {
        info!("Running `export` subcommand");
        let covidash = load_covidash(config, self.quiet).await?;
        let dashboard = covidash.dashboard();
        let contents = match self.target {
            ExportTarget::Page => dashboard.render_html()?,
            ExportTarget::Histogramme => figure_json(&dashboard, HISTOGRAM_GRAPH_ID)?,
            ExportTarget::Plan => figure_json(&dashboard, TREND_GRAPH_ID)?,
            ExportTarget::Carte => figure_json(&dashboard, MAP_GRAPH_ID)?,
        };
        write_output(&contents, self.output_file.as_deref())?;
        Ok(())
    }
}

fn figure_json(dashboard: &Dashboard, element_id: &str) -> CovidashCliResult<String> {
    let graph = dashboard
        .graph(element_id)
        .with_context(|| format!("no graph with id '{element_id}'"))?;
    Ok(serde_json::to_string_pretty(&graph.figure)?)
}

fn write_output<P: AsRef<Path>>(contents: &str, output_file: Option<P>) -> CovidashCliResult<()> {
    if let Some(output_file) = output_file {
        let mut f = File::create(output_file).context("Failed to write output")?;
        f.write_all(contents.as_bytes())
            .context("Failed to write output")?;
    } else {
        let mut stdout_lock = std::io::stdout().lock();
        stdout_lock.write_all(contents.as_bytes())?;
    }
    Ok(())
}

fn print_day_count(len_days: usize) {
    println!("Found {len_days} day(s).");
}

/// The entrypoint for the CLI.
#[derive(Parser, Debug)]
#[command(version, about="Covidash serves a dashboard of French COVID-19 data", long_about = None, name="covidash")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    #[arg(
        short = 'q',
        long = "quiet",
        help = "\
            Do not print the progress spinner to stdout. Results and logs (when\n\
            `RUST_LOG` is set) will still be printed.",
        global = true
    )]
    quiet: bool,
}

/// Commands contains the list of subcommands available for use in the CLI.
/// Each command implements the RunCommand trait and specifies the list of
/// required args for that command.
#[derive(Subcommand, Debug)]
#[enum_dispatch(RunCommand)]
pub enum Commands {
    /// Load the datasets and serve the dashboard page
    Serve(ServeCommand),
    /// Print the aggregated daily hospitalisation census
    Summary(SummaryCommand),
    /// Export a chart specification or the dashboard page
    Export(ExportCommand),
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::str::FromStr;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_fixture(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn fixture_config(hosp: &NamedTempFile, centres: &NamedTempFile) -> Config {
        Config {
            hospitalisations_path: hosp.path().to_owned(),
            centres_path: centres.path().to_owned(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_export_command() {
        let hosp = write_fixture("sexe;jour;hosp;rea;rad;dc\n0;2020-03-18;2;0;1;0\n");
        let centres = write_fixture("adresse,latitude,longitude\n1 rue de Paris,48.85,2.35\n");
        let output = NamedTempFile::new().unwrap();
        let export_command = ExportCommand {
            target: ExportTarget::Carte,
            output_file: Some(output.path().to_string_lossy().to_string()),
            quiet: true,
        };
        let result = export_command.run(fixture_config(&hosp, &centres)).await;
        assert!(result.is_ok());
        let contents = std::fs::read_to_string(output.path()).unwrap();
        assert!(contents.contains("scattermapbox"));
        assert!(contents.contains("open-street-map"));
    }

    #[tokio::test]
    async fn test_export_page_command() {
        let hosp = write_fixture("sexe;jour;hosp;rea;rad;dc\n0;2020-03-18;2;0;1;0\n");
        let centres = write_fixture("adresse,latitude,longitude\n");
        let output = NamedTempFile::new().unwrap();
        let export_command = ExportCommand {
            target: ExportTarget::Page,
            output_file: Some(output.path().to_string_lossy().to_string()),
            quiet: true,
        };
        let result = export_command.run(fixture_config(&hosp, &centres)).await;
        assert!(result.is_ok());
        let contents = std::fs::read_to_string(output.path()).unwrap();
        assert!(contents.contains("histogramme_hospitalisations"));
        assert!(contents.contains("plan_cas"));
        assert!(contents.contains("carte_tests"));
    }

    #[tokio::test]
    async fn test_summary_command() {
        let hosp = write_fixture(
            "sexe;jour;hosp;rea;rad;dc\n0;2020-03-18;2;0;1;0\n0;2020-03-19;3;1;1;0\n",
        );
        let centres = write_fixture("adresse,latitude,longitude\n");
        let summary_command = SummaryCommand {
            max_results: Some(1),
            quiet: true,
        };
        let result = summary_command.run(fixture_config(&hosp, &centres)).await;
        assert!(result.is_ok());
    }

    #[test]
    fn export_target_should_parse_case_insensitively() {
        assert_eq!(
            ExportTarget::from_str("carte").unwrap(),
            ExportTarget::Carte
        );
        assert_eq!(ExportTarget::from_str("PAGE").unwrap(), ExportTarget::Page);
        assert!(
            ExportTarget::from_str("camembert").is_err(),
            "non listed targets should fail"
        );
    }

    #[test]
    fn cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
