//! Composition of the three figures into the single served page.

use std::fmt::Write;

use serde::Serialize;

use crate::census::DailyCensus;
use crate::charts::{covid_trend_plot, hospitalisation_histogram, test_centre_map};
use crate::dataset::TestCentreRow;
use crate::figure::Figure;

// Stable element ids, relied upon for styling and automation hooks
pub const HISTOGRAM_GRAPH_ID: &str = "histogramme_hospitalisations";
pub const TREND_GRAPH_ID: &str = "plan_cas";
pub const MAP_GRAPH_ID: &str = "carte_tests";

const PAGE_TITLE: &str = "Données COVID-19 en France";
const PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.32.0.min.js";

// The map needs extra height for its aspect ratio
const MAP_HEIGHT: &str = "110vh";

/// One chart slot on the page: a target element plus its figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graph {
    pub element_id: &'static str,
    pub class_name: &'static str,
    pub figure: Figure,
    /// CSS height override; `None` leaves the element at its natural height
    pub height: Option<&'static str>,
}

/// The composed page: a centered title followed by the three graphs, top to
/// bottom. Assembly and rendering are pure, so the same tables always produce
/// the same page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub page_title: String,
    pub graphs: Vec<Graph>,
}

impl Dashboard {
    pub fn assemble(census: &[DailyCensus], centres: &[TestCentreRow]) -> Self {
        Self {
            page_title: PAGE_TITLE.to_string(),
            graphs: vec![
                Graph {
                    element_id: HISTOGRAM_GRAPH_ID,
                    class_name: HISTOGRAM_GRAPH_ID,
                    figure: hospitalisation_histogram(census),
                    height: None,
                },
                Graph {
                    element_id: TREND_GRAPH_ID,
                    class_name: TREND_GRAPH_ID,
                    figure: covid_trend_plot(census),
                    height: None,
                },
                Graph {
                    element_id: MAP_GRAPH_ID,
                    class_name: MAP_GRAPH_ID,
                    figure: test_centre_map(centres),
                    height: Some(MAP_HEIGHT),
                },
            ],
        }
    }

    pub fn graph(&self, element_id: &str) -> Option<&Graph> {
        self.graphs
            .iter()
            .find(|graph| graph.element_id == element_id)
    }

    /// Renders the page as one self-contained HTML document embedding each
    /// figure specification as JSON next to a plotly.js include.
    pub fn render_html(&self) -> serde_json::Result<String> {
        let mut page = String::new();
        // Writing to a String cannot fail, so the fmt results are discarded
        let _ = writeln!(page, "<!DOCTYPE html>");
        let _ = writeln!(page, "<html lang=\"fr\">");
        let _ = writeln!(page, "<head>");
        let _ = writeln!(page, "  <meta charset=\"utf-8\">");
        let _ = writeln!(page, "  <title>{}</title>", self.page_title);
        let _ = writeln!(page, "  <script src=\"{PLOTLY_JS_URL}\"></script>");
        let _ = writeln!(page, "</head>");
        let _ = writeln!(page, "<body>");
        let _ = writeln!(
            page,
            "  <h1 style=\"text-align: center\">{}</h1>",
            self.page_title
        );
        for graph in &self.graphs {
            let style = match graph.height {
                Some(height) => format!(" style=\"height: {height}\""),
                None => String::new(),
            };
            let _ = writeln!(
                page,
                "  <div id=\"{}\" class=\"{}\"{}></div>",
                graph.element_id, graph.class_name, style
            );
        }
        let _ = writeln!(page, "  <script>");
        for graph in &self.graphs {
            let figure_json = graph.figure.to_json()?;
            let _ = writeln!(
                page,
                "    Plotly.newPlot(\"{}\", {}.data, {}.layout, {{\"responsive\": true}});",
                graph.element_id, figure_json, figure_json
            );
        }
        let _ = writeln!(page, "  </script>");
        let _ = writeln!(page, "</body>");
        let _ = writeln!(page, "</html>");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn census_fixture() -> Vec<DailyCensus> {
        vec![DailyCensus {
            jour: NaiveDate::from_ymd_opt(2020, 3, 18).unwrap(),
            hosp: 5,
            rea: 2,
            rad: 1,
            dc: 0,
        }]
    }

    #[test]
    fn page_contains_the_three_stable_element_ids() {
        let dashboard = Dashboard::assemble(&census_fixture(), &[]);
        let html = dashboard.render_html().unwrap();
        for element_id in [HISTOGRAM_GRAPH_ID, TREND_GRAPH_ID, MAP_GRAPH_ID] {
            assert!(html.contains(&format!("id=\"{element_id}\"")));
            assert!(html.contains(&format!("Plotly.newPlot(\"{element_id}\"")));
        }
    }

    #[test]
    fn graphs_are_ordered_histogram_trend_map() {
        let dashboard = Dashboard::assemble(&census_fixture(), &[]);
        let ids: Vec<&str> = dashboard
            .graphs
            .iter()
            .map(|graph| graph.element_id)
            .collect();
        assert_eq!(ids, vec![HISTOGRAM_GRAPH_ID, TREND_GRAPH_ID, MAP_GRAPH_ID]);
    }

    #[test]
    fn only_the_map_is_stretched() {
        let dashboard = Dashboard::assemble(&census_fixture(), &[]);
        assert_eq!(dashboard.graph(MAP_GRAPH_ID).unwrap().height, Some("110vh"));
        assert_eq!(dashboard.graph(HISTOGRAM_GRAPH_ID).unwrap().height, None);
        let html = dashboard.render_html().unwrap();
        assert!(html.contains("style=\"height: 110vh\""));
    }

    #[test]
    fn page_title_is_centered() {
        let dashboard = Dashboard::assemble(&census_fixture(), &[]);
        let html = dashboard.render_html().unwrap();
        assert!(html.contains("<h1 style=\"text-align: center\">Données COVID-19 en France</h1>"));
    }

    #[test]
    fn rendering_twice_is_byte_identical() {
        let dashboard = Dashboard::assemble(&census_fixture(), &[]);
        assert_eq!(
            dashboard.render_html().unwrap(),
            dashboard.render_html().unwrap()
        );
    }

    #[test]
    fn empty_tables_render_an_empty_but_valid_page() {
        let dashboard = Dashboard::assemble(&[], &[]);
        let html = dashboard.render_html().unwrap();
        assert!(html.contains(HISTOGRAM_GRAPH_ID));
        assert!(html.contains("\"x\":[]"));
    }

    #[test]
    fn unknown_graph_lookup_returns_none() {
        let dashboard = Dashboard::assemble(&census_fixture(), &[]);
        assert!(dashboard.graph("unknown").is_none());
    }
}
