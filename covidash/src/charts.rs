//! Builders for the three dashboard figures. Each builder reads the shared
//! tables and emits a self-contained `Figure`; none of them mutate anything.

use itertools::Itertools;
use nonempty::{nonempty, NonEmpty};

use crate::census::DailyCensus;
use crate::dataset::TestCentreRow;
use crate::figure::{
    Axis, BarTrace, ColorAxis, Figure, Layout, MapMarker, MapTrace, Mapbox, Marker, MarkerLine,
    Trace, TraceMode,
};
use crate::COL;

const PLOT_BGCOLOR: &str = "white";
const BAR_OUTLINE_WIDTH: f64 = 2.0;
const BAR_OUTLINE_COLOR: &str = "black";
const MONTH_YEAR_TICKFORMAT: &str = "%B %Y";
const MAP_ZOOM: f64 = 4.7;
const MAP_STYLE: &str = "open-street-map";

/// Hover rows of the centre map: source column and its display label, in
/// display order. Latitude and longitude are deliberately not listed.
const HOVER_FIELDS: &[(&str, &str)] = &[
    (COL::HORAIRE, "Horaires"),
    (COL::MOD_PREL, "Modalités de prévèvement"),
    (COL::DO_PREL, "Tests RT-PCR"),
    (COL::DO_ANTIGENIC, "Tests antigéniques"),
    (COL::CHECK_RDV, "Sans rendez vous"),
    (COL::TEL_RDV, "Téléphone"),
    (COL::WEB_RDV, "Site web"),
    (COL::PUBLIC, "Public autorisé"),
];

/// One bar per day, bar height = hospitalised count. The x-axis is
/// categorical so missing days do not open visual gaps.
pub fn hospitalisation_histogram(census: &[DailyCensus]) -> Figure {
    Figure {
        data: vec![Trace::Bar(BarTrace {
            x: census.iter().map(|day| day.jour.to_string()).collect_vec(),
            y: census.iter().map(|day| day.hosp).collect_vec(),
            marker: Some(Marker {
                line: Some(MarkerLine {
                    width: BAR_OUTLINE_WIDTH,
                    color: Some(BAR_OUTLINE_COLOR.to_string()),
                }),
            }),
        })],
        layout: Layout {
            title: Some("Evolution du nombre d'hospitalisation par jour".to_string()),
            xaxis: Some(Axis::category("Jours")),
            yaxis: Some(Axis::titled("Hospitalisations")),
            plot_bgcolor: Some(PLOT_BGCOLOR.to_string()),
            ..Default::default()
        },
    }
}

/// The census metrics a trend series can be plotted for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CensusMetric {
    Hospitalisations,
    Reanimations,
    RetoursADomicile,
    Deces,
}

impl CensusMetric {
    /// Legend label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hospitalisations => "Hospitalisations",
            Self::Reanimations => "Réanimations",
            Self::RetoursADomicile => "Retours à domicile",
            Self::Deces => "Décès",
        }
    }

    fn value(&self, day: &DailyCensus) -> u64 {
        match self {
            Self::Hospitalisations => day.hosp,
            Self::Reanimations => day.rea,
            Self::RetoursADomicile => day.rad,
            Self::Deces => day.dc,
        }
    }

    /// The default trend selection. Retours à domicile are left out, matching
    /// the source dashboard's curve list.
    pub fn trend_selection() -> NonEmpty<Self> {
        nonempty![Self::Hospitalisations, Self::Reanimations, Self::Deces]
    }
}

/// One connected line per selected metric over the census days
pub fn covid_trend_plot(census: &[DailyCensus]) -> Figure {
    covid_trend_plot_for(census, CensusMetric::trend_selection())
}

pub fn covid_trend_plot_for(census: &[DailyCensus], metrics: NonEmpty<CensusMetric>) -> Figure {
    let days = census.iter().map(|day| day.jour.to_string()).collect_vec();
    Figure {
        data: metrics
            .into_iter()
            .map(|metric| {
                Trace::Scatter(ScatterSeries {
                    metric,
                    days: days.clone(),
                    census,
                }.into())
            })
            .collect(),
        layout: Layout {
            title: Some("Evolution du COVID en France".to_string()),
            xaxis: Some(Axis {
                tickformat: Some(MONTH_YEAR_TICKFORMAT.to_string()),
                ..Axis::titled("Mois")
            }),
            yaxis: Some(Axis::titled("Population")),
            plot_bgcolor: Some(PLOT_BGCOLOR.to_string()),
            ..Default::default()
        },
    }
}

struct ScatterSeries<'a> {
    metric: CensusMetric,
    days: Vec<String>,
    census: &'a [DailyCensus],
}

impl From<ScatterSeries<'_>> for crate::figure::ScatterTrace {
    fn from(series: ScatterSeries<'_>) -> Self {
        Self {
            x: series.days,
            y: series
                .census
                .iter()
                .map(|day| series.metric.value(day))
                .collect(),
            mode: TraceMode::Lines,
            name: series.metric.label().to_string(),
        }
    }
}

/// Scatter map of the test centres, colored on a green-to-blue continuous
/// scale by the antigen-test flag. The source keys a continuous scale on this
/// boolean-like column; that behavior is kept, with the coercion made
/// explicit in [`test_centre_colors`].
pub fn test_centre_map(centres: &[TestCentreRow]) -> Figure {
    Figure {
        data: vec![Trace::Scattermapbox(MapTrace {
            lat: centres.iter().map(|centre| centre.latitude).collect_vec(),
            lon: centres.iter().map(|centre| centre.longitude).collect_vec(),
            text: Some(
                centres
                    .iter()
                    .map(|centre| centre.adresse.clone())
                    .collect_vec(),
            ),
            customdata: Some(centres.iter().map(hover_row).collect_vec()),
            hovertemplate: Some(hover_template()),
            marker: Some(MapMarker {
                color: test_centre_colors(centres),
                coloraxis: "coloraxis".to_string(),
            }),
        })],
        layout: Layout {
            title: Some("Les centres de tests COVID en France".to_string()),
            mapbox: Some(Mapbox {
                style: MAP_STYLE.to_string(),
                zoom: MAP_ZOOM,
            }),
            coloraxis: Some(ColorAxis {
                colorscale: vec![(0.0, "green".to_string()), (1.0, "blue".to_string())],
            }),
            plot_bgcolor: Some(PLOT_BGCOLOR.to_string()),
            ..Default::default()
        },
    }
}

/// Color value per centre: `do_antigenic` coerced to 0/1. Centres with an
/// absent flag sit at 0, the green end of the scale.
pub fn test_centre_colors(centres: &[TestCentreRow]) -> Vec<f64> {
    centres
        .iter()
        .map(|centre| f64::from(u8::from(centre.do_antigenic.unwrap_or(false))))
        .collect()
}

fn hover_row(centre: &TestCentreRow) -> Vec<String> {
    vec![
        text_or_dash(centre.horaire.as_deref()),
        text_or_dash(centre.mod_prel.as_deref()),
        flag_text(centre.do_prel),
        flag_text(centre.do_antigenic),
        flag_text(centre.check_rdv),
        text_or_dash(centre.tel_rdv.as_deref()),
        text_or_dash(centre.web_rdv.as_deref()),
        flag_text(centre.public),
    ]
}

fn text_or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn flag_text(flag: Option<bool>) -> String {
    match flag {
        Some(true) => "oui",
        Some(false) => "non",
        None => "-",
    }
    .to_string()
}

/// Hover box: the address in bold, then one labelled row per hover field
fn hover_template() -> String {
    let rows = HOVER_FIELDS
        .iter()
        .enumerate()
        .map(|(index, (_, label))| format!("{label} : %{{customdata[{index}]}}"))
        .join("<br>");
    format!("<b>%{{text}}</b><br>{rows}<extra></extra>")
}
