use comfy_table::{presets::NOTHING, *};

use covidash::census::DailyCensus;

/// Prints the aggregated daily census, capped to `max_results` days when set
pub fn display_daily_census(census: &[DailyCensus], max_results: Option<usize>) {
    let rows_to_show = match max_results {
        Some(max) => &census[..census.len().min(max)],
        None => census,
    };
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Jour").add_attribute(Attribute::Bold),
            Cell::new("Hospitalisations").add_attribute(Attribute::Bold),
            Cell::new("Réanimations").add_attribute(Attribute::Bold),
            Cell::new("Retours à domicile").add_attribute(Attribute::Bold),
            Cell::new("Décès").add_attribute(Attribute::Bold),
        ])
        .set_style(comfy_table::TableComponent::BottomBorder, '─')
        .set_style(comfy_table::TableComponent::MiddleHeaderIntersections, '─')
        .set_style(comfy_table::TableComponent::HeaderLines, '─')
        .set_style(comfy_table::TableComponent::BottomBorderIntersections, '─')
        .set_style(comfy_table::TableComponent::TopBorder, '─')
        .set_style(comfy_table::TableComponent::TopBorderIntersections, '─');
    for day in rows_to_show {
        table.add_row(vec![
            day.jour.to_string(),
            day.hosp.to_string(),
            day.rea.to_string(),
            day.rad.to_string(),
            day.dc.to_string(),
        ]);
    }
    println!("\n{}", table);
}
