use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cmm_model::format_datetime;
use cmm_report::Summary;

pub fn print_summary(summary: &Summary) {
    for (title, table) in summary_tables(summary) {
        println!("{title}");
        println!("{table}");
        println!();
    }
}

/// One titled table per summary view.
pub fn summary_tables(summary: &Summary) -> Vec<(&'static str, Table)> {
    vec![
        ("Hauling", hauling_table(summary)),
        ("Stock", stock_table(summary)),
        ("Net stock by dimension", stock_net_table(summary)),
        ("Length usage by dimension (m)", length_table(summary)),
        ("Usage by roof element", element_table(summary)),
    ]
}

fn hauling_table(summary: &Summary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Dimension"), header_cell("Quantity")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for total in &summary.hauling {
        table.add_row(vec![Cell::new(&total.dimension), Cell::new(total.quantity)]);
    }
    table
}

fn stock_table(summary: &Summary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Datetime"),
        header_cell("Dimension"),
        header_cell("In"),
        header_cell("Out"),
        header_cell("Net"),
    ]);
    apply_table_style(&mut table);
    for index in 2..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for point in &summary.stock_timeline {
        table.add_row(vec![
            Cell::new(format_datetime(&point.datetime)),
            Cell::new(&point.dimension),
            Cell::new(point.in_cumulative),
            Cell::new(point.out_cumulative),
            net_cell(point.net),
        ]);
    }
    table
}

fn stock_net_table(summary: &Summary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Dimension"), header_cell("Net (ea)")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (dimension, net) in &summary.stock_net {
        table.add_row(vec![Cell::new(dimension), net_cell(*net)]);
    }
    table
}

fn length_table(summary: &Summary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dimension"),
        header_cell("Planner"),
        header_cell("Stock out"),
        header_cell("Installed"),
        header_cell("Remaining"),
        header_cell("Progress"),
        header_cell("Of plan"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for usage in &summary.length_usage {
        table.add_row(vec![
            Cell::new(&usage.dimension),
            Cell::new(format!("{:.2}", usage.planned)),
            Cell::new(format!("{:.2}", usage.stock_out)),
            Cell::new(format!("{:.2}", usage.installed)),
            Cell::new(format!("{:.2}", usage.remaining)),
            Cell::new(format!("{:.0}%", usage.progress * 100.0)),
            Cell::new(format!("{:.0}%", usage.planner_progress * 100.0)),
        ]);
    }
    table
}

fn element_table(summary: &Summary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Element"),
        header_cell("Planned (ea)"),
        header_cell("Installed (ea)"),
        header_cell("Remaining (ea)"),
        header_cell("Progress"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for usage in &summary.element_usage {
        let progress = usage
            .progress_percent
            .map_or_else(|| "-".to_string(), |percent| format!("{percent:.2}%"));
        table.add_row(vec![
            Cell::new(&usage.element),
            Cell::new(usage.planned),
            Cell::new(usage.quantity),
            Cell::new(usage.remaining),
            Cell::new(progress),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn net_cell(net: i64) -> Cell {
    if net < 0 {
        Cell::new(net).fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        Cell::new(net)
    }
}
