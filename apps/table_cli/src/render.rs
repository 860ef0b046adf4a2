//! Plain-text rendering of the table view models.

use std::fmt::Write as _;

use table_client::{
    view::{self, FilterControl, PaginatorView},
    TableConfig, TableState,
};

pub fn render(state: &TableState, config: &TableConfig) -> String {
    let mut out = String::new();

    if !state.is_initialized {
        render_error(&mut out, state);
        let _ = writeln!(out, "{}", view::initialize_prompt(config));
        return out;
    }

    render_filters(&mut out, state, config);
    render_error(&mut out, state);

    let export = view::export_button(state);
    let _ = writeln!(
        out,
        "[Export the data (with filters applied)]{}",
        if export.enabled { "" } else { " (disabled)" }
    );
    if let Some(note) = export.note {
        let _ = writeln!(out, "{note}");
    }

    let paginator = view::paginator(state);
    if let Some(paginator) = &paginator {
        render_paginator(&mut out, paginator);
    }
    render_table(&mut out, state, config);
    if let Some(paginator) = &paginator {
        render_page_buttons(&mut out, paginator);
    }

    out
}

fn render_error(out: &mut String, state: &TableState) {
    if let Some(error) = &state.error {
        let _ = writeln!(out, "! {error}");
    }
}

fn render_filters(out: &mut String, state: &TableState, config: &TableConfig) {
    for row in view::filter_rows(state) {
        let shown = match row.control {
            FilterControl::Input {
                value, placeholder, ..
            } if value.is_empty() => placeholder.map(|p| format!("<{p}>")).unwrap_or_default(),
            FilterControl::Input { value, .. } => value,
            FilterControl::Checkbox { checked: true } => "[x]".to_string(),
            FilterControl::Checkbox { checked: false } => "[ ]".to_string(),
        };
        let _ = writeln!(out, "{:<20} {shown}", row.name);
    }

    let apply = view::apply_button(state, config, None);
    let _ = writeln!(
        out,
        "[{}]{}",
        apply.label,
        if apply.enabled { "" } else { " (disabled)" }
    );
}

fn render_paginator(out: &mut String, paginator: &PaginatorView) {
    let _ = writeln!(out, "{}", paginator.summary());
    if let Some(note) = paginator.note() {
        let _ = writeln!(out, "{note}");
    }
}

fn render_page_buttons(out: &mut String, paginator: &PaginatorView) {
    let buttons: Vec<String> = paginator
        .buttons
        .iter()
        .map(|button| {
            if button.current {
                format!("[{}]", button.page)
            } else {
                button.page.to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "{}", buttons.join(" "));
}

fn render_table(out: &mut String, state: &TableState, config: &TableConfig) {
    let headers: Vec<String> = view::column_headers(state)
        .iter()
        .map(|header| header.label())
        .collect();
    if headers.is_empty() {
        return;
    }
    let rows = view::rows(state, config);

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let _ = writeln!(out, "{}", line(&headers));
    let _ = writeln!(
        out,
        "{}",
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    for row in &rows {
        let _ = writeln!(out, "{}", line(row));
    }
}
