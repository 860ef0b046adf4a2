//! View models for the presentation layer. Nothing here mutates state.

use serde_json::Value;
use shared::domain::{SortDirection, TableColumn, TableFilterValue};

use crate::{
    config::TableConfig,
    filter::display_value,
    pagination::page_window,
    sort::current_direction,
    state::TableState,
};

pub const APPLY_LABEL: &str = "Apply";
pub const LIST_PLACEHOLDER: &str = "Comma-delimited: a,b,c,...";
pub const EXPORT_STALE_NOTE: &str = "Note: Filters should be applied before exporting";
pub const PAGINATION_STALE_NOTE: &str = "Note: Filters should be applied for enabling pagination";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyButtonView {
    pub label: String,
    pub enabled: bool,
}

/// `applied_text` overrides the configured label shown once filters are
/// applied (the token row uses "Active").
pub fn apply_button(
    state: &TableState,
    config: &TableConfig,
    applied_text: Option<&str>,
) -> ApplyButtonView {
    let label = if state.were_filters_applied {
        applied_text.unwrap_or(&config.applied_text).to_string()
    } else if state.is_initialized {
        APPLY_LABEL.to_string()
    } else {
        config.initialize_message.clone()
    };

    ApplyButtonView {
        label,
        enabled: !(state.is_loading || state.were_filters_applied),
    }
}

pub fn initialize_prompt(config: &TableConfig) -> String {
    format!(
        "First insert your access token below and then click on \"{}\"",
        config.initialize_message
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportView {
    pub enabled: bool,
    pub note: Option<&'static str>,
}

pub fn export_button(state: &TableState) -> ExportView {
    ExportView {
        enabled: state.pagination_enabled(),
        note: (!state.were_filters_applied).then_some(EXPORT_STALE_NOTE),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorStatus {
    Ready,
    Loading,
    FiltersStale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    pub page: u64,
    pub current: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatorView {
    pub page: u64,
    pub page_count: u64,
    pub status: PaginatorStatus,
    pub buttons: Vec<PageButton>,
    pub go_enabled: bool,
}

impl PaginatorView {
    pub fn summary(&self) -> String {
        format!("Page {} of {}", self.page, self.page_count)
    }

    pub fn note(&self) -> Option<&'static str> {
        match self.status {
            PaginatorStatus::Ready => None,
            PaginatorStatus::Loading => Some("Loading..."),
            PaginatorStatus::FiltersStale => Some(PAGINATION_STALE_NOTE),
        }
    }
}

pub fn paginator(state: &TableState) -> Option<PaginatorView> {
    if state.data.is_empty() {
        return None;
    }

    let enabled = state.pagination_enabled();
    let buttons = page_window(state.page, state.page_count)
        .map(|page| PageButton {
            page,
            current: page == state.page,
            enabled: enabled && page != state.page,
        })
        .collect();

    let status = if state.is_loading {
        PaginatorStatus::Loading
    } else if !state.were_filters_applied {
        PaginatorStatus::FiltersStale
    } else {
        PaginatorStatus::Ready
    };

    Some(PaginatorView {
        page: state.page,
        page_count: state.page_count,
        status,
        buttons,
        go_enabled: enabled,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeaderView {
    pub name: String,
    pub sortable: bool,
    pub direction: Option<SortDirection>,
}

impl ColumnHeaderView {
    pub fn label(&self) -> String {
        match self.direction {
            Some(direction) if self.sortable => format!("{} ({})", self.name, direction.as_str()),
            _ => self.name.clone(),
        }
    }
}

pub fn column_headers(state: &TableState) -> Vec<ColumnHeaderView> {
    state
        .columns
        .iter()
        .map(|column| ColumnHeaderView {
            name: column.name.clone(),
            sortable: column.is_sortable,
            direction: column
                .is_sortable
                .then(|| current_direction(state.sort.as_ref(), &column.name))
                .flatten(),
        })
        .collect()
}

/// Missing and null cells are blank, booleans print as `true`/`false`.
pub fn default_cell_text(row: &Value, column: &TableColumn) -> String {
    match row.get(&column.name) {
        None | Some(Value::Null) => String::new(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn cell_text(config: &TableConfig, row: &Value, column: &TableColumn, index: usize) -> String {
    config
        .cell_renderer
        .as_ref()
        .and_then(|render| render(row, column, index))
        .unwrap_or_else(|| default_cell_text(row, column))
}

pub fn rows(state: &TableState, config: &TableConfig) -> Vec<Vec<String>> {
    state
        .data
        .iter()
        .map(|row| {
            state
                .columns
                .iter()
                .enumerate()
                .map(|(index, column)| cell_text(config, row, column, index))
                .collect()
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Number,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterControl {
    Input {
        input_type: InputType,
        placeholder: Option<&'static str>,
        value: String,
    },
    Checkbox {
        checked: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRowView {
    pub name: String,
    pub control: FilterControl,
}

pub fn filter_rows(state: &TableState) -> Vec<FilterRowView> {
    state
        .filters
        .iter()
        .map(|filter| {
            let input = |input_type, placeholder| FilterControl::Input {
                input_type,
                placeholder,
                value: display_value(&filter.value),
            };
            let control = match &filter.value {
                TableFilterValue::Text(_) => input(InputType::Text, None),
                TableFilterValue::TextList(_) => input(InputType::Text, Some(LIST_PLACEHOLDER)),
                TableFilterValue::Number(_) => input(InputType::Number, None),
                TableFilterValue::Date(_) => input(InputType::Date, None),
                TableFilterValue::Boolean(checked) => FilterControl::Checkbox {
                    checked: checked.unwrap_or(false),
                },
            };
            FilterRowView {
                name: filter.name.clone(),
                control,
            }
        })
        .collect()
}
