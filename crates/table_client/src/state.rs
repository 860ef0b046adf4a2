use serde_json::Value;
use shared::{
    domain::{Sort, TableColumn},
    protocol::{PersistedTableState, TableResponse},
};
use tracing::warn;

use crate::filter::FilterSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    TableTop,
    ErrorBanner,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    pub page: u64,
    pub page_count: u64,
    pub page_size: u64,
    pub data: Vec<Value>,
    pub columns: Vec<TableColumn>,
    pub filters: FilterSet,
    pub sort: Option<Sort>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_initialized: bool,
    pub load_count: u64,
    pub were_filters_applied: bool,
    pub scroll_to: Option<ScrollTarget>,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            page: 1,
            page_count: 1,
            page_size: 10,
            data: Vec::new(),
            columns: Vec::new(),
            filters: FilterSet::default(),
            sort: None,
            is_loading: false,
            error: None,
            is_initialized: false,
            load_count: 0,
            were_filters_applied: false,
            scroll_to: None,
        }
    }
}

impl TableState {
    /// Volatile flags always start reset.
    pub fn seeded(persisted: Option<&str>) -> Self {
        let mut state = Self::default();
        let Some(raw) = persisted else {
            return state;
        };

        match serde_json::from_str::<PersistedTableState>(raw) {
            Ok(snapshot) => {
                state.filters = FilterSet::new(snapshot.filters);
                state.page = snapshot.page;
                state.page_size = snapshot.page_size;
                state.sort = snapshot.sort;
            }
            Err(err) => warn!(error = %err, "ignoring unreadable persisted table state"),
        }
        state
    }

    pub fn persisted(&self) -> PersistedTableState {
        PersistedTableState {
            filters: self.filters.to_vec(),
            page: self.page,
            page_size: self.page_size,
            sort: self.sort.clone(),
        }
    }

    pub fn merge_response(&mut self, response: TableResponse) {
        if let Some(page) = response.page {
            self.page = page;
        }
        if let Some(page_count) = response.page_count {
            self.page_count = page_count;
        }
        if let Some(page_size) = response.page_size {
            self.page_size = page_size;
        }
        if let Some(data) = response.data {
            self.data = data;
        }
        if let Some(columns) = response.columns {
            self.columns = columns;
        }
        if let Some(filters) = response.filters {
            self.filters = FilterSet::new(filters);
        }
        if let Some(sort) = response.sort {
            self.sort = sort;
        }
    }

    pub fn pagination_enabled(&self) -> bool {
        self.were_filters_applied && !self.is_loading
    }

    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|column| column.name == name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::domain::{SortDirection, TableFilter, TableFilterValue};

    use super::*;

    #[test]
    fn unseeded_state_is_uninitialized() {
        let state = TableState::seeded(None);
        assert!(!state.is_initialized);
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 10);
    }

    #[test]
    fn seeds_persisted_fields_only() {
        let raw = json!({
            "filters": [{"name": "q", "value": {"tag": "string", "value": "x"}}],
            "page": 3,
            "pageSize": 20,
            "sort": {"column": "id", "direction": "desc"},
            "isLoading": true,
            "isInitialized": true,
            "error": "stale"
        })
        .to_string();

        let state = TableState::seeded(Some(&raw));
        assert_eq!(state.page, 3);
        assert_eq!(state.page_size, 20);
        assert_eq!(state.sort, Some(Sort::new("id", SortDirection::Desc)));
        assert_eq!(
            state.filters.get("q").map(|f| &f.value),
            Some(&TableFilterValue::Text(Some("x".into())))
        );
        assert!(!state.is_loading);
        assert!(!state.is_initialized);
        assert!(!state.were_filters_applied);
        assert_eq!(state.error, None);
    }

    #[test]
    fn unreadable_seed_falls_back_to_defaults() {
        let state = TableState::seeded(Some("{not json"));
        assert_eq!(state, TableState::default());
    }

    #[test]
    fn merge_keeps_absent_fields() {
        let mut state = TableState {
            sort: Some(Sort::new("id", SortDirection::Asc)),
            filters: FilterSet::new(vec![TableFilter::new(
                "q",
                TableFilterValue::Text(None),
            )]),
            ..TableState::default()
        };

        state.merge_response(TableResponse {
            page: Some(2),
            page_count: Some(9),
            data: Some(vec![json!({"id": 1})]),
            ..TableResponse::default()
        });

        assert_eq!(state.page, 2);
        assert_eq!(state.page_count, 9);
        assert_eq!(state.data.len(), 1);
        assert_eq!(state.sort, Some(Sort::new("id", SortDirection::Asc)));
        assert_eq!(state.filters.len(), 1);

        state.merge_response(TableResponse {
            sort: Some(None),
            ..TableResponse::default()
        });
        assert_eq!(state.sort, None);
    }
}
