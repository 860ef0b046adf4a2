use shared::{
    domain::{Page, Sort},
    protocol::TableRequest,
};

use crate::{filter::FilterSet, state::TableState};

pub fn build_request(
    filters: &FilterSet,
    sort: Option<&Sort>,
    page: Page,
    page_size: u64,
) -> TableRequest {
    TableRequest {
        page,
        page_size,
        filters: filters.to_vec(),
        sort: sort.cloned(),
    }
}

pub fn request_for_page(state: &TableState, page: Page) -> TableRequest {
    build_request(&state.filters, state.sort.as_ref(), page, state.page_size)
}

#[cfg(test)]
mod tests {
    use shared::domain::{SortDirection, TableFilter, TableFilterValue};

    use super::*;

    #[test]
    fn copies_inputs_without_touching_state() {
        let mut state = TableState::default();
        state.filters = FilterSet::new(vec![TableFilter::new(
            "owner",
            TableFilterValue::Text(Some("bob".into())),
        )]);
        state.sort = Some(Sort::new("created", SortDirection::Desc));
        state.page = 4;
        state.page_size = 50;
        let before = state.clone();

        let request = request_for_page(&state, Page::Number(state.page));
        assert_eq!(request.page, Page::Number(4));
        assert_eq!(request.page_size, 50);
        assert_eq!(request.filters, state.filters.to_vec());
        assert_eq!(request.sort, state.sort);

        let export = request_for_page(&state, Page::All);
        assert!(export.is_export());
        assert_eq!(state, before);
    }
}
