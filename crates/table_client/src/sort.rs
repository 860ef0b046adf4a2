use shared::domain::{Sort, SortDirection, TableColumn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortToggle {
    /// The column cannot be sorted; headers render without a click target.
    Unsortable,
    Apply(Option<Sort>),
}

/// none -> asc -> desc -> (asc if sorted by default, else none)
pub fn next_direction(
    current: Option<SortDirection>,
    sorted_by_default: bool,
) -> Option<SortDirection> {
    match current {
        None => Some(SortDirection::Asc),
        Some(SortDirection::Asc) => Some(SortDirection::Desc),
        Some(SortDirection::Desc) if sorted_by_default => Some(SortDirection::Asc),
        Some(SortDirection::Desc) => None,
    }
}

pub fn current_direction(sort: Option<&Sort>, column: &str) -> Option<SortDirection> {
    sort.filter(|sort| sort.column == column)
        .map(|sort| sort.direction)
}

pub fn toggle(sort: Option<&Sort>, column: &TableColumn) -> SortToggle {
    if !column.is_sortable {
        return SortToggle::Unsortable;
    }

    let (current, sorted_by_default) = match sort {
        Some(sort) if sort.column == column.name => {
            (Some(sort.direction), sort.is_sorted_by_default())
        }
        _ => (None, false),
    };

    SortToggle::Apply(
        next_direction(current, sorted_by_default).map(|direction| Sort {
            column: column.name.clone(),
            direction,
            sorted_by_default: Some(sorted_by_default),
        }),
    )
}
