//! Filter values, their edits, and the copy-on-write filter sequence.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::domain::{FilterKind, TableFilter, TableFilterValue};

use crate::error::FilterError;

pub const LIST_DELIMITER: &str = ",";

/// Splits on `delimiter`, trims each segment and drops empty ones.
pub fn split_delimited(input: &str, delimiter: &str) -> Vec<String> {
    input
        .split(delimiter)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterInput {
    Text(String),
    Checked(bool),
}

impl FilterInput {
    pub fn text(value: impl Into<String>) -> Self {
        FilterInput::Text(value.into())
    }
}

pub fn apply_input(
    name: &str,
    current: &TableFilterValue,
    input: &FilterInput,
) -> Result<TableFilterValue, FilterError> {
    let mismatch = || FilterError::InputMismatch {
        name: name.to_string(),
        expected: current.kind(),
    };

    match (current.kind(), input) {
        (FilterKind::Boolean, FilterInput::Checked(checked)) => {
            Ok(TableFilterValue::Boolean(Some(*checked)))
        }
        (FilterKind::Boolean, FilterInput::Text(_)) => Err(mismatch()),
        (_, FilterInput::Checked(_)) => Err(mismatch()),
        (FilterKind::Text, FilterInput::Text(text)) => Ok(TableFilterValue::Text(Some(text.clone()))),
        (FilterKind::TextList, FilterInput::Text(text)) => Ok(TableFilterValue::TextList(Some(
            split_delimited(text, LIST_DELIMITER),
        ))),
        (FilterKind::Number, FilterInput::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(TableFilterValue::Number(None));
            }
            match trimmed.parse::<f64>() {
                Ok(number) if number.is_finite() => Ok(TableFilterValue::Number(Some(number))),
                _ => Err(FilterError::InvalidNumber {
                    name: name.to_string(),
                    input: text.clone(),
                }),
            }
        }
        (FilterKind::Date, FilterInput::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(TableFilterValue::Date(None));
            }
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(|date| TableFilterValue::Date(Some(date)))
                .map_err(|_| FilterError::InvalidDate {
                    name: name.to_string(),
                    input: text.clone(),
                })
        }
    }
}

/// Text an input widget shows for `value`. Booleans render as their
/// checkbox state.
pub fn display_value(value: &TableFilterValue) -> String {
    match value {
        TableFilterValue::Text(text) => text.clone().unwrap_or_default(),
        TableFilterValue::TextList(values) => values
            .as_ref()
            .map(|values| values.join(LIST_DELIMITER))
            .unwrap_or_default(),
        TableFilterValue::Number(number) => number.map(|n| n.to_string()).unwrap_or_default(),
        TableFilterValue::Boolean(checked) => checked.unwrap_or(false).to_string(),
        TableFilterValue::Date(date) => date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    }
}

/// Ordered, immutable filter sequence. Edits return a new set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(Vec<TableFilter>);

impl FilterSet {
    pub fn new(filters: Vec<TableFilter>) -> Self {
        Self(filters)
    }

    pub fn to_vec(&self) -> Vec<TableFilter> {
        self.0.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableFilter> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TableFilter> {
        self.0.iter().find(|filter| filter.name == name)
    }

    pub fn with_input(&self, name: &str, input: &FilterInput) -> Result<Self, FilterError> {
        self.replace(name, |filter| apply_input(name, &filter.value, input))
    }

    pub fn with_cleared(&self, name: &str) -> Result<Self, FilterError> {
        self.replace(name, |filter| Ok(filter.value.cleared()))
    }

    fn replace<F>(&self, name: &str, update: F) -> Result<Self, FilterError>
    where
        F: FnOnce(&TableFilter) -> Result<TableFilterValue, FilterError>,
    {
        let index = self
            .0
            .iter()
            .position(|filter| filter.name == name)
            .ok_or_else(|| FilterError::UnknownFilter(name.to_string()))?;

        let value = update(&self.0[index])?;
        let mut filters = self.0.clone();
        filters[index].value = value;
        Ok(Self(filters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FilterSet {
        FilterSet::new(vec![
            TableFilter::new("name", TableFilterValue::Text(None)),
            TableFilter::new("tags", TableFilterValue::TextList(None)),
            TableFilter::new("age", TableFilterValue::Number(None)),
            TableFilter::new("active", TableFilterValue::Boolean(None)),
            TableFilter::new("since", TableFilterValue::Date(None)),
        ])
    }

    #[test]
    fn split_trims_and_drops_empty_segments() {
        assert_eq!(split_delimited(" a, b ,,c ,", ","), vec!["a", "b", "c"]);
        assert!(split_delimited("", ",").is_empty());
        assert!(split_delimited(" , ,", ",").is_empty());
        assert_eq!(split_delimited("x|y", "|"), vec!["x", "y"]);
    }

    #[test]
    fn split_is_idempotent_after_rejoin() {
        let inputs = [
            "",
            ",",
            "a",
            " a ",
            "a,b,c",
            " a , , b,",
            ",,,x,,,",
            "with space, inner  spaces ,tail",
            "\ta\t,\nb\n",
            "unicode é, ü ,",
        ];
        for input in inputs {
            let parsed = split_delimited(input, ",");
            let reparsed = split_delimited(&parsed.join(","), ",");
            assert_eq!(parsed, reparsed, "input {input:?}");
        }
    }

    #[test]
    fn edits_produce_a_new_set_and_keep_the_previous() {
        let filters = sample();
        let edited = filters
            .with_input("tags", &FilterInput::text("red, blue,"))
            .expect("edit tags");

        assert_eq!(
            edited.get("tags").map(|f| &f.value),
            Some(&TableFilterValue::TextList(Some(vec![
                "red".into(),
                "blue".into()
            ])))
        );
        assert_eq!(
            filters.get("tags").map(|f| &f.value),
            Some(&TableFilterValue::TextList(None))
        );
        assert_eq!(edited.len(), filters.len());
    }

    #[test]
    fn typed_inputs_parse_per_tag() {
        let filters = sample()
            .with_input("age", &FilterInput::text(" 42.5 "))
            .and_then(|f| f.with_input("active", &FilterInput::Checked(true)))
            .and_then(|f| f.with_input("since", &FilterInput::text("2024-01-31")))
            .expect("edits");

        assert_eq!(
            filters.get("age").map(|f| &f.value),
            Some(&TableFilterValue::Number(Some(42.5)))
        );
        assert_eq!(
            filters.get("active").map(|f| &f.value),
            Some(&TableFilterValue::Boolean(Some(true)))
        );
        assert_eq!(
            filters.get("since").map(|f| &f.value),
            Some(&TableFilterValue::Date(NaiveDate::from_ymd_opt(2024, 1, 31)))
        );

        let emptied = filters
            .with_input("age", &FilterInput::text(""))
            .expect("empty number");
        assert_eq!(
            emptied.get("age").map(|f| &f.value),
            Some(&TableFilterValue::Number(None))
        );
    }

    #[test]
    fn rejects_inputs_that_do_not_match_the_tag() {
        let filters = sample();
        assert_eq!(
            filters.with_input("active", &FilterInput::text("yes")),
            Err(FilterError::InputMismatch {
                name: "active".into(),
                expected: FilterKind::Boolean
            })
        );
        assert!(matches!(
            filters.with_input("name", &FilterInput::Checked(false)),
            Err(FilterError::InputMismatch { .. })
        ));
        assert!(matches!(
            filters.with_input("age", &FilterInput::text("twelve")),
            Err(FilterError::InvalidNumber { .. })
        ));
        assert!(matches!(
            filters.with_input("since", &FilterInput::text("31/01/2024")),
            Err(FilterError::InvalidDate { .. })
        ));
        assert_eq!(
            filters.with_cleared("missing"),
            Err(FilterError::UnknownFilter("missing".into()))
        );
    }

    #[test]
    fn clearing_resets_value_and_display() {
        let filters = sample()
            .with_input("name", &FilterInput::text("alice"))
            .and_then(|f| f.with_input("active", &FilterInput::Checked(true)))
            .expect("edits");
        assert_eq!(display_value(&filters.get("name").expect("name").value), "alice");

        let cleared = filters
            .with_cleared("name")
            .and_then(|f| f.with_cleared("active"))
            .expect("clear");
        let name = &cleared.get("name").expect("name").value;
        assert!(name.is_null());
        assert_eq!(display_value(name), "");
        let active = &cleared.get("active").expect("active").value;
        assert_eq!(active, &TableFilterValue::Boolean(None));
        assert_eq!(display_value(active), "false");
    }

    #[test]
    fn display_joins_lists_and_formats_numbers() {
        assert_eq!(
            display_value(&TableFilterValue::TextList(Some(vec!["a".into(), "b".into()]))),
            "a,b"
        );
        assert_eq!(display_value(&TableFilterValue::Number(Some(3.0))), "3");
        assert_eq!(display_value(&TableFilterValue::Number(None)), "");
    }
}
