use std::fmt;

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Input shape a filter accepts. Exactly one per filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Text,
    TextList,
    Number,
    Boolean,
    Date,
}

impl FilterKind {
    pub fn tag(self) -> &'static str {
        match self {
            FilterKind::Text => "string",
            FilterKind::TextList => "string[]",
            FilterKind::Number => "number",
            FilterKind::Boolean => "boolean",
            FilterKind::Date => "ISO8601 date",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "value")]
pub enum TableFilterValue {
    #[serde(rename = "string")]
    Text(Option<String>),
    #[serde(rename = "string[]")]
    TextList(Option<Vec<String>>),
    #[serde(rename = "number")]
    Number(Option<f64>),
    #[serde(rename = "boolean")]
    Boolean(Option<bool>),
    #[serde(rename = "ISO8601 date")]
    Date(Option<NaiveDate>),
}

impl TableFilterValue {
    pub fn kind(&self) -> FilterKind {
        match self {
            TableFilterValue::Text(_) => FilterKind::Text,
            TableFilterValue::TextList(_) => FilterKind::TextList,
            TableFilterValue::Number(_) => FilterKind::Number,
            TableFilterValue::Boolean(_) => FilterKind::Boolean,
            TableFilterValue::Date(_) => FilterKind::Date,
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            TableFilterValue::Text(value) => value.is_none(),
            TableFilterValue::TextList(value) => value.is_none(),
            TableFilterValue::Number(value) => value.is_none(),
            TableFilterValue::Boolean(value) => value.is_none(),
            TableFilterValue::Date(value) => value.is_none(),
        }
    }

    /// Same tag, `null` value.
    pub fn cleared(&self) -> Self {
        match self.kind() {
            FilterKind::Text => TableFilterValue::Text(None),
            FilterKind::TextList => TableFilterValue::TextList(None),
            FilterKind::Number => TableFilterValue::Number(None),
            FilterKind::Boolean => TableFilterValue::Boolean(None),
            FilterKind::Date => TableFilterValue::Date(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableFilter {
    pub name: String,
    pub value: TableFilterValue,
}

impl TableFilter {
    pub fn new(name: impl Into<String>, value: TableFilterValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sort {
    pub column: String,
    pub direction: SortDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorted_by_default: Option<bool>,
}

impl Sort {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
            sorted_by_default: None,
        }
    }

    pub fn is_sorted_by_default(&self) -> bool {
        self.sorted_by_default.unwrap_or(false)
    }
}

/// Requested page. `All` is the export sentinel, serialized as `"all"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Number(u64),
    All,
}

impl Page {
    pub fn is_all(self) -> bool {
        matches!(self, Page::All)
    }
}

impl From<u64> for Page {
    fn from(value: u64) -> Self {
        Page::Number(value)
    }
}

impl Serialize for Page {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Page::Number(page) => serializer.serialize_u64(*page),
            Page::All => serializer.serialize_str("all"),
        }
    }
}

impl<'de> Deserialize<'de> for Page {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPage {
            Number(u64),
            Label(String),
        }

        match RawPage::deserialize(deserializer)? {
            RawPage::Number(page) => Ok(Page::Number(page)),
            RawPage::Label(label) if label == "all" => Ok(Page::All),
            RawPage::Label(other) => Err(de::Error::invalid_value(
                de::Unexpected::Str(&other),
                &"a page number or \"all\"",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    pub name: String,
    pub is_sortable: bool,
}

impl TableColumn {
    pub fn new(name: impl Into<String>, is_sortable: bool) -> Self {
        Self {
            name: name.into(),
            is_sortable,
        }
    }
}
