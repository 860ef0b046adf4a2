use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{Page, Sort, TableColumn, TableFilter};

pub const AUTH_HEADER: &str = "x-auth";
pub const JSON_MIME: &str = "application/json";
pub const CSV_MIME: &str = "application/csv";
pub const CSV_BLOB_MIME: &str = "text/csv;charset=utf-8";

/// Query parameter holding the URL-persisted table snapshot.
pub const TABLE_STATE_URL_PARAM: &str = "tableRendererState";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRequest {
    pub page: Page,
    pub page_size: u64,
    pub filters: Vec<TableFilter>,
    pub sort: Option<Sort>,
}

impl TableRequest {
    pub fn is_export(&self) -> bool {
        self.page.is_all()
    }

    /// `accept` header value the server uses to pick JSON or CSV.
    pub fn accept(&self) -> &'static str {
        if self.is_export() {
            CSV_MIME
        } else {
            JSON_MIME
        }
    }
}

/// Successful non-export response. Every field is optional so the client
/// can merge only what the server sent over its current state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<TableColumn>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<TableFilter>>,
    /// Outer `None` means the key was absent, `Some(None)` an explicit null.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub sort: Option<Option<Sort>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Slice of table state mirrored into the page URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTableState {
    pub filters: Vec<TableFilter>,
    pub page: u64,
    pub page_size: u64,
    pub sort: Option<Sort>,
}
