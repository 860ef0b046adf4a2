use std::{fmt, sync::Arc};

use serde_json::Value;
use shared::domain::TableColumn;

pub const DEFAULT_INITIALIZE_MESSAGE: &str = "Initialize";
pub const DEFAULT_APPLIED_TEXT: &str = "Filters are applied";

/// Custom cell renderer: `(row, column, column_index)`. Returning `None`
/// falls back to the default stringifier.
pub type CellRenderer = Arc<dyn Fn(&Value, &TableColumn, usize) -> Option<String> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    pub value: String,
    pub autoload: bool,
}

#[derive(Clone)]
pub struct TableConfig {
    pub endpoint: String,
    pub initialize_message: String,
    pub applied_text: String,
    pub token: Option<TokenConfig>,
    pub cell_renderer: Option<CellRenderer>,
}

impl TableConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            initialize_message: DEFAULT_INITIALIZE_MESSAGE.to_string(),
            applied_text: DEFAULT_APPLIED_TEXT.to_string(),
            token: None,
            cell_renderer: None,
        }
    }

    pub fn with_token(mut self, value: impl Into<String>, autoload: bool) -> Self {
        self.token = Some(TokenConfig {
            value: value.into(),
            autoload,
        });
        self
    }

    pub fn with_initialize_message(mut self, message: impl Into<String>) -> Self {
        self.initialize_message = message.into();
        self
    }

    pub fn with_cell_renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&Value, &TableColumn, usize) -> Option<String> + Send + Sync + 'static,
    {
        self.cell_renderer = Some(Arc::new(renderer));
        self
    }

    pub fn autoload(&self) -> bool {
        self.token.as_ref().is_some_and(|token| token.autoload)
    }
}

impl fmt::Debug for TableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableConfig")
            .field("endpoint", &self.endpoint)
            .field("initialize_message", &self.initialize_message)
            .field("applied_text", &self.applied_text)
            .field("has_token", &self.token.is_some())
            .field("autoload", &self.autoload())
            .field("has_cell_renderer", &self.cell_renderer.is_some())
            .finish()
    }
}
