use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use shared::{
    domain::Page,
    error::error_message_from_body,
    protocol::{TableRequest, TableResponse},
};
use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod pagination;
pub mod request;
pub mod sort;
pub mod state;
pub mod transport;
pub mod url_state;
pub mod view;

pub use config::{CellRenderer, TableConfig, TokenConfig};
pub use error::{FilterError, LoadError};
pub use export::{CsvBlob, DirectoryFileSaver, ExportError, FileSaver};
pub use filter::{FilterInput, FilterSet};
pub use state::{ScrollTarget, TableState};
pub use transport::{
    HttpTransport, OutgoingRequest, TableTransport, TransportError, TransportResponse,
};
pub use url_state::{DetachedUrlStore, MemoryUrlStore, QueryStringUrlStore, UrlStateStore};

use crate::{
    export::export_file_name,
    pagination::{clamp_page, parse_page_input},
    request::{build_request, request_for_page},
    sort::SortToggle,
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub enum TableEvent {
    StateChanged(TableState),
    ExportSaved { file_name: String },
}

enum Completion {
    Page(TableResponse),
    Exported { file_name: String },
    Rejected(String),
}

struct ControllerState {
    table: TableState,
    token: Option<String>,
    in_flight: Option<CancellationToken>,
}

/// Owns one table's state and drives every transition: filter edits,
/// sorting, paging, exports and the loads behind them. At most one request
/// is in flight; starting a load cancels the previous one and results of
/// superseded loads are matched against `load_count` before being applied.
pub struct TableController {
    config: TableConfig,
    transport: Arc<dyn TableTransport>,
    url_store: Arc<dyn UrlStateStore>,
    file_saver: Arc<dyn FileSaver>,
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<TableEvent>,
}

impl TableController {
    pub fn new(
        config: TableConfig,
        transport: Arc<dyn TableTransport>,
        url_store: Arc<dyn UrlStateStore>,
        file_saver: Arc<dyn FileSaver>,
    ) -> Arc<Self> {
        let table = TableState::seeded(url_store.read().as_deref());
        let token = config.token.as_ref().map(|token| token.value.clone());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Arc::new(Self {
            config,
            transport,
            url_store,
            file_saver,
            inner: Mutex::new(ControllerState {
                table,
                token,
                in_flight: None,
            }),
            events,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub async fn state(&self) -> TableState {
        self.inner.lock().await.table.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<TableEvent> {
        self.events.subscribe()
    }

    pub async fn start(&self) {
        if self.config.autoload() {
            self.apply_filters().await;
        }
    }

    pub async fn apply_filters(&self) {
        let request = {
            let inner = self.inner.lock().await;
            request_for_page(&inner.table, Page::Number(inner.table.page))
        };
        self.load(request).await;
    }

    /// Returns `false` without loading while pagination is disabled.
    pub async fn go_to_page(&self, target: i64) -> bool {
        let request = {
            let inner = self.inner.lock().await;
            if !inner.table.pagination_enabled() {
                debug!(target, "pagination disabled; ignoring page change");
                return false;
            }
            let page = clamp_page(target, inner.table.page_count);
            request_for_page(&inner.table, Page::Number(page))
        };
        self.load(request).await;
        true
    }

    /// Go-to-page box: non-numeric input is ignored.
    pub async fn go_to_page_input(&self, input: &str) -> bool {
        match parse_page_input(input) {
            Some(target) => self.go_to_page(target).await,
            None => false,
        }
    }

    pub async fn export(&self) -> bool {
        let request = {
            let inner = self.inner.lock().await;
            if !inner.table.pagination_enabled() {
                debug!("export disabled until filters are applied");
                return false;
            }
            request_for_page(&inner.table, Page::All)
        };
        self.load(request).await;
        true
    }

    /// Header click. Returns `false` for unknown or unsortable columns.
    pub async fn toggle_sort(&self, column: &str) -> bool {
        let request = {
            let inner = self.inner.lock().await;
            let table = &inner.table;
            let Some(column) = table.column(column) else {
                warn!(column, "sort requested for unknown column");
                return false;
            };
            match sort::toggle(table.sort.as_ref(), column) {
                SortToggle::Unsortable => return false,
                SortToggle::Apply(next) => build_request(
                    &table.filters,
                    next.as_ref(),
                    Page::Number(table.page),
                    table.page_size,
                ),
            }
        };
        self.load(request).await;
        true
    }

    pub async fn edit_filter(&self, name: &str, input: FilterInput) -> Result<(), FilterError> {
        let mut inner = self.inner.lock().await;
        inner.table.filters = inner.table.filters.with_input(name, &input)?;
        mark_filters_changed(&mut inner.table);
        self.commit(&inner.table, false);
        Ok(())
    }

    pub async fn clear_filter(&self, name: &str) -> Result<(), FilterError> {
        let mut inner = self.inner.lock().await;
        inner.table.filters = inner.table.filters.with_cleared(name)?;
        mark_filters_changed(&mut inner.table);
        self.commit(&inner.table, false);
        Ok(())
    }

    pub async fn set_token(&self, token: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.token = Some(token.into());
        if mark_filters_changed(&mut inner.table) {
            self.commit(&inner.table, false);
        }
    }

    pub async fn clear_token(&self) {
        self.inner.lock().await.token = None;
    }

    pub async fn dismiss_error(&self) {
        let mut inner = self.inner.lock().await;
        inner.table.error = None;
        self.commit(&inner.table, false);
    }

    pub async fn take_scroll_target(&self) -> Option<ScrollTarget> {
        self.inner.lock().await.table.scroll_to.take()
    }

    pub async fn shutdown(&self) {
        if let Some(in_flight) = self.inner.lock().await.in_flight.take() {
            debug!("cancelling in-flight table load on shutdown");
            in_flight.cancel();
        }
    }

    /// Issues `request`, superseding any load in flight. Failures end up in
    /// `TableState::error`; nothing is returned to the caller.
    pub async fn load(&self, request: TableRequest) {
        let is_export = request.is_export();
        let (ticket, token, cancel) = {
            let mut inner = self.inner.lock().await;
            inner.table.load_count += 1;
            let ticket = inner.table.load_count;

            if let Some(previous) = inner.in_flight.take() {
                debug!(ticket, "cancelling superseded table load");
                previous.cancel();
            }
            let cancel = CancellationToken::new();
            inner.in_flight = Some(cancel.clone());

            inner.table.is_loading = true;
            if is_export {
                inner.table.were_filters_applied = false;
            }
            self.commit(&inner.table, true);

            (ticket, inner.token.clone(), cancel)
        };

        let Some(token) = token else {
            self.settle(ticket, Err(LoadError::MissingToken)).await;
            return;
        };

        info!(ticket, page = ?request.page, export = is_export, "issuing table load");
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(LoadError::Cancelled),
            response = self.send(&request, token) => response,
        };
        let outcome = match response {
            Ok(response) => self.interpret(is_export, response, &cancel).await,
            Err(err) => Err(err),
        };
        self.settle(ticket, outcome).await;
    }

    async fn send(
        &self,
        request: &TableRequest,
        auth_token: String,
    ) -> Result<TransportResponse, LoadError> {
        let body = serde_json::to_string(request).map_err(LoadError::Encode)?;
        let response = self
            .transport
            .send(OutgoingRequest {
                endpoint: self.config.endpoint.clone(),
                auth_token,
                accept: request.accept(),
                body,
            })
            .await?;
        Ok(response)
    }

    async fn interpret(
        &self,
        is_export: bool,
        response: TransportResponse,
        cancel: &CancellationToken,
    ) -> Result<Completion, LoadError> {
        if !response.is_success() {
            return match serde_json::from_str::<Value>(&response.body) {
                Ok(body) => Ok(Completion::Rejected(error_message_from_body(&body))),
                Err(_) => Err(LoadError::Status {
                    status: response.status,
                    status_text: response.status_text,
                }),
            };
        }

        if !is_export {
            return serde_json::from_str::<TableResponse>(&response.body)
                .map(Completion::Page)
                .map_err(LoadError::Decode);
        }

        if cancel.is_cancelled() {
            return Err(LoadError::Cancelled);
        }
        let blob = CsvBlob::from_body(&response.body);
        let file_name = export_file_name(Utc::now());
        let lines = blob.lines.len();
        let saver = Arc::clone(&self.file_saver);
        let target = file_name.clone();
        tokio::task::spawn_blocking(move || saver.save(&blob, &target))
            .await
            .map_err(ExportError::from)??;
        info!(%file_name, lines, "saved table export");
        Ok(Completion::Exported { file_name })
    }

    async fn settle(&self, ticket: u64, outcome: Result<Completion, LoadError>) {
        let mut inner = self.inner.lock().await;
        let latest = inner.table.load_count;
        let is_current = latest == ticket;
        if is_current {
            inner.in_flight = None;
        }

        match outcome {
            Ok(_) if !is_current => {
                debug!(ticket, latest, "dropping superseded table load result");
            }
            Ok(Completion::Page(response)) => {
                let table = &mut inner.table;
                table.merge_response(response);
                table.is_initialized = true;
                table.were_filters_applied = true;
                table.is_loading = false;
                table.error = None;
                table.scroll_to = Some(ScrollTarget::TableTop);
                debug!(ticket, rows = table.data.len(), page = table.page, "table page loaded");
                self.commit(table, true);
            }
            Ok(Completion::Exported { file_name }) => {
                let table = &mut inner.table;
                table.error = None;
                table.is_loading = false;
                self.commit(table, true);
                let _ = self.events.send(TableEvent::ExportSaved { file_name });
            }
            Ok(Completion::Rejected(message)) => {
                warn!(ticket, error = %message, "table server rejected load");
                let table = &mut inner.table;
                table.error = Some(message);
                table.is_loading = false;
                table.were_filters_applied = false;
                table.scroll_to = Some(ScrollTarget::ErrorBanner);
                self.commit(table, false);
            }
            Err(err) => {
                // Once the newer load has settled, a stale failure has nothing left to say.
                if !is_current && !inner.table.is_loading {
                    debug!(ticket, latest, error = %err, "dropping stale table load failure");
                    return;
                }
                let table = &mut inner.table;
                table.were_filters_applied = false;
                table.scroll_to = Some(ScrollTarget::ErrorBanner);
                if is_current {
                    table.is_loading = false;
                }
                if err.is_cancelled() {
                    debug!(ticket, "table load cancelled");
                } else {
                    warn!(ticket, error = %err, "table load failed");
                    table.error = Some(err.to_string());
                }
                self.commit(table, false);
            }
        }
    }

    fn commit(&self, table: &TableState, sync_url: bool) {
        if sync_url {
            self.sync_url(table);
        }
        let _ = self.events.send(TableEvent::StateChanged(table.clone()));
    }

    fn sync_url(&self, table: &TableState) {
        let snapshot = match serde_json::to_string(&table.persisted()) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "failed to serialize table state for url");
                return;
            }
        };

        if self.url_store.read().as_deref() != Some(snapshot.as_str()) {
            self.url_store.write(&snapshot);
            debug!("table state written to url");
        }
    }
}

impl Drop for TableController {
    fn drop(&mut self) {
        if let Some(in_flight) = self.inner.get_mut().in_flight.take() {
            in_flight.cancel();
        }
    }
}

fn mark_filters_changed(table: &mut TableState) -> bool {
    if !table.were_filters_applied {
        return false;
    }
    table.were_filters_applied = false;
    true
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod transport_tests;
