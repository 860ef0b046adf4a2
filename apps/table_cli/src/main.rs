mod config;
mod render;

use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use shared::domain::FilterKind;
use table_client::{
    DirectoryFileSaver, FilterInput, HttpTransport, QueryStringUrlStore, TableConfig,
    TableController, TableEvent,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser, Debug)]
#[command(about = "Load, filter, sort, page and export a remote data table")]
struct Args {
    #[arg(long, default_value = "table.toml")]
    config: PathBuf,
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(long)]
    token: Option<String>,
    /// Page URL carrying the persisted table state.
    #[arg(long)]
    page_url: Option<String>,
    /// `NAME=VALUE`; booleans take true/false, lists are comma-delimited.
    #[arg(long = "filter", value_name = "NAME=VALUE")]
    filters: Vec<String>,
    #[arg(long = "clear", value_name = "NAME")]
    clears: Vec<String>,
    /// Header clicks, applied in order.
    #[arg(long = "sort", value_name = "COLUMN")]
    sorts: Vec<String>,
    #[arg(long)]
    page: Option<String>,
    #[arg(long)]
    export: bool,
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(&args.config);
    if let Some(endpoint) = args.endpoint.clone() {
        settings.endpoint = endpoint;
    }
    if let Some(token) = args.token.clone() {
        settings.token = Some(token);
    }
    if let Some(page_url) = args.page_url.clone() {
        settings.page_url = page_url;
    }
    if let Some(export_dir) = args.export_dir.clone() {
        settings.export_dir = export_dir;
    }

    let page_url = Url::parse(&settings.page_url)
        .with_context(|| format!("invalid page url {}", settings.page_url))?;
    let url_store = QueryStringUrlStore::new(page_url);

    let mut table_config = TableConfig::new(settings.endpoint.clone());
    if let Some(token) = &settings.token {
        table_config = table_config.with_token(token.clone(), settings.autoload);
    }
    if let Some(message) = &settings.initialize_message {
        table_config = table_config.with_initialize_message(message.clone());
    }

    let controller = TableController::new(
        table_config,
        Arc::new(HttpTransport::new()),
        Arc::new(url_store.clone()),
        Arc::new(DirectoryFileSaver::new(settings.export_dir.clone())),
    );
    let mut events = controller.subscribe_events();
    info!(endpoint = %settings.endpoint, "table client ready");

    controller.start().await;
    if !controller.state().await.is_initialized && settings.token.is_some() {
        controller.apply_filters().await;
    }

    let state = controller.state().await;
    if !state.is_initialized {
        print!("{}", render::render(&state, controller.config()));
        return Ok(());
    }

    let mut edited = false;
    for raw in &args.filters {
        let (name, value) = raw
            .split_once('=')
            .ok_or_else(|| anyhow!("filter `{raw}` is not NAME=VALUE"))?;
        let input = match state.filters.get(name).map(|filter| filter.value.kind()) {
            Some(FilterKind::Boolean) => FilterInput::Checked(
                value
                    .trim()
                    .parse()
                    .with_context(|| format!("filter `{name}` expects true or false"))?,
            ),
            _ => FilterInput::text(value),
        };
        controller
            .edit_filter(name, input)
            .await
            .with_context(|| format!("editing filter `{name}`"))?;
        edited = true;
    }
    for name in &args.clears {
        controller
            .clear_filter(name)
            .await
            .with_context(|| format!("clearing filter `{name}`"))?;
        edited = true;
    }
    if edited {
        controller.apply_filters().await;
    }

    for column in &args.sorts {
        if !controller.toggle_sort(column).await {
            warn!(%column, "column cannot be sorted");
        }
    }

    if let Some(page) = &args.page {
        if !controller.go_to_page_input(page).await {
            warn!(%page, "page change ignored");
        }
    }

    if args.export {
        if !controller.export().await {
            warn!("export skipped until filters are applied");
        }
        while let Ok(event) = events.try_recv() {
            if let TableEvent::ExportSaved { file_name } = event {
                println!(
                    "exported {}",
                    settings.export_dir.join(file_name).display()
                );
            }
        }
    }

    let state = controller.state().await;
    print!("{}", render::render(&state, controller.config()));
    println!("{}", url_store.current_url());

    controller.shutdown().await;
    Ok(())
}
