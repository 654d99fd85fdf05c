// ABOUTME: CLI collection commands built on the collection view-models
//
// collections: list all or active collections
// search: one debounced library search
// show/add/remove/update/poster: operate on a single collection

use std::sync::Arc;

use anyhow::{bail, Result};

use super::{
    connect, print_json, CollectionRef, CollectionsArgs, ItemsArgs, OutputFormat, PosterArgs,
    RemoveArgs, SearchArgs, UpdateArgs,
};
use crate::api::{CollectionDetail, CollectionSummary, CollectionsApi, MediaItem};
use crate::collections::{poster_source, CollectionDetailView, SearchView};
use crate::config::AppConfig;

async fn collections_api(config: &AppConfig) -> Result<Arc<dyn CollectionsApi>> {
    Ok(Arc::new(connect(config).await?))
}

pub fn format_collections(collections: &[CollectionSummary]) -> String {
    if collections.is_empty() {
        return "No collections found".to_string();
    }
    collections
        .iter()
        .map(|c| {
            let marker = if c.is_active { "\u{25cf}" } else { "\u{25cb}" };
            format!("{marker} {:<36}{:<16}{:>5} items", c.title, c.library, c.item_count)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Execute the collections command
pub async fn list(config: &AppConfig, args: CollectionsArgs, format: OutputFormat) -> Result<()> {
    let api = collections_api(config).await?;

    if args.active {
        let mut active = api.active_collections().await?;
        if let Some(library) = &args.library {
            active.retain(|c| c.library.as_deref() == Some(library.as_str()));
        }
        match format {
            OutputFormat::Json => print_json(&active)?,
            OutputFormat::Text => {
                for c in &active {
                    println!("\u{25cf} {} ({})", c.title, c.library.as_deref().unwrap_or("?"));
                }
            }
        }
        return Ok(());
    }

    let mut collections = api.all_collections().await?;
    if let Some(library) = &args.library {
        collections.retain(|c| &c.library == library);
    }

    match format {
        OutputFormat::Json => print_json(&collections)?,
        OutputFormat::Text => println!("{}", format_collections(&collections)),
    }
    Ok(())
}

pub fn format_items(items: &[MediaItem]) -> String {
    if items.is_empty() {
        return "No items".to_string();
    }
    items
        .iter()
        .map(|item| match item.year {
            Some(year) => format!("{:>8}  {} ({year})", item.rating_key, item.title),
            None => format!("{:>8}  {}", item.rating_key, item.title),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Execute the search command
pub async fn search(config: &AppConfig, args: SearchArgs, format: OutputFormat) -> Result<()> {
    let api = collections_api(config).await?;
    let mut view = SearchView::new(api, args.library, config.search_debounce());

    view.set_query(args.query);
    if !view.searching {
        bail!("Search query is empty");
    }
    view.next_outcome().await;

    if let Some(error) = &view.error {
        bail!("Search in {} failed: {}", view.library(), error);
    }

    match format {
        OutputFormat::Json => print_json(&view.results)?,
        OutputFormat::Text => println!("{}", format_items(&view.results)),
    }
    Ok(())
}

pub fn format_detail(detail: &CollectionDetail) -> String {
    let mut lines = vec![
        format!("Collection: {}", detail.title),
        "━".repeat(44),
        format!("Library:    {}", detail.library),
    ];
    if let Some(summary) = &detail.summary {
        lines.push(format!("Summary:    {summary}"));
    }
    if let Some(poster) = &detail.poster_url {
        lines.push(format!("Poster:     {poster}"));
    }
    lines.push(String::new());
    lines.push(format_items(&detail.items));
    lines.join("\n")
}

async fn open(config: &AppConfig, target: CollectionRef) -> Result<CollectionDetailView> {
    let api = collections_api(config).await?;
    Ok(CollectionDetailView::new(api, target.library, target.collection))
}

/// Execute the show command
pub async fn show(config: &AppConfig, target: CollectionRef, format: OutputFormat) -> Result<()> {
    let mut view = open(config, target).await?;
    let detail = view.load().await?;

    match format {
        OutputFormat::Json => print_json(detail)?,
        OutputFormat::Text => println!("{}", format_detail(detail)),
    }
    Ok(())
}

/// Execute the add command
pub async fn add(config: &AppConfig, args: ItemsArgs, format: OutputFormat) -> Result<()> {
    let mut view = open(config, args.target).await?;
    for key in &args.rating_keys {
        if !view.selected.contains(key) {
            view.toggle_selection(key);
        }
    }

    let report = view.add_selected().await;
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "added": report.added,
            "failed": report
                .failed
                .iter()
                .map(|(key, message)| serde_json::json!({ "rating_key": key, "error": message }))
                .collect::<Vec<_>>(),
        }))?,
        OutputFormat::Text => {
            println!("{}", report.summary());
            for (key, message) in &report.failed {
                println!("  {key}: {message}");
            }
        }
    }

    if !report.is_success() {
        bail!("{} item(s) could not be added", report.failed.len());
    }
    Ok(())
}

/// Execute the remove command
pub async fn remove(config: &AppConfig, args: RemoveArgs) -> Result<()> {
    let mut view = open(config, args.target).await?;
    view.remove_item(&args.rating_key).await?;
    println!("Removed {} from {}", args.rating_key, view.title);
    Ok(())
}

/// Execute the update command
pub async fn update(config: &AppConfig, args: UpdateArgs) -> Result<()> {
    if args.title.is_none() && args.summary.is_none() {
        bail!("Nothing to update: pass --title and/or --summary");
    }
    let mut view = open(config, args.target).await?;
    view.update(args.title, args.summary).await?;
    println!("Updated {}", view.title);
    Ok(())
}

/// Execute the poster command
pub async fn poster(config: &AppConfig, args: PosterArgs) -> Result<()> {
    let source = poster_source(&args.source).await?;
    let mut view = open(config, args.target).await?;
    view.upload_poster(source).await?;

    match view.detail.as_ref().and_then(|d| d.poster_url.as_deref()) {
        Some(url) => println!("Poster updated: {url}"),
        None => println!("Poster updated for {}", view.title),
    }
    Ok(())
}
