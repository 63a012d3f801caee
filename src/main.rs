use anyhow::{Context, Result, bail};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use glance::config::BrowserConfig;
use glance::{
    ChangeEvent, ChannelNotifier, Config, GraphApi, MediaItem, MediaItemId, MediaListViewModel,
};

fn describe(item: &MediaItem) -> String {
    let date = item.display_date().unwrap_or_else(|| "undated".to_string());
    let caption = item
        .caption
        .as_deref()
        .map(|c| c.lines().next().unwrap_or_default())
        .unwrap_or("");
    format!("{:?} {} ({}) {}", item.media_type, item.id, date, caption)
}

fn render_section(view_model: &MediaListViewModel, section: usize) {
    for row in 0..view_model.row_count(section) {
        if let Some(item) = view_model.item_at(section, row) {
            println!("[{}:{}] {}", section, row, describe(&item));
        }
    }
}

fn render(view_model: &MediaListViewModel, event: &ChangeEvent) {
    match event {
        ChangeEvent::Reset => {
            println!("-- feed reloaded");
            (0..view_model.section_count()).for_each(|section| render_section(view_model, section));
        }
        ChangeEvent::SectionsAppended(sections) => {
            for &section in sections {
                println!("-- page {} loaded", section + 1);
                render_section(view_model, section);
            }
        }
        ChangeEvent::ItemsChanged(positions) => {
            for position in positions {
                let Some(item) = view_model.item_at(position.section, position.row) else {
                    continue;
                };
                for child in view_model.children_for(&item.id) {
                    println!("[{}:{}]   {}", position.section, position.row, describe(&child));
                }
            }
        }
    }
}

/// Walk the feed the way a scrolling list would: display each row, hydrate
/// albums as they come into view and page in more data near the end.
async fn browse(view_model: &MediaListViewModel, browser: &BrowserConfig) {
    let mut section = 0;
    while section < view_model.section_count() {
        let rows = view_model.row_count(section);

        if browser.expand_albums {
            let albums: Vec<MediaItemId> = (0..rows)
                .filter_map(|row| view_model.item_at(section, row))
                .filter(MediaItem::is_album)
                .map(|item| item.id)
                .collect();
            debug!("Section {} has {} albums", section, albums.len());
            join_all(albums.iter().map(|id| view_model.fetch_children_for_item(id))).await;
        }

        for row in 0..rows {
            if view_model.can_prefetch(section, row)
                && view_model.section_count() < browser.max_pages
            {
                view_model.load_more().await;
            }
        }

        if let Some(error) = view_model.last_error() {
            warn!("{}", error);
            view_model.dismiss_error();
        }
        section += 1;
    }

    if view_model.can_load_more() {
        info!(
            "Stopped after {} pages ({} items)",
            view_model.section_count(),
            view_model.item_count()
        );
    } else {
        info!("Reached the end of the feed, {} items", view_model.item_count());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("glance=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Glance");

    let config = Config::load()?;
    let client = GraphApi::new(&config.api).context("Invalid API configuration")?;
    let view_model =
        Arc::new(MediaListViewModel::new(Arc::new(client)).with_page_limit(config.api.page_limit));

    let (notifier, mut events) = ChannelNotifier::new();
    let notifier = Arc::new(notifier);
    view_model.set_notifier(&notifier);

    let renderer = tokio::spawn({
        let view_model = view_model.clone();
        async move {
            while let Some(event) = events.recv().await {
                render(&view_model, &event);
            }
        }
    });

    view_model.initial_data_load().await;
    if let Some(error) = view_model.last_error() {
        bail!("Failed to load media: {}", error);
    }

    browse(&view_model, &config.browser).await;

    // Last sender gone: the renderer drains what is queued and exits
    drop(notifier);
    renderer.await.context("Renderer task failed")?;

    Ok(())
}
