//! tubefetch - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use tubefetch::{
    cli::{Args, Command},
    engine::FetchOptions,
    error::{exit_codes, Error, Result},
    fs::sanitize_filename,
    output::{
        create_batch_bar, create_scrape_spinner, print_banner, print_error, print_info,
        print_report, print_warning,
    },
    BatchDownloader, ChannelScraper, Config, CookieManager, Extractor, PlaylistScraper, VideoItem,
    YtDlpExtractor,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            print_error(&format!("{}", e));
            let code = match e {
                Error::Config(_) | Error::TomlParse(_) => exit_codes::CONFIG_ERROR,
                Error::Extract(_) => exit_codes::EXTRACT_ERROR,
                Error::Download(_)
                | Error::VideoUnavailable(_)
                | Error::VideoNotFound(_)
                | Error::EngineNotFound => exit_codes::DOWNLOAD_ERROR,
                _ => exit_codes::UNEXPECTED_ERROR,
            };
            ExitCode::from(code as u8)
        }
    }
}

async fn run() -> Result<ExitCode> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        Config::default()
    };
    args.merge_into_config(&mut config);

    let cookie_file = if args.no_cookies {
        None
    } else {
        CookieManager::new().cookie_file().await
    };

    let engine = YtDlpExtractor::new(cookie_file.clone());
    let kind = args.media_kind();
    let quality = args.quality_spec(&config);
    let delay = config.request_delay();

    let items: Vec<VideoItem> = match &args.command {
        Command::Video { url } => {
            let title = match engine.fetch_metadata(url, &FetchOptions::flat()).await {
                Ok(metadata) => metadata.title.unwrap_or_else(|| "Unknown Title".to_string()),
                Err(e) => {
                    tracing::warn!("Could not fetch title for {}: {}", url, e);
                    "Unknown Title".to_string()
                }
            };
            vec![VideoItem {
                url: url.clone(),
                title,
                duration_secs: 0,
                folder: String::new(),
            }]
        }
        Command::Playlist { url } => {
            let scraper = PlaylistScraper::new(&engine, delay);
            let title = scraper.title(url).await;
            print_info(&format!("Scraping playlist: {}", title));

            let spinner = create_scrape_spinner("Enumerating playlist...");
            let sp = spinner.clone();
            let progress = move |done: usize, total: usize, pct: u8| {
                sp.set_message(format!("Enumerating: {}/{} ({}%)", done, total, pct));
            };
            let mut items = scraper
                .scrape(url, config.max_videos_per_playlist, Some(&progress))
                .await?;
            spinner.finish_and_clear();

            let folder = format!("Playlists/{}", sanitize_filename(&title));
            for item in &mut items {
                item.folder = folder.clone();
            }
            items
        }
        Command::Channel { url } => {
            let scraper = ChannelScraper::new(&engine, delay, cookie_file.clone());

            let spinner = create_scrape_spinner("Scraping channel...");
            let sp = spinner.clone();
            let progress = move |done: usize, total: usize, pct: u8| {
                sp.set_message(format!("Scraping channel: {}/{} units ({}%)", done, total, pct));
            };
            let content = scraper
                .scrape(url, config.max_videos_per_playlist, Some(&progress))
                .await?;
            spinner.finish_and_clear();

            print_info(&format!(
                "Found {} items on {} ({} playlists, {} standalone)",
                content.total_items(),
                content.channel_name,
                content.playlists.len(),
                content.standalone_videos.len()
            ));
            content.flatten()
        }
    };

    if items.is_empty() {
        print_warning("Nothing to download");
        return Ok(ExitCode::from(exit_codes::SUCCESS as u8));
    }

    print_info(&format!(
        "Downloading {} items as {} into {}",
        items.len(),
        kind,
        config.download_directory.join(kind.root_folder()).display()
    ));

    let downloader = BatchDownloader::new(&engine).with_max_workers(config.max_workers);

    let handle = downloader.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    let bar = create_batch_bar();
    let progress_bar = bar.clone();
    let on_progress = move |pct: u8| progress_bar.set_position(pct as u64);
    let log_bar = bar.clone();
    let on_log = move |msg: &str| log_bar.println(msg);

    let report = downloader
        .run(
            &items,
            kind,
            &config.download_directory,
            quality,
            Some(&on_progress),
            Some(&on_log),
        )
        .await?;
    bar.finish_and_clear();

    print_report(&report);

    if report.failed > 0 {
        Ok(ExitCode::from(exit_codes::SOME_ITEMS_FAILED as u8))
    } else {
        Ok(ExitCode::from(exit_codes::SUCCESS as u8))
    }
}
