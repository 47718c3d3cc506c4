use anyhow::{bail, Context};
use log::{info, warn};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use pollview::core::SelectedView;
use pollview::output::{FileSink, TerminalSink};
use pollview::{HttpFetcher, Page, Renderer, View, ViewerConfig};

const USAGE: &str = "usage: pollview <config.json> <commands/ID | proxies/ID>";
const FOOTER: &str = "[enter] toggle auto refresh   [q] quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("pollview", log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = std::env::args().skip(1);
    let (config_path, view_name) = match (args.next(), args.next()) {
        (Some(config), Some(view)) => (config, view),
        _ => bail!(USAGE),
    };

    let config = ViewerConfig::from_file(&config_path)
        .with_context(|| format!("reading configuration {}", config_path))?;

    match config.select_view(&view_name)? {
        SelectedView::Command(view) => run(view, &config).await,
        SelectedView::Proxy(view) => run(view, &config).await,
    }
}

async fn run<V: View>(view: V, config: &ViewerConfig) -> anyhow::Result<()> {
    let mut renderer =
        Renderer::new().register_sink(Arc::new(TerminalSink::stdout().with_footer(FOOTER)));
    for path in &config.output_files {
        let sink = FileSink::new(path)
            .with_context(|| format!("preparing output file {}", path.display()))?;
        renderer = renderer.register_sink(Arc::new(sink));
    }

    let fetcher = HttpFetcher::with_headers(config.request_timeout, &config.headers)?;
    let handle = Page::new(view, Box::new(fetcher), renderer, config)?.load();
    let toggle = handle.auto_refresh();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) if line.trim().eq_ignore_ascii_case("q") => break,
                Ok(Some(_)) => {
                    let checked = toggle.toggle();
                    info!("Auto refresh {}", if checked { "on" } else { "off" });
                }
                Ok(None) => {
                    // stdin closed; keep polling until interrupted.
                    tokio::signal::ctrl_c().await?;
                    break;
                }
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    tokio::signal::ctrl_c().await?;
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let stats = handle.close().await;
    stats.print_summary();
    Ok(())
}
