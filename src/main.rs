//! Headless fork-choice monitor
//!
//! Runs the refresh loop without a window, logs every applied snapshot and
//! optionally writes the rendered tree as SVG.
//!
//! Run with: cargo run --features cli --bin fcv-cli -- --help

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use fork_choice_vis::clock::now_seconds;
    use clap::Parser;
    use fork_choice_vis::config::CliArgs;
    use fork_choice_vis::core::{Session, Viewport};
    use fork_choice_vis::fetch_native::NativeFetchClient;
    use std::time::Duration;
    use tracing::{error, info};
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fork_choice_vis=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let cli = CliArgs::parse();
    let config = cli.config();
    info!(
        url = %config.data_url,
        interval_ms = config.refresh_interval.as_millis() as u64,
        svg = ?cli.svg,
        once = cli.once,
        "Starting headless monitor"
    );

    let mut source = NativeFetchClient::spawn(&config);
    let mut session = Session::new(config.refresh_interval, Viewport::default());
    let mut ticker = tokio::time::interval(Duration::from_millis(50));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !session.tick(now_seconds(), &mut source) {
                    continue;
                }
                let scene = session.scene();
                let snapshot = session.snapshot();
                info!(
                    nodes = scene.glyphs.len(),
                    links = scene.links.len(),
                    canonical = scene.canonical_link_count(),
                    head = ?snapshot.current_head.as_ref().map(|h| h.root.as_str()),
                    status = source.status().label(),
                    "snapshot"
                );
                for line in session.summary().lines() {
                    info!("{}", line);
                }
                if let Some(path) = &cli.svg {
                    let svg = scene.to_svg(&session.ui().view_transform);
                    match tokio::fs::write(path, svg).await {
                        Ok(()) => info!(path = %path.display(), "SVG written"),
                        Err(e) => error!(path = %path.display(), error = %e, "Failed to write SVG"),
                    }
                }
                if cli.once {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
        }
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
