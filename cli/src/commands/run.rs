use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use vcpe_common::config::Config;
use vcpe_common::event::{HostEvent, HostEventRecord};
use vcpe_common::notification::DeliveryStats;
use vcpe_core::bridge::NotificationBridge;
use vcpe_core::bus::HostEventBus;

use crate::terminal::{colors, print};

type FeedLine = io::Result<Vec<u8>>;

/// Lines read from the event feed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FeedStats {
    pub published: u64,
    pub ignored: u64,
}

pub async fn run(events: Option<PathBuf>, cfg: &Config, quiet: bool) -> anyhow::Result<()> {
    let bridge: NotificationBridge = NotificationBridge::from_config(cfg)?;
    let bus: Arc<HostEventBus> = Arc::new(HostEventBus::new());

    let lines: UnboundedReceiver<FeedLine> = match &events {
        Some(path) => {
            let file: File = File::open(path)
                .with_context(|| format!("Failed to open event feed {}", path.display()))?;
            info!("Reading host events from {}", path.display());
            spawn_line_reader(BufReader::new(file))
        }
        None => {
            info!("Reading host events from stdin");
            spawn_line_reader(BufReader::new(io::stdin()))
        }
    };

    bridge.start(bus.clone()).await?;

    let start_time: Instant = Instant::now();
    let mut feed_stats: FeedStats = FeedStats::default();
    let fed: anyhow::Result<()> = feed_events(lines, &bus, &mut feed_stats, interrupted()).await;

    bridge.stop();
    bus.shutdown();

    if !quiet {
        print_summary(bridge.stats(), feed_stats, start_time.elapsed());
    }
    fed
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

/// Reads `reader` line by line on a detached thread.
///
/// Blocking reads cannot be cancelled, so they stay off the runtime and never
/// hold up its shutdown. Lines are forwarded as raw bytes; only a failed read
/// ends the feed.
fn spawn_line_reader<R>(mut reader: R) -> UnboundedReceiver<FeedLine>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx): (UnboundedSender<FeedLine>, UnboundedReceiver<FeedLine>) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            let mut buf: Vec<u8> = Vec::new();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(Ok(buf)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e));
                    break;
                }
            }
        }
    });
    rx
}

/// Publishes every decodable line on `bus`, in order, until the feed ends or
/// `interrupt` resolves.
///
/// Blank lines and `#` comments are skipped. Lines that are not UTF-8 or do
/// not decode into a host event are logged and ignored. An interrupt stops
/// the intake of new lines but never cuts a publish short. `stats` holds the
/// counts so far, whatever the outcome.
pub async fn feed_events<F>(
    mut lines: UnboundedReceiver<FeedLine>,
    bus: &HostEventBus,
    stats: &mut FeedStats,
    interrupt: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(interrupt);
    let mut line_no: usize = 0;

    loop {
        let raw: Vec<u8> = tokio::select! {
            biased;
            _ = &mut interrupt => {
                warn!("Interrupted, stopping the bridge");
                break;
            }
            next = lines.recv() => match next {
                Some(line) => line.context("Failed to read event feed")?,
                None => break,
            },
        };
        line_no += 1;

        let text: String = match String::from_utf8(raw) {
            Ok(text) => text,
            Err(e) => {
                warn!("Ignoring line {line_no}: {e}");
                stats.ignored += 1;
                continue;
            }
        };
        let line: &str = text.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match decode_line(line) {
            Ok(event) => {
                bus.publish(event).await;
                stats.published += 1;
            }
            Err(e) => {
                warn!("Ignoring line {line_no}: {e:#}");
                stats.ignored += 1;
            }
        }
    }

    Ok(())
}

fn decode_line(line: &str) -> anyhow::Result<HostEvent> {
    let record: HostEventRecord = serde_json::from_str(line).context("not a host event record")?;
    Ok(HostEvent::try_from(record)?)
}

fn print_summary(stats: DeliveryStats, feed: FeedStats, total_time: Duration) {
    print::header("delivery summary", false);
    print::aligned_line("Events", feed.published, colors::TEXT_DEFAULT);
    print::aligned_line("Ignored", feed.ignored, colors::ACCENT);
    print::aligned_line("Notified", stats.notified, colors::PRIMARY);
    print::aligned_line("Rejected", stats.rejected, colors::ACCENT);
    print::aligned_line("Failed", stats.failed, colors::FAILURE);
    print::aligned_line("Skipped", stats.skipped, colors::ACCENT);
    print::aligned_line("Observed", stats.observed, colors::TEXT_DEFAULT);
    print::aligned_line("Elapsed", format!("{:.2}s", total_time.as_secs_f64()), colors::TEXT_DEFAULT);
    print::fat_separator();
}
