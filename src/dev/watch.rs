/* src/dev/watch.rs */

// notify-based source watching, bridged into tokio. A burst of change
// events collapses into one rebuild.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

const DEBOUNCE: Duration = Duration::from_millis(300);

/// Watch a set of directories recursively. Missing directories are
/// skipped. Dropping the returned watcher stops the watch.
pub fn watch_dirs(
  base_dir: &Path,
  dirs: &[String],
) -> Result<(RecommendedWatcher, mpsc::Receiver<()>)> {
  let (tx, rx) = mpsc::channel(16);
  let mut watcher = RecommendedWatcher::new(
    move |event: std::result::Result<notify::Event, notify::Error>| {
      if event.is_ok() {
        let _ = tx.blocking_send(());
      }
    },
    notify::Config::default(),
  )
  .context("failed to create file watcher")?;

  for dir in dirs {
    let path = base_dir.join(dir);
    if path.exists() {
      watcher
        .watch(&path, RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch {}", path.display()))?;
    }
  }
  Ok((watcher, rx))
}

/// Called after the first event of a burst: wait out the debounce window,
/// then drain whatever queued up behind it.
pub async fn settle_events(rx: &mut mpsc::Receiver<()>) {
  tokio::time::sleep(DEBOUNCE).await;
  while rx.try_recv().is_ok() {}
}
