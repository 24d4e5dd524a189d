//! Configuration file watcher for hot reload.
//!
//! The parent directory is watched rather than the file itself: editors that
//! save by renaming a temp file over the config replace its inode, which would
//! end a file-level watch after the first save.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::AppConfig;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<AppConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for validated configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<AppConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file on notify's background thread.
    ///
    /// The returned watcher must be kept alive for as long as reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let file_name = self
            .path
            .file_name()
            .map(OsString::from)
            .ok_or_else(|| notify::Error::generic("config path has no file name"))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let tx = self.update_tx;
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_config_change(&event, &file_name) => {
                    tracing::info!(path = ?path, "Config file change detected, reloading");
                    match load_config(&path) {
                        Ok(new_config) => {
                            if tx.send(new_config).is_err() {
                                tracing::debug!("Config receiver dropped, ignoring reload");
                            }
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to reload config, keeping current routes");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, dir = ?dir, "Config watcher started");
        Ok(watcher)
    }
}

/// A write, create or rename-into that touches the config file's name.
fn is_config_change(event: &Event, file_name: &OsString) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_with_route(path: &str) -> String {
        format!(
            "[[routes]]\npath = \"{path}\"\nview = \"home\"\n\n[[routes]]\npath = \"/exercises\"\nview = \"new_exercise\"\n"
        )
    }

    /// Wait for a reload whose first route is `expected`, skipping stale events.
    async fn next_reload(rx: &mut mpsc::UnboundedReceiver<AppConfig>, expected: &str) -> bool {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
        loop {
            match tokio::time::timeout_at(deadline, rx.recv()).await {
                Ok(Some(config)) if config.routes[0].path == expected => return true,
                Ok(Some(_)) => continue,
                Ok(None) | Err(_) => return false,
            }
        }
    }

    #[tokio::test]
    async fn test_reloads_after_in_place_and_rename_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exercise-web.toml");
        fs::write(&path, config_with_route("/a")).unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&path);
        let _watcher = watcher.run().unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        fs::write(&path, config_with_route("/b")).unwrap();
        assert!(next_reload(&mut rx, "/b").await, "in-place write not picked up");

        // Editor-style save: write a sibling file, then rename it over the config.
        let tmp = dir.path().join("exercise-web.toml.swp");
        fs::write(&tmp, config_with_route("/c")).unwrap();
        fs::rename(&tmp, &path).unwrap();
        assert!(next_reload(&mut rx, "/c").await, "rename-over save not picked up");

        // The watch must survive the inode swap.
        fs::write(&path, config_with_route("/d")).unwrap();
        assert!(next_reload(&mut rx, "/d").await, "edit after rename not picked up");
    }

    #[tokio::test]
    async fn test_ignores_other_files_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exercise-web.toml");
        fs::write(&path, config_with_route("/a")).unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&path);
        let _watcher = watcher.run().unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        fs::write(dir.path().join("other.toml"), config_with_route("/z")).unwrap();
        let got = tokio::time::timeout(Duration::from_millis(500), rx.recv()).await;
        assert!(got.is_err(), "unrelated file triggered a reload");
    }

    #[test]
    fn test_rejects_path_without_file_name() {
        let (watcher, _rx) = ConfigWatcher::new(Path::new("/"));
        assert!(watcher.run().is_err());
    }
}
