//! Shared browser session lifecycle.
//!
//! One Chromium process is shared by all requests. It starts lazily on
//! first use, hands out a fresh page context per request, and is torn down
//! exactly once on shutdown. The only state shared between concurrent
//! requests is the browser handle itself; page contexts are never reused.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Errors from the browser session layer.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Failed to launch the shared browser process.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// Failed to open a page context.
    #[error("page context creation failed: {0}")]
    Context(String),
}

/// Launch settings for the shared browser process.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Explicit Chrome/Chromium executable; autodetected when unset.
    pub browser_path: Option<PathBuf>,

    /// Whether to run headless.
    pub headless: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { browser_path: None, headless: true }
    }
}

/// A running browser process plus its CDP event-handler task.
struct BrowserHandle {
    browser: Browser,
    event_task: JoinHandle<()>,
}

/// Owner of the single shared browser process.
pub struct SessionManager {
    config: SessionConfig,
    handle: Mutex<Option<BrowserHandle>>,
}

impl SessionManager {
    /// Create a manager; the browser is not launched until first use.
    pub fn new(config: SessionConfig) -> Self {
        Self { config, handle: Mutex::new(None) }
    }

    /// Start the shared browser process if it is not already running.
    pub async fn ensure_started(&self) -> Result<(), SessionError> {
        let mut guard = self.handle.lock().await;
        if guard.is_none() {
            *guard = Some(self.launch().await?);
        }
        Ok(())
    }

    /// Hand out a fresh page context scoped to one request.
    ///
    /// Starts the browser on first use. Contexts must not be reused across
    /// requests or shared between concurrent requests; the caller closes
    /// the page when the request ends.
    pub async fn new_context(&self) -> Result<Page, SessionError> {
        let mut guard = self.handle.lock().await;
        if guard.is_none() {
            *guard = Some(self.launch().await?);
        }

        let Some(handle) = guard.as_ref() else {
            return Err(SessionError::Context("browser unavailable".into()));
        };

        handle
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| SessionError::Context(e.to_string()))
    }

    /// Terminate the browser process and clear the started state.
    ///
    /// Safe to call when the browser was never started.
    pub async fn shutdown(&self) {
        let mut guard = self.handle.lock().await;
        if let Some(mut handle) = guard.take() {
            if let Err(e) = handle.browser.close().await {
                tracing::warn!("browser close failed: {e}");
            }
            if let Err(e) = handle.browser.wait().await {
                tracing::debug!("browser process reap failed: {e}");
            }
            handle.event_task.abort();
            tracing::debug!("browser session shut down");
        }
    }

    /// Launch headless Chromium with the fixed hardened configuration.
    ///
    /// Sandboxing is disabled for containerized execution, the GPU is
    /// disabled, and the automation-control fingerprint is suppressed.
    async fn launch(&self) -> Result<BrowserHandle, SessionError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(1920, 1080)
            .args(vec![
                "--disable-gpu",
                "--disable-dev-shm-usage",
                "--disable-blink-features=AutomationControlled",
            ]);

        if let Some(path) = &self.config.browser_path {
            builder = builder.chrome_executable(path);
        }
        if !self.config.headless {
            builder = builder.with_head();
        }

        let config = builder.build().map_err(SessionError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| SessionError::Launch(e.to_string()))?;

        let event_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler event error: {e}");
                    break;
                }
            }
        });

        tracing::debug!("browser session started");
        Ok(BrowserHandle { browser, event_task })
    }
}
