//! Logging decorator for drivers, and timing helpers.

use crate::core::{Element, LocaleInfo, LocalizedStrings, WindowId};
use crate::driver::{Driver, DriverResult};
use async_trait::async_trait;
use std::future::Future;
use std::time::Instant;
use tracing::info;

/// Driver wrapper that logs every call before forwarding it.
///
/// Only the method name and its string arguments are logged.
pub struct LoggingDriver {
    inner: Box<dyn Driver>,
}

impl LoggingDriver {
    /// Wrap `inner`.
    pub fn new(inner: impl Driver + 'static) -> Self {
        Self::from_boxed(Box::new(inner))
    }

    /// Wrap an already boxed driver.
    pub fn from_boxed(inner: Box<dyn Driver>) -> Self {
        Self { inner }
    }
}

impl std::fmt::Debug for LoggingDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingDriver").finish_non_exhaustive()
    }
}

fn log_call(method: &str, args: &[&str]) {
    if args.is_empty() {
        info!("{}", method);
    } else {
        info!("{} {}", method, args.join(" "));
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    async fn window_ids(&self) -> DriverResult<Vec<WindowId>> {
        log_call("getWindowIds", &[]);
        self.inner.window_ids().await
    }

    async fn capture_page(&self, window: WindowId) -> DriverResult<String> {
        log_call("capturePage", &[]);
        self.inner.capture_page(window).await
    }

    async fn start_tracing(&self, window: WindowId, name: &str) -> DriverResult<()> {
        log_call("startTracing", &[name]);
        self.inner.start_tracing(window, name).await
    }

    async fn stop_tracing(&self, window: WindowId, name: &str, persist: bool) -> DriverResult<()> {
        log_call("stopTracing", &[name]);
        self.inner.stop_tracing(window, name, persist).await
    }

    async fn dispatch_keybinding(&self, window: WindowId, keybinding: &str) -> DriverResult<()> {
        log_call("dispatchKeybinding", &[keybinding]);
        self.inner.dispatch_keybinding(window, keybinding).await
    }

    async fn exit_application(&self) -> DriverResult<bool> {
        log_call("exitApplication", &[]);
        self.inner.exit_application().await
    }

    async fn elements(&self, window: WindowId, selector: &str, recursive: bool) -> DriverResult<Vec<Element>> {
        log_call("getElements", &[selector]);
        self.inner.elements(window, selector, recursive).await
    }

    async fn click(
        &self,
        window: WindowId,
        selector: &str,
        xoffset: Option<f64>,
        yoffset: Option<f64>,
    ) -> DriverResult<()> {
        log_call("click", &[selector]);
        self.inner.click(window, selector, xoffset, yoffset).await
    }

    async fn set_value(&self, window: WindowId, selector: &str, value: &str) -> DriverResult<()> {
        log_call("setValue", &[selector, value]);
        self.inner.set_value(window, selector, value).await
    }

    async fn is_active_element(&self, window: WindowId, selector: &str) -> DriverResult<bool> {
        log_call("isActiveElement", &[selector]);
        self.inner.is_active_element(window, selector).await
    }

    async fn title(&self, window: WindowId) -> DriverResult<String> {
        log_call("getTitle", &[]);
        self.inner.title(window).await
    }

    async fn type_in_editor(&self, window: WindowId, selector: &str, text: &str) -> DriverResult<()> {
        log_call("typeInEditor", &[selector, text]);
        self.inner.type_in_editor(window, selector, text).await
    }

    async fn terminal_buffer(&self, window: WindowId, selector: &str) -> DriverResult<Vec<String>> {
        log_call("getTerminalBuffer", &[selector]);
        self.inner.terminal_buffer(window, selector).await
    }

    async fn write_in_terminal(&self, window: WindowId, selector: &str, value: &str) -> DriverResult<()> {
        log_call("writeInTerminal", &[selector, value]);
        self.inner.write_in_terminal(window, selector, value).await
    }

    async fn locale_info(&self, window: WindowId) -> DriverResult<LocaleInfo> {
        log_call("getLocaleInfo", &[]);
        self.inner.locale_info(window).await
    }

    async fn localized_strings(&self, window: WindowId) -> DriverResult<LocalizedStrings> {
        log_call("getLocalizedStrings", &[]);
        self.inner.localized_strings(window).await
    }
}

/// Await `future`, logging its name and how long it took.
pub async fn measure_and_log<F, T>(future: F, name: &str) -> T
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    info!("Starting operation '{}'...", name);

    let output = future.await;

    info!("Finished operation '{}' in {}ms", name, start.elapsed().as_millis());
    output
}
