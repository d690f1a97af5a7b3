//! Remote driver capability surface.
//!
//! A [`Driver`] controls a running application instance: it enumerates
//! windows, queries and manipulates elements, reads terminals, and reports
//! locale information. The wire protocol behind it belongs to the concrete
//! implementation; this crate only adds logging and polling on top.

use crate::core::{Element, LocaleInfo, LocalizedStrings, WindowId};
use crate::error::DriverError;
use async_trait::async_trait;

/// Result of a single driver call.
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Remote control interface of an application instance.
///
/// Every call except [`window_ids`](Driver::window_ids) and
/// [`exit_application`](Driver::exit_application) targets one window.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Driver: Send + Sync {
    /// Ids of all open windows, in creation order.
    async fn window_ids(&self) -> DriverResult<Vec<WindowId>>;

    /// Screenshot of the window, base64 encoded.
    async fn capture_page(&self, window: WindowId) -> DriverResult<String>;

    /// Start a named trace. Drivers without tracing support ignore it.
    async fn start_tracing(&self, _window: WindowId, _name: &str) -> DriverResult<()> {
        Ok(())
    }

    /// Stop a named trace, optionally persisting it. Drivers without tracing
    /// support ignore it.
    async fn stop_tracing(&self, _window: WindowId, _name: &str, _persist: bool) -> DriverResult<()> {
        Ok(())
    }

    /// Send a keybinding such as `ctrl+shift+p`.
    async fn dispatch_keybinding(&self, window: WindowId, keybinding: &str) -> DriverResult<()>;

    /// Ask the application to quit. Returns `true` if the exit was vetoed.
    async fn exit_application(&self) -> DriverResult<bool>;

    /// Elements matching `selector`, with children when `recursive`.
    async fn elements(&self, window: WindowId, selector: &str, recursive: bool) -> DriverResult<Vec<Element>>;

    /// Click the element matching `selector`, optionally at an offset.
    async fn click(
        &self,
        window: WindowId,
        selector: &str,
        xoffset: Option<f64>,
        yoffset: Option<f64>,
    ) -> DriverResult<()>;

    /// Set the value of an input element.
    async fn set_value(&self, window: WindowId, selector: &str, value: &str) -> DriverResult<()>;

    /// Whether the element matching `selector` has focus.
    async fn is_active_element(&self, window: WindowId, selector: &str) -> DriverResult<bool>;

    /// Window title.
    async fn title(&self, window: WindowId) -> DriverResult<String>;

    /// Type into the editor matching `selector`.
    async fn type_in_editor(&self, window: WindowId, selector: &str, text: &str) -> DriverResult<()>;

    /// Lines of the terminal buffer matching `selector`.
    async fn terminal_buffer(&self, window: WindowId, selector: &str) -> DriverResult<Vec<String>>;

    /// Write into the terminal matching `selector`.
    async fn write_in_terminal(&self, window: WindowId, selector: &str, value: &str) -> DriverResult<()>;

    /// Locale of the application.
    async fn locale_info(&self, window: WindowId) -> DriverResult<LocaleInfo>;

    /// Localized strings of the application.
    async fn localized_strings(&self, window: WindowId) -> DriverResult<LocalizedStrings>;
}
