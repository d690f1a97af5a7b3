//! Handle to a running application instance.
//!
//! [`Code`] wraps a [`LoggingDriver`] and turns single driver calls into
//! polled `wait_for_*` helpers bound to the active window.

use crate::config::SmokeConfig;
use crate::core::{Element, LocaleInfo, LocalizedStrings, WindowId};
use crate::driver::Driver;
use crate::error::{DriverError, Error};
use crate::logging::{measure_and_log, LoggingDriver};
use crate::poll::{poll, PollOptions};
use crate::process::{InstanceHandle, InstanceRegistry};
use crate::result::Result;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// A launched application driven through its [`Driver`].
#[derive(Debug)]
pub struct Code {
    driver: LoggingDriver,
    process: Option<InstanceHandle>,
    registry: Option<InstanceRegistry>,
    config: SmokeConfig,
    active_window: Mutex<Option<WindowId>>,
}

impl Code {
    /// Wrap `driver`. `process` is the main application process, used by
    /// [`exit`](Self::exit) to observe termination.
    pub fn new(driver: Box<dyn Driver>, process: Option<InstanceHandle>, config: SmokeConfig) -> Self {
        Self {
            driver: LoggingDriver::from_boxed(driver),
            process,
            registry: None,
            config,
            active_window: Mutex::new(None),
        }
    }

    /// Registry tracking `process`; a successful [`exit`](Self::exit) reaps
    /// it from there.
    pub fn with_registry(mut self, registry: InstanceRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// The logging driver, for calls without a polled helper.
    pub fn driver(&self) -> &LoggingDriver {
        &self.driver
    }

    /// The main application process, if one is tracked.
    pub fn process(&self) -> Option<&InstanceHandle> {
        self.process.as_ref()
    }

    /// Active configuration.
    pub fn config(&self) -> &SmokeConfig {
        &self.config
    }

    fn poll_options(&self) -> PollOptions {
        self.config.poll.options()
    }

    /// First window reported by the driver, cached after the first lookup.
    pub async fn active_window_id(&self) -> Result<WindowId> {
        let mut active = self.active_window.lock().await;
        if let Some(id) = *active {
            return Ok(id);
        }

        let id = self
            .driver
            .window_ids()
            .await?
            .first()
            .copied()
            .ok_or(DriverError::NoWindows)?;
        *active = Some(id);
        Ok(id)
    }

    /// Screenshot of the active window, base64 encoded.
    pub async fn capture_page(&self) -> Result<String> {
        let window = self.active_window_id().await?;
        Ok(self.driver.capture_page(window).await?)
    }

    /// Start a named trace in the active window.
    pub async fn start_tracing(&self, name: &str) -> Result<()> {
        let window = self.active_window_id().await?;
        Ok(self.driver.start_tracing(window, name).await?)
    }

    /// Stop a named trace in the active window.
    pub async fn stop_tracing(&self, name: &str, persist: bool) -> Result<()> {
        let window = self.active_window_id().await?;
        Ok(self.driver.stop_tracing(window, name, persist).await?)
    }

    /// Poll window ids until `accept` approves them.
    ///
    /// Uses the launch retry budget since windows may take long to open.
    pub async fn wait_for_window_ids<A>(&self, accept: A) -> Result<Vec<WindowId>>
    where
        A: FnMut(&Vec<WindowId>) -> bool,
    {
        let options = self
            .poll_options()
            .with_retry_count(self.config.launch.window_retry_count);
        poll(|| self.driver.window_ids(), accept, "get window ids", options).await
    }

    /// Send a keybinding to the active window.
    pub async fn dispatch_keybinding(&self, keybinding: &str) -> Result<()> {
        let window = self.active_window_id().await?;
        Ok(self.driver.dispatch_keybinding(window, keybinding).await?)
    }

    /// Poll the text content of the first element matching `selector`.
    ///
    /// With `text`, waits for an exact match; without, for any non-empty
    /// content.
    pub async fn wait_for_text_content(&self, selector: &str, text: Option<&str>) -> Result<String> {
        let retry_count = self.config.poll.retry_count;
        match text {
            Some(expected) => {
                self.wait_for_text_content_with(selector, |t| t == expected, retry_count)
                    .await
            }
            None => {
                self.wait_for_text_content_with(selector, |t| !t.is_empty(), retry_count)
                    .await
            }
        }
    }

    /// Poll the text content of the first element matching `selector` until
    /// `accept` approves it.
    pub async fn wait_for_text_content_with<A>(&self, selector: &str, mut accept: A, retry_count: u32) -> Result<String>
    where
        A: FnMut(&str) -> bool,
    {
        let window = self.active_window_id().await?;
        let element = poll(
            || self.first_element(window, selector),
            |element: &Element| accept(&element.text_content),
            &format!("get text content '{}'", selector),
            self.poll_options().with_retry_count(retry_count),
        )
        .await?;

        info!("got text content element {}", to_json(&element));
        Ok(element.text_content)
    }

    /// Click the element matching `selector` once it is clickable.
    pub async fn wait_and_click(&self, selector: &str, xoffset: Option<f64>, yoffset: Option<f64>) -> Result<()> {
        self.wait_and_click_with(selector, xoffset, yoffset, self.config.poll.retry_count)
            .await
    }

    /// [`wait_and_click`](Self::wait_and_click) with its own retry budget.
    pub async fn wait_and_click_with(
        &self,
        selector: &str,
        xoffset: Option<f64>,
        yoffset: Option<f64>,
        retry_count: u32,
    ) -> Result<()> {
        let window = self.active_window_id().await?;
        poll(
            || self.driver.click(window, selector, xoffset, yoffset),
            |_| true,
            &format!("click '{}'", selector),
            self.poll_options().with_retry_count(retry_count),
        )
        .await
    }

    /// Set the value of the input matching `selector` once it accepts input.
    pub async fn wait_for_set_value(&self, selector: &str, value: &str) -> Result<()> {
        let window = self.active_window_id().await?;
        poll(
            || self.driver.set_value(window, selector, value),
            |_| true,
            &format!("set value '{}'", selector),
            self.poll_options(),
        )
        .await
    }

    /// Poll until at least one element matches `selector`.
    pub async fn wait_for_elements(&self, selector: &str, recursive: bool) -> Result<Vec<Element>> {
        self.wait_for_elements_with(selector, recursive, |elements| !elements.is_empty())
            .await
    }

    /// Poll the elements matching `selector` until `accept` approves them.
    pub async fn wait_for_elements_with<A>(&self, selector: &str, recursive: bool, mut accept: A) -> Result<Vec<Element>>
    where
        A: FnMut(&[Element]) -> bool,
    {
        let window = self.active_window_id().await?;
        let elements = poll(
            || self.driver.elements(window, selector, recursive),
            |elements: &Vec<Element>| accept(elements),
            &format!("get elements '{}'", selector),
            self.poll_options(),
        )
        .await?;

        let dump: Vec<String> = elements.iter().map(to_json).collect();
        info!("got elements {}", dump.join("\n"));
        Ok(elements)
    }

    /// Poll until an element matches `selector` and return the first one.
    pub async fn wait_for_element(&self, selector: &str) -> Result<Element> {
        let retry_count = self.config.poll.retry_count;
        self.wait_for_element_with(selector, |element| element.is_some(), retry_count)
            .await?
            .ok_or_else(|| {
                DriverError::ElementNotFound {
                    selector: selector.to_string(),
                }
                .into()
            })
    }

    /// Poll the first element matching `selector` until `accept` approves it.
    ///
    /// `accept` sees `None` while nothing matches.
    pub async fn wait_for_element_with<A>(&self, selector: &str, mut accept: A, retry_count: u32) -> Result<Option<Element>>
    where
        A: FnMut(Option<&Element>) -> bool,
    {
        let window = self.active_window_id().await?;
        let element = poll(
            || self.optional_first_element(window, selector),
            |element: &Option<Element>| accept(element.as_ref()),
            &format!("get element '{}'", selector),
            self.poll_options().with_retry_count(retry_count),
        )
        .await?;

        if let Some(element) = &element {
            info!("got element {}", to_json(element));
        }
        Ok(element)
    }

    /// Poll until nothing matches `selector`.
    pub async fn wait_for_element_gone(&self, selector: &str) -> Result<()> {
        let retry_count = self.config.poll.retry_count;
        self.wait_for_element_gone_with(selector, |element| element.is_none(), retry_count)
            .await
    }

    /// Poll the first element matching `selector` until `accept` considers
    /// it gone, e.g. hidden rather than detached.
    pub async fn wait_for_element_gone_with<A>(&self, selector: &str, mut accept: A, retry_count: u32) -> Result<()>
    where
        A: FnMut(Option<&Element>) -> bool,
    {
        let window = self.active_window_id().await?;
        poll(
            || self.optional_first_element(window, selector),
            |element: &Option<Element>| accept(element.as_ref()),
            &format!("get element '{}'", selector),
            self.poll_options().with_retry_count(retry_count),
        )
        .await?;
        Ok(())
    }

    /// Poll until the element matching `selector` has focus.
    pub async fn wait_for_active_element(&self, selector: &str) -> Result<()> {
        self.wait_for_active_element_with(selector, self.config.poll.retry_count)
            .await
    }

    /// [`wait_for_active_element`](Self::wait_for_active_element) with its
    /// own retry budget.
    pub async fn wait_for_active_element_with(&self, selector: &str, retry_count: u32) -> Result<()> {
        let window = self.active_window_id().await?;
        poll(
            || self.driver.is_active_element(window, selector),
            |active| *active,
            &format!("is active element '{}'", selector),
            self.poll_options().with_retry_count(retry_count),
        )
        .await?;
        Ok(())
    }

    /// Poll the window title until `accept` approves it.
    pub async fn wait_for_title<A>(&self, mut accept: A) -> Result<String>
    where
        A: FnMut(&str) -> bool,
    {
        let window = self.active_window_id().await?;
        poll(
            || self.driver.title(window),
            |title: &String| accept(title),
            "get title",
            self.poll_options(),
        )
        .await
    }

    /// Type `text` into the editor matching `selector` once it accepts input.
    pub async fn wait_for_type_in_editor(&self, selector: &str, text: &str) -> Result<()> {
        let window = self.active_window_id().await?;
        poll(
            || self.driver.type_in_editor(window, selector, text),
            |_| true,
            &format!("type in editor '{}'", selector),
            self.poll_options(),
        )
        .await
    }

    /// Poll the terminal buffer matching `selector` until `accept` approves it.
    pub async fn wait_for_terminal_buffer<A>(&self, selector: &str, mut accept: A) -> Result<Vec<String>>
    where
        A: FnMut(&[String]) -> bool,
    {
        let window = self.active_window_id().await?;
        poll(
            || self.driver.terminal_buffer(window, selector),
            |lines: &Vec<String>| accept(lines),
            &format!("get terminal buffer '{}'", selector),
            self.poll_options(),
        )
        .await
    }

    /// Write `value` into the terminal matching `selector`.
    pub async fn write_in_terminal(&self, selector: &str, value: &str) -> Result<()> {
        let window = self.active_window_id().await?;
        poll(
            || self.driver.write_in_terminal(window, selector, value),
            |_| true,
            &format!("writeInTerminal '{}'", selector),
            self.poll_options(),
        )
        .await
    }

    /// Locale of the application.
    pub async fn locale_info(&self) -> Result<LocaleInfo> {
        let window = self.active_window_id().await?;
        Ok(self.driver.locale_info(window).await?)
    }

    /// Localized UI strings of the application.
    pub async fn localized_strings(&self) -> Result<LocalizedStrings> {
        let window = self.active_window_id().await?;
        Ok(self.driver.localized_strings(window).await?)
    }

    /// Ask the application to quit and wait for its process to terminate.
    ///
    /// Fails with [`Error::ExitVetoed`] if the application refuses, or
    /// [`Error::ExitTimedOut`] if the process outlives the exit budget.
    /// Without a tracked process the reply to the exit request decides.
    pub async fn exit(&self) -> Result<()> {
        measure_and_log(self.exit_inner(), "Code#exit()").await?;

        if let Some(registry) = &self.registry {
            registry.reap_finished().await;
        }
        Ok(())
    }

    async fn exit_inner(&self) -> Result<()> {
        let Some(process) = &self.process else {
            return check_exit_reply(self.driver.exit_application().await);
        };

        let exit_request = self.driver.exit_application();
        let terminated = self.wait_for_process_exit(process);
        tokio::pin!(exit_request, terminated);

        let mut request_pending = true;
        loop {
            tokio::select! {
                biased;

                reply = &mut exit_request, if request_pending => {
                    request_pending = false;
                    check_exit_reply(reply)?;
                }
                result = &mut terminated => return result,
            }
        }
    }

    async fn wait_for_process_exit(&self, process: &InstanceHandle) -> Result<()> {
        let exit = &self.config.exit;
        let interval = exit.check_interval();
        let mut checks = 0u32;

        while process.is_running().await {
            checks += 1;

            if checks > exit.give_up_after {
                return Err(Error::ExitTimedOut {
                    after: interval * exit.give_up_after,
                });
            }

            if checks > exit.warn_after {
                warn!(
                    "Smoke test exit call did not terminate process after {}s, still trying...",
                    (interval * exit.warn_after).as_secs()
                );
            }

            tokio::time::sleep(interval).await;
        }

        Ok(())
    }

    async fn first_element(&self, window: WindowId, selector: &str) -> std::result::Result<Element, DriverError> {
        self.optional_first_element(window, selector)
            .await?
            .ok_or_else(|| DriverError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    async fn optional_first_element(
        &self,
        window: WindowId,
        selector: &str,
    ) -> std::result::Result<Option<Element>, DriverError> {
        Ok(self
            .driver
            .elements(window, selector, false)
            .await?
            .into_iter()
            .next())
    }
}

fn check_exit_reply(reply: std::result::Result<bool, DriverError>) -> Result<()> {
    match reply {
        Ok(true) => Err(Error::ExitVetoed),
        Ok(false) => Ok(()),
        // The connection often drops while the app shuts down.
        Err(e) => {
            warn!("exit request failed: {}", e);
            Ok(())
        }
    }
}

fn to_json(element: &Element) -> String {
    serde_json::to_string(element).unwrap_or_default()
}
