//! Real browser backend over the Chrome DevTools Protocol.
//!
//! Element operations run as page scripts built from [`Selector`] queries, so
//! CSS and XPath selectors behave the same. Two background tasks mirror page
//! state the trait needs synchronously or cheaply:
//!
//! - a location tracker, fed by frame navigation events, behind [`PageDriver::url`]
//! - a request tracker counting in-flight requests for network-idle waits

use crate::driver::{DriverConfig, PageDriver, ScreenshotOptions};
use crate::result::{SauceError, SauceResult};
use crate::selector::{js_string, Selector};
use crate::url::{resolve_url, UrlPattern};
use crate::wait::{poll_until, LoadState, Settled, WaitState, NETWORK_IDLE_THRESHOLD};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, EventFrameNavigated, EventNavigatedWithinDocument,
};
use chromiumoxide::page::{Page as CdpPage, ScreenshotParams};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace};

/// How long the grid must go without DOM mutations to count as settled
pub const SETTLE_QUIET_WINDOW: Duration = Duration::from_millis(100);

fn page_error(e: impl fmt::Display) -> SauceError {
    SauceError::Page {
        message: e.to_string(),
    }
}

// =============================================================================
// PAGE SCRIPTS
// =============================================================================

/// `[attached, visible]` of the first match
fn presence_script(selector: &Selector) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return [false, false]; \
         const style = getComputedStyle(el); const rect = el.getBoundingClientRect(); \
         return [true, style.visibility !== 'hidden' && style.display !== 'none' \
         && rect.width > 0 && rect.height > 0]; }})()",
        selector.to_query()
    )
}

/// `[found, textContent]` of the first match
fn text_script(selector: &Selector) -> String {
    format!(
        "(() => {{ const el = {}; return el ? [true, el.textContent] : [false, null]; }})()",
        selector.to_query()
    )
}

fn all_text_script(selector: &Selector) -> String {
    format!("{}.map(el => el.textContent ?? '')", selector.to_all_query())
}

fn click_script(selector: &Selector) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return false; \
         el.scrollIntoView({{ block: 'center' }}); el.click(); return true; }})()",
        selector.to_query()
    )
}

/// Sets the value through the prototype setter so React sees the change
fn fill_script(selector: &Selector, value: &str) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return false; el.focus(); \
         const proto = el instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype; \
         Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, {}); \
         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
         el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true; }})()",
        selector.to_query(),
        js_string(value)
    )
}

/// `false` when the `<select>` has no option with `value`
fn select_script(selector: &Selector, value: &str) -> String {
    format!(
        "(() => {{ const el = {}; const value = {}; \
         if (!el || !Array.from(el.options).some(o => o.value === value)) return false; \
         Object.getOwnPropertyDescriptor(HTMLSelectElement.prototype, 'value').set.call(el, value); \
         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
         el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true; }})()",
        selector.to_query(),
        js_string(value)
    )
}

/// Resolves `true` once the subtree has seen no mutation for `quiet`,
/// `false` when nothing matches
fn settle_script(selector: &Selector, quiet: Duration) -> String {
    format!(
        "new Promise(resolve => {{ const root = {}; if (!root) {{ resolve(false); return; }} \
         let timer; const observer = new MutationObserver(() => {{ clearTimeout(timer); timer = setTimeout(done, {ms}); }}); \
         function done() {{ observer.disconnect(); resolve(true); }} \
         observer.observe(root, {{ childList: true, subtree: true, characterData: true, attributes: true }}); \
         timer = setTimeout(done, {ms}); }})",
        selector.to_query(),
        ms = quiet.as_millis()
    )
}

fn ready_state_script(state: LoadState) -> &'static str {
    match state {
        LoadState::Load | LoadState::NetworkIdle => "document.readyState === 'complete'",
        LoadState::DomContentLoaded => "document.readyState !== 'loading'",
    }
}

// =============================================================================
// EVENT TRACKERS
// =============================================================================

#[derive(Debug)]
struct NetworkActivity {
    in_flight: HashSet<String>,
    last_activity: Instant,
}

/// In-flight request bookkeeping for network-idle waits
#[derive(Debug)]
struct NetworkTracker {
    activity: Mutex<NetworkActivity>,
}

impl NetworkTracker {
    fn new() -> Self {
        Self {
            activity: Mutex::new(NetworkActivity {
                in_flight: HashSet::new(),
                last_activity: Instant::now(),
            }),
        }
    }

    fn started(&self, request_id: String) {
        let mut activity = self.activity.lock().unwrap_or_else(PoisonError::into_inner);
        activity.in_flight.insert(request_id);
        activity.last_activity = Instant::now();
    }

    fn finished(&self, request_id: &str) {
        let mut activity = self.activity.lock().unwrap_or_else(PoisonError::into_inner);
        activity.in_flight.remove(request_id);
        activity.last_activity = Instant::now();
    }

    /// No request in flight and none started or finished within `window`
    fn is_idle(&self, window: Duration) -> bool {
        let activity = self.activity.lock().unwrap_or_else(PoisonError::into_inner);
        activity.in_flight.is_empty() && activity.last_activity.elapsed() >= window
    }
}

fn store_url(cache: &RwLock<String>, url: &str) {
    *cache.write().unwrap_or_else(PoisonError::into_inner) = url.to_string();
}

// =============================================================================
// DRIVER
// =============================================================================

/// Chromium session implementing [`PageDriver`]
pub struct ChromiumDriver {
    config: DriverConfig,
    browser: tokio::sync::Mutex<CdpBrowser>,
    page: CdpPage,
    url: Arc<RwLock<String>>,
    network: Arc<NetworkTracker>,
    tasks: Vec<JoinHandle<()>>,
}

impl fmt::Debug for ChromiumDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChromiumDriver")
            .field("config", &self.config)
            .field("url", &self.url())
            .finish_non_exhaustive()
    }
}

impl ChromiumDriver {
    /// Launch a browser with one blank page
    ///
    /// # Errors
    ///
    /// Returns error if the browser cannot be launched or the page cannot be
    /// opened
    pub async fn launch(config: DriverConfig) -> SauceResult<Self> {
        let mut builder = CdpConfig::builder()
            .window_size(config.viewport_width, config.viewport_height)
            .request_timeout(config.navigation_timeout);

        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .build()
            .map_err(|message| SauceError::BrowserLaunch { message })?;
        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| SauceError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let mut tasks = vec![tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        })];

        let page = browser.new_page("about:blank").await.map_err(page_error)?;
        let url = Arc::new(RwLock::new(String::from("about:blank")));
        let network = Arc::new(NetworkTracker::new());

        tasks.push(Self::track_location(&page, Arc::clone(&url)).await?);
        tasks.push(Self::track_network(&page, Arc::clone(&network)).await?);

        info!(
            headless = config.headless,
            base_url = %config.base_url,
            "chromium session started"
        );
        Ok(Self {
            config,
            browser: tokio::sync::Mutex::new(browser),
            page,
            url,
            network,
            tasks,
        })
    }

    /// Launch with [`DriverConfig::from_env`]
    ///
    /// # Errors
    ///
    /// Returns error if the browser cannot be launched
    pub async fn from_env() -> SauceResult<Self> {
        Self::launch(DriverConfig::from_env()).await
    }

    /// Session configuration
    #[must_use]
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    async fn track_location(page: &CdpPage, cache: Arc<RwLock<String>>) -> SauceResult<JoinHandle<()>> {
        let mut navigated = page
            .event_listener::<EventFrameNavigated>()
            .await
            .map_err(page_error)?;
        let mut within_document = page
            .event_listener::<EventNavigatedWithinDocument>()
            .await
            .map_err(page_error)?;

        Ok(tokio::spawn(async move {
            loop {
                tokio::select! {
                    Some(event) = navigated.next() => {
                        if event.frame.parent_id.is_none() {
                            trace!(url = %event.frame.url, "frame navigated");
                            store_url(&cache, &event.frame.url);
                        }
                    }
                    Some(event) = within_document.next() => {
                        trace!(url = %event.url, "navigated within document");
                        store_url(&cache, &event.url);
                    }
                    else => break,
                }
            }
        }))
    }

    async fn track_network(page: &CdpPage, tracker: Arc<NetworkTracker>) -> SauceResult<JoinHandle<()>> {
        let mut sent = page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .map_err(page_error)?;
        let mut finished = page
            .event_listener::<EventLoadingFinished>()
            .await
            .map_err(page_error)?;
        let mut failed = page
            .event_listener::<EventLoadingFailed>()
            .await
            .map_err(page_error)?;

        Ok(tokio::spawn(async move {
            loop {
                tokio::select! {
                    Some(event) = sent.next() => tracker.started(event.request_id.inner().clone()),
                    Some(event) = finished.next() => tracker.finished(event.request_id.inner()),
                    Some(event) = failed.next() => tracker.finished(event.request_id.inner()),
                    else => break,
                }
            }
        }))
    }

    async fn eval<T: DeserializeOwned>(&self, script: &str) -> SauceResult<T> {
        trace!(script, "evaluate");
        let result = self.page.evaluate(script).await.map_err(page_error)?;
        result.into_value().map_err(page_error)
    }

    async fn presence(&self, selector: &Selector) -> SauceResult<(bool, bool)> {
        self.eval(&presence_script(selector)).await
    }

    async fn refresh_url(&self) -> SauceResult<()> {
        if let Some(url) = self.page.url().await.map_err(page_error)? {
            store_url(&self.url, &url);
        }
        Ok(())
    }

    async fn wait_actionable(&self, selector: &str) -> SauceResult<Selector> {
        self.wait_for_selector(selector, WaitState::Visible, self.config.action_timeout)
            .await?;
        Ok(Selector::parse(selector))
    }

    async fn run_action(&self, script: &str, selector: &str) -> SauceResult<()> {
        if self.eval::<bool>(script).await? {
            Ok(())
        } else {
            Err(SauceError::not_found(selector))
        }
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> SauceResult<()> {
        let target = resolve_url(&self.config.base_url, url);
        debug!(url = %target, "navigate");
        tokio::time::timeout(self.config.navigation_timeout, self.page.goto(target.as_str()))
            .await
            .map_err(|_| SauceError::timeout(format!("navigation to {target}"), self.config.navigation_timeout))?
            .map_err(|e| SauceError::Navigation {
                url: target.clone(),
                message: e.to_string(),
            })?;
        self.refresh_url().await
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        state: WaitState,
        timeout: Duration,
    ) -> SauceResult<()> {
        let parsed = &Selector::parse(selector);
        let waited_for = format!("'{selector}' to be {}", state.as_str());
        poll_until(&waited_for, timeout, self.config.poll_interval, move || async move {
            let (attached, visible) = self.presence(parsed).await?;
            Ok(state.is_satisfied(attached, visible))
        })
        .await
    }

    async fn text_content(&self, selector: &str) -> SauceResult<Option<String>> {
        let (found, text): (bool, Option<String>) =
            self.eval(&text_script(&Selector::parse(selector))).await?;
        if found {
            Ok(text)
        } else {
            Err(SauceError::not_found(selector))
        }
    }

    async fn is_visible(&self, selector: &str) -> SauceResult<bool> {
        let (_, visible) = self.presence(&Selector::parse(selector)).await?;
        Ok(visible)
    }

    async fn click(&self, selector: &str) -> SauceResult<()> {
        let parsed = self.wait_actionable(selector).await?;
        debug!(selector, "click");
        self.run_action(&click_script(&parsed), selector).await
    }

    async fn fill(&self, selector: &str, value: &str) -> SauceResult<()> {
        let parsed = self.wait_actionable(selector).await?;
        debug!(selector, "fill");
        self.run_action(&fill_script(&parsed, value), selector).await
    }

    async fn select_option(&self, selector: &str, value: &str) -> SauceResult<()> {
        let parsed = self.wait_actionable(selector).await?;
        debug!(selector, value, "select option");
        if self.eval::<bool>(&select_script(&parsed, value)).await? {
            Ok(())
        } else {
            Err(SauceError::Page {
                message: format!("no option with value {value:?} in {selector}"),
            })
        }
    }

    async fn screenshot(&self, options: ScreenshotOptions) -> SauceResult<Vec<u8>> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(options.full_page)
            .build();
        self.page
            .screenshot(params)
            .await
            .map_err(|e| SauceError::Screenshot {
                message: e.to_string(),
            })
    }

    fn url(&self) -> String {
        self.url.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    async fn wait_for_url(&self, pattern: &UrlPattern, timeout: Duration) -> SauceResult<()> {
        let waited_for = format!("URL matching {pattern}");
        poll_until(&waited_for, timeout, self.config.poll_interval, move || async move {
            Ok(pattern.matches(&self.url()))
        })
        .await
    }

    async fn wait_for_load_state(&self, state: LoadState) -> SauceResult<()> {
        let script = ready_state_script(state);
        let budget = state.default_timeout();
        poll_until(state.event_name(), budget, self.config.poll_interval, move || async move {
            let ready: bool = self.eval(script).await?;
            Ok(ready && (state != LoadState::NetworkIdle || self.network.is_idle(NETWORK_IDLE_THRESHOLD)))
        })
        .await
    }

    async fn all_text_contents(&self, selector: &str) -> SauceResult<Vec<String>> {
        self.eval(&all_text_script(&Selector::parse(selector))).await
    }

    async fn wait_for_settled(&self, selector: &str, timeout: Duration) -> SauceResult<Settled> {
        let script = settle_script(&Selector::parse(selector), SETTLE_QUIET_WINDOW);
        let settled: bool = tokio::time::timeout(timeout, self.eval(&script))
            .await
            .map_err(|_| SauceError::timeout(format!("'{selector}' to settle"), timeout))??;
        Ok(if settled {
            Settled::Observed
        } else {
            Settled::Unsupported
        })
    }

    async fn close(&self) -> SauceResult<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await.map_err(page_error)?;
        for task in &self.tasks {
            task.abort();
        }
        info!("chromium session closed");
        Ok(())
    }
}

impl Drop for ChromiumDriver {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
