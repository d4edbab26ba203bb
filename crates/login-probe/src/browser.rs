//! Chromium driver over the Chrome DevTools Protocol.
//!
//! Only compiled with the `browser` feature. Element state that CDP does not
//! expose directly (visibility, `value`, enabled) is read by calling small
//! functions on the element's remote object.

use crate::config::BrowserConfig;
use crate::driver::{DomElement, PageDriver};
use crate::locator::Selector;
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::element::Element as CdpElement;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

const IS_VISIBLE_JS: &str = "function() { \
    const rect = this.getBoundingClientRect(); \
    const style = window.getComputedStyle(this); \
    return rect.width > 0 && rect.height > 0 \
        && style.visibility !== 'hidden' && style.display !== 'none'; \
}";

const IS_ENABLED_JS: &str = "function() { return !this.disabled; }";

const VALUE_JS: &str = "function() { return this.value ?? ''; }";

// Goes through the native setter so framework-controlled inputs see the change.
const CLEAR_JS: &str = "function() { \
    const proto = Object.getPrototypeOf(this); \
    const desc = Object.getOwnPropertyDescriptor(proto, 'value'); \
    if (desc && desc.set) { desc.set.call(this, ''); } else { this.value = ''; } \
    this.dispatchEvent(new Event('input', { bubbles: true })); \
    this.dispatchEvent(new Event('change', { bubbles: true })); \
}";

const SCROLL_JS: &str =
    "function() { this.scrollIntoView({ block: 'center', inline: 'center' }); }";

fn driver_error(err: impl std::fmt::Display) -> ProbeError {
    ProbeError::driver(err.to_string())
}

/// Page driver backed by a real Chromium instance
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: Arc<Mutex<CdpBrowser>>,
    page: CdpPage,
    handle: tokio::task::JoinHandle<()>,
    navigation_timeout: Duration,
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank page
    ///
    /// # Errors
    ///
    /// Returns error if browser cannot be launched
    pub async fn launch(config: &BrowserConfig, navigation_timeout: Duration) -> ProbeResult<Self> {
        let mut builder = CdpConfig::builder()
            .window_size(config.window_width, config.window_height)
            .request_timeout(navigation_timeout);

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        for arg in &config.extra_args {
            builder = builder.arg(arg.as_str());
        }

        let cdp_config = builder
            .build()
            .map_err(|message| ProbeError::BrowserLaunch { message })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| ProbeError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ProbeError::BrowserLaunch {
                message: e.to_string(),
            })?;

        info!(headless = config.headless, "browser launched");
        Ok(Self {
            browser: Arc::new(Mutex::new(browser)),
            page,
            handle,
            navigation_timeout,
        })
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    type Element = ChromiumElement;

    async fn navigate(&self, url: &str) -> ProbeResult<()> {
        match tokio::time::timeout(self.navigation_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(ProbeError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(ProbeError::Navigation {
                url: url.to_string(),
                message: format!("page load exceeded {:?}", self.navigation_timeout),
            }),
        }
    }

    async fn find_all(&self, selector: &Selector) -> ProbeResult<Vec<ChromiumElement>> {
        let found = match selector {
            Selector::Css(css) => self.page.find_elements(css.as_str()).await,
            Selector::XPath(xpath) => self.page.find_xpaths(xpath.as_str()).await,
        };
        let elements = found.map_err(driver_error)?;
        debug!(%selector, matches = elements.len(), "queried page");
        Ok(elements.into_iter().map(|inner| ChromiumElement { inner }).collect())
    }

    async fn quit(&self) -> ProbeResult<()> {
        let mut browser = self.browser.lock().await;
        let closed = browser.close().await.map_err(driver_error);
        let _ = browser.wait().await;
        self.handle.abort();
        closed.map(|_| ())
    }
}

/// Element handle of a [`ChromiumDriver`] page
#[derive(Debug)]
pub struct ChromiumElement {
    inner: CdpElement,
}

impl ChromiumElement {
    async fn call(&self, function: &str) -> ProbeResult<Option<Value>> {
        let returns = self
            .inner
            .call_js_fn(function, false)
            .await
            .map_err(driver_error)?;
        Ok(returns.result.value)
    }

    async fn call_bool(&self, function: &str) -> ProbeResult<bool> {
        Ok(self.call(function).await?.and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

#[async_trait]
impl DomElement for ChromiumElement {
    async fn is_visible(&self) -> ProbeResult<bool> {
        self.call_bool(IS_VISIBLE_JS).await
    }

    async fn is_enabled(&self) -> ProbeResult<bool> {
        self.call_bool(IS_ENABLED_JS).await
    }

    async fn click(&self) -> ProbeResult<()> {
        self.inner.click().await.map_err(driver_error)?;
        Ok(())
    }

    async fn clear(&self) -> ProbeResult<()> {
        self.call(CLEAR_JS).await.map(|_| ())
    }

    async fn send_keys(&self, text: &str) -> ProbeResult<()> {
        self.inner.type_str(text).await.map_err(driver_error)?;
        Ok(())
    }

    async fn text(&self) -> ProbeResult<String> {
        let text = self.inner.inner_text().await.map_err(driver_error)?;
        Ok(text.unwrap_or_default())
    }

    async fn value(&self) -> ProbeResult<String> {
        Ok(self
            .call(VALUE_JS)
            .await?
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default())
    }

    async fn attribute(&self, name: &str) -> ProbeResult<Option<String>> {
        self.inner.attribute(name).await.map_err(driver_error)
    }

    async fn scroll_into_view(&self) -> ProbeResult<()> {
        self.call(SCROLL_JS).await.map(|_| ())
    }
}
