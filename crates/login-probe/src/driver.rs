//! Browser driver boundary.
//!
//! The resolver and the login page object only ever talk to these two traits,
//! which keeps the matching and synchronization logic testable without a
//! browser.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  PageDriver / DomElement (abstract traits)                   │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────┐   ┌─────────────────────────┐   │
//! │  │  ChromiumDriver         │   │  FakePage               │   │
//! │  │  (feature = "browser")  │   │  (in-memory DOM)        │   │
//! │  │  CDP via chromiumoxide  │   │  unit/integration tests │   │
//! │  └─────────────────────────┘   └─────────────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Element handles are only valid for the operation that produced them: the
//! page may re-render between calls and leave a handle stale.

use crate::locator::Selector;
use crate::result::ProbeResult;
use async_trait::async_trait;

/// A live DOM element returned by [`PageDriver::find_all`].
///
/// Methods report element-level failures as [`crate::ProbeError::Driver`];
/// callers attribute them to a role with [`crate::ProbeError::for_role`].
#[async_trait]
pub trait DomElement: Send + Sync {
    /// Rendered with a non-zero size and not hidden by style or attribute
    async fn is_visible(&self) -> ProbeResult<bool>;

    /// Not disabled
    async fn is_enabled(&self) -> ProbeResult<bool>;

    /// Click the element
    async fn click(&self) -> ProbeResult<()>;

    /// Clear the element's editable content
    async fn clear(&self) -> ProbeResult<()>;

    /// Type literal text into the element
    async fn send_keys(&self, text: &str) -> ProbeResult<()>;

    /// Rendered text content
    async fn text(&self) -> ProbeResult<String>;

    /// Current `value` property (inputs)
    async fn value(&self) -> ProbeResult<String>;

    /// Attribute value, `None` when the attribute is absent
    async fn attribute(&self, name: &str) -> ProbeResult<Option<String>>;

    /// Scroll the element to the viewport center
    async fn scroll_into_view(&self) -> ProbeResult<()>;
}

/// Abstract driver for the single browser page under test.
///
/// Operations are issued by one logical flow at a time; implementations do not
/// need to support concurrent use of the same page.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Element handle type
    type Element: DomElement;

    /// Navigate to URL
    async fn navigate(&self, url: &str) -> ProbeResult<()>;

    /// Query all matching elements in document order
    async fn find_all(&self, selector: &Selector) -> ProbeResult<Vec<Self::Element>>;

    /// Terminate the browser session
    async fn quit(&self) -> ProbeResult<()>;
}
