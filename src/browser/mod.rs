//! Browser session module
//!
//! This module owns the browser side of the system: session launch and
//! shutdown through ChromiumOxide, and the page-level capability surface the
//! traversal engine consumes.

pub mod controller;
pub mod driver;

pub use controller::BrowserController;
pub use driver::{CdpDriver, PageDriver};
