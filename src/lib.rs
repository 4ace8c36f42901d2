pub mod browser;
pub mod data;
pub mod errors;
pub mod locator;
pub mod poll;
pub mod report;
pub mod suite;
pub mod types;

pub use browser::BrowserSession;
pub use errors::{Result, SuiteError};
pub use locator::Locator;
pub use poll::Poller;
pub use report::{StepOutcome, SuiteReport};
pub use suite::ImageSearchSuite;
pub use types::*;
