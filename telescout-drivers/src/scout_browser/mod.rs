pub mod driver;
pub mod page;

pub use driver::{BrowserManager, BrowserOptions};
pub use page::ScoutPage;
