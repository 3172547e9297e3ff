//! 最小化的 W3C WebDriver 客户端 (chromedriver / geckodriver)

pub mod client;
pub mod locator;
pub mod wait;

pub use client::{Element, Session, WebDriverClient};
pub use locator::{xpath_literal, Locator};
pub use wait::Wait;
