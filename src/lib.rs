pub mod app;
pub mod bridge;
pub mod error;
pub mod util;
pub mod widget;
