pub mod action;
pub mod activity;
pub mod channel;
pub mod context;
pub mod engine;
pub mod router;
