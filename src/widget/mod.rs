pub mod artwork;
pub mod host;
pub mod renderer;
pub mod state;
pub mod store;
pub mod view;
