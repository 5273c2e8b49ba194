pub mod app;
pub mod assets;
pub mod config;
pub mod counter;
pub mod errors;
pub mod handlers;
pub mod language;
pub mod models;
pub mod state;
pub mod template;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
