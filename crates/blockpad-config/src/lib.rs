pub mod config;
pub mod timing;

pub use config::EditorConfig;
pub use timing::RepeatTiming;
