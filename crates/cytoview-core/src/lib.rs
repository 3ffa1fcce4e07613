pub mod annotate;
pub mod compose;
pub mod config;
pub mod consts;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod input;
pub mod media;
pub mod status;
pub mod transform;
pub mod viewer;
pub mod viewport;
