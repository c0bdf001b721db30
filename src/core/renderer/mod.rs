pub mod api;
pub mod backend;
pub mod quad;
pub mod sprite;
