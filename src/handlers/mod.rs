pub mod api;
pub mod rooms;
pub mod stream;
