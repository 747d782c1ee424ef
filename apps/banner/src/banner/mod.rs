pub mod composer;
pub mod error;
pub mod handlers;
pub mod request;
