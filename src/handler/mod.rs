//! Request handling: routing, path resolution, file serving and error
//! responses.

pub mod error_pages;
pub mod resolve;
pub mod router;
pub mod static_files;

pub use error_pages::ErrorPages;
pub use router::handle_request;
