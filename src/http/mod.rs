//! HTTP protocol layer module
//!
//! Response builders, conditional-request helpers, and MIME detection,
//! decoupled from page and asset handling.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_405_response, build_500_response,
    build_redirect_response,
};
