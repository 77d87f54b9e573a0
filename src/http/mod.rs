//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (request ID, signal extraction)
//!     → middleware/domain_culture.rs (resolve, attach to extensions)
//!     → handler reads Extension<DomainCulture>
//! ```

pub mod middleware;
pub mod request;
pub mod server;

pub use middleware::{domain_culture_middleware, SharedResolver};
pub use request::{extract_signals, MakeRequestUuid, X_REQUEST_ID};
pub use server::{apply_config, HttpServer};
