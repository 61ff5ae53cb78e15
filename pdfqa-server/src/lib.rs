//! `pdfqa-server` answers questions about PDF documents over HTTP.
//!
//! `POST /store` loads a PDF, splits it into chunks and indexes their
//! embeddings. `POST /search` retrieves the chunks closest to a question and
//! asks a completion model to answer from them.

pub mod config;
pub mod error;
pub mod json;
pub mod qa;
pub mod server;

pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ErrorKind};
pub use qa::{Answer, Background, QaService};
pub use server::{AppState, ServerConfig, app_router, run_server};
