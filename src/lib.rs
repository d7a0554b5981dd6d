pub mod auth;
pub mod credentials;
pub mod error;
pub mod reports;
pub mod types;

pub use auth::login;
pub use error::{HedexError, Result};
pub use reports::fetch_report;
pub use types::{Credentials, FetchOptions, Report, ReportRequest};
