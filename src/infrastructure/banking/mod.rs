//! Banking API adapters

mod multipart;
mod session;

pub use multipart::MultipartForm;
pub use session::BankingSession;
