// BIN Lookup - Core Library
// Card network/bank/country from the first six digits, plus the chat
// transport and health endpoint the binary wires together.

pub mod error;
pub mod classifier;
pub mod validator;
pub mod table;
pub mod resolver;
pub mod config;
pub mod reply;
pub mod bot;
pub mod health;
pub mod telegram;

// Re-export commonly used types
pub use error::{Error, Result};
pub use classifier::{classify_brand, Brand};
pub use validator::{extract_bin, BinCode, ValidationError};
pub use table::{load, BinRecord, BinTable, UNKNOWN};
pub use resolver::{
    resolve, BinlistClient, IssuerInfo, IssuerSource, LookupDegraded, LookupResult,
    LookupSource, Resolver,
};
pub use config::Config;
pub use bot::BotHandler;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
