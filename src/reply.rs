// 💬 User-facing reply text

use crate::resolver::LookupResult;

pub const START_MESSAGE: &str = "\
👋 Hi! I identify a payment card's network, bank and country.

Send me the first 6 digits of the card number (the BIN), for example: 424242

Only the first 6 digits are needed. Never send a full card number.";

/// Three lines: network, bank, country
pub fn format_result(result: &LookupResult) -> String {
    format!(
        "💳 Network: {}\n🏦 Bank: {}\n🌍 Country: {}",
        result.brand, result.issuer, result.country
    )
}
