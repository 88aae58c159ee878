// 🏷️ Card Classifier - network brand from BIN prefix ranges
// Brand is always computed here, never read from the dataset or the remote API.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// BRAND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Brand {
    Visa,
    MasterCard,
    /// Russian national payment system
    Mir,
    Unknown,
}

impl Brand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Brand::Visa => "Visa",
            Brand::MasterCard => "MasterCard",
            Brand::Mir => "MIR",
            Brand::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RANGE RULES
// ============================================================================

/// MasterCard 2-series, inclusive
const MASTERCARD_2_SERIES: (u32, u32) = (2221, 2720);
/// MasterCard classic 51-55, inclusive
const MASTERCARD_5_SERIES: (u32, u32) = (51, 55);
/// MIR, inclusive
const MIR_RANGE: (u32, u32) = (2200, 2204);

fn in_range(value: u32, (low, high): (u32, u32)) -> bool {
    (low..=high).contains(&value)
}

/// Classify the card network for a 6-digit BIN.
///
/// Rules are checked in order, first match wins:
/// 1. leading `4` → Visa
/// 2. first two digits 51-55, or first four 2221-2720 → MasterCard
/// 3. first four digits 2200-2204 → MIR
///
/// Anything that is not exactly six ASCII digits is `Unknown`.
pub fn classify_brand(bin: &str) -> Brand {
    if bin.len() != 6 || !bin.bytes().all(|b| b.is_ascii_digit()) {
        return Brand::Unknown;
    }

    // Safe: all six bytes are ASCII digits
    let prefix2: u32 = bin[..2].parse().unwrap_or(0);
    let prefix4: u32 = bin[..4].parse().unwrap_or(0);

    if bin.starts_with('4') {
        Brand::Visa
    } else if in_range(prefix2, MASTERCARD_5_SERIES) || in_range(prefix4, MASTERCARD_2_SERIES) {
        Brand::MasterCard
    } else if in_range(prefix4, MIR_RANGE) {
        Brand::Mir
    } else {
        Brand::Unknown
    }
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn bin_from(prefix: u32, prefix_len: usize, tail: u32) -> String {
        let tail_len = 6 - prefix_len;
        format!(
            "{:0pw$}{:0tw$}",
            prefix,
            tail % 10u32.pow(tail_len as u32),
            pw = prefix_len,
            tw = tail_len
        )
    }

    proptest! {
        #[test]
        fn every_4xxxxx_is_visa(bin in "4[0-9]{5}") {
            prop_assert_eq!(classify_brand(&bin), Brand::Visa);
        }

        #[test]
        fn every_51_to_55_is_mastercard(prefix in 51u32..=55, tail in 0u32..10_000) {
            prop_assert_eq!(classify_brand(&bin_from(prefix, 2, tail)), Brand::MasterCard);
        }

        #[test]
        fn every_2221_to_2720_is_mastercard(prefix in 2221u32..=2720, tail in 0u32..100) {
            prop_assert_eq!(classify_brand(&bin_from(prefix, 4, tail)), Brand::MasterCard);
        }

        #[test]
        fn every_2200_to_2204_is_mir(prefix in 2200u32..=2204, tail in 0u32..100) {
            prop_assert_eq!(classify_brand(&bin_from(prefix, 4, tail)), Brand::Mir);
        }

        #[test]
        fn outside_all_ranges_is_unknown(prefix in prop_oneof![
            0u32..2200,
            2205u32..2221,
            2721u32..4000,
            5000u32..5100,
            5600u32..10_000,
        ], tail in 0u32..100) {
            prop_assert_eq!(classify_brand(&bin_from(prefix, 4, tail)), Brand::Unknown);
        }

        #[test]
        fn any_non_six_digit_input_is_unknown(s in "\\PC{0,12}") {
            prop_assume!(!(s.len() == 6 && s.bytes().all(|b| b.is_ascii_digit())));
            prop_assert_eq!(classify_brand(&s), Brand::Unknown);
        }

        #[test]
        fn classification_is_deterministic(bin in "[0-9]{6}") {
            prop_assert_eq!(classify_brand(&bin), classify_brand(&bin));
        }
    }
}
