//! Regulatory channel mapping
//!
//! Converts (country, operating class, channel) triples into center
//! frequencies using the per-domain operating class tables of IEEE Std
//! 802.11-2012 Annex E, and frequencies back into channel numbers.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Hardware mode a frequency belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HwMode {
    /// 802.11b, 2.4 GHz channel 14 only
    Ieee80211B,
    /// 802.11g, 2.4 GHz
    Ieee80211G,
    /// 802.11a, 4.9 and 5 GHz
    Ieee80211A,
    /// 802.11ad, 60 GHz
    Ieee80211Ad,
}

impl HwMode {
    /// Get mode name
    pub fn name(&self) -> &'static str {
        match self {
            HwMode::Ieee80211B => "802.11b",
            HwMode::Ieee80211G => "802.11g",
            HwMode::Ieee80211A => "802.11a",
            HwMode::Ieee80211Ad => "802.11ad",
        }
    }
}

/// Regulatory domains with their own operating class numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegDomain {
    NorthAmerica,
    Europe,
    Japan,
    China,
    Global,
}

/// Country codes using the North American operating classes
pub const US_OP_CLASS_CC: &[&str] = &["US", "CA"];

/// Country codes using the European operating classes
pub const EU_OP_CLASS_CC: &[&str] = &[
    "AL", "AM", "AT", "AZ", "BA", "BE", "BG", "BY", "CH", "CY", "CZ", "DE", "DK", "EE", "EL",
    "ES", "FI", "FR", "GE", "HR", "HU", "IE", "IS", "IT", "LI", "LT", "LU", "LV", "MD", "ME",
    "MK", "MT", "NL", "NO", "PL", "PT", "RO", "RS", "RU", "SE", "SI", "SK", "TR", "UA", "UK",
];

/// Country codes using the Japanese operating classes
pub const JP_OP_CLASS_CC: &[&str] = &["JP"];

/// Country codes using the Chinese operating classes
pub const CN_OP_CLASS_CC: &[&str] = &["CN", "CA"];

/// One row of an operating class table: every class in `op_classes` allows
/// `channels`, with center frequency `base + spacing * channel` MHz.
#[derive(Debug, Clone)]
pub struct ChannelRule {
    pub op_classes: &'static [u8],
    pub channels: RangeInclusive<u8>,
    pub base: u32,
    pub spacing: u32,
}

impl ChannelRule {
    const fn new(
        op_classes: &'static [u8],
        channels: RangeInclusive<u8>,
        base: u32,
        spacing: u32,
    ) -> Self {
        Self {
            op_classes,
            channels,
            base,
            spacing,
        }
    }

    /// Frequency for `chan` in `op_class`, if this rule covers both.
    pub fn frequency(&self, op_class: u8, chan: u8) -> Option<u32> {
        if !self.op_classes.contains(&op_class) {
            return None;
        }
        if !self.channels.contains(&chan) {
            return None;
        }
        Some(self.base + self.spacing * chan as u32)
    }
}

const BAND_2GHZ: u32 = 2407;
const BAND_2GHZ_CH14: u32 = 2414;
const BAND_5GHZ: u32 = 5000;
const BAND_60GHZ: u32 = 56160;
const SPACING_5MHZ: u32 = 5;
const SPACING_60GHZ: u32 = 2160;

const US_RULES: &[ChannelRule] = &[
    ChannelRule::new(&[12, 32, 33], 1..=11, BAND_2GHZ, SPACING_5MHZ),
    ChannelRule::new(&[1, 2, 22, 23, 27, 28], 36..=64, BAND_5GHZ, SPACING_5MHZ),
    ChannelRule::new(&[4, 24], 100..=144, BAND_5GHZ, SPACING_5MHZ),
    ChannelRule::new(&[3, 25, 26, 30, 31], 149..=161, BAND_5GHZ, SPACING_5MHZ),
    ChannelRule::new(&[34], 1..=3, BAND_60GHZ, SPACING_60GHZ),
];

const EU_RULES: &[ChannelRule] = &[
    ChannelRule::new(&[4, 11, 12], 1..=13, BAND_2GHZ, SPACING_5MHZ),
    ChannelRule::new(&[1, 2, 5, 6, 8, 9], 36..=64, BAND_5GHZ, SPACING_5MHZ),
    ChannelRule::new(&[3, 7, 10, 16], 100..=140, BAND_5GHZ, SPACING_5MHZ),
    ChannelRule::new(&[17], 149..=169, BAND_5GHZ, SPACING_5MHZ),
    ChannelRule::new(&[18], 1..=4, BAND_60GHZ, SPACING_60GHZ),
];

const JP_RULES: &[ChannelRule] = &[
    ChannelRule::new(&[30, 56, 57], 1..=13, BAND_2GHZ, SPACING_5MHZ),
    ChannelRule::new(&[31], 14..=14, BAND_2GHZ_CH14, SPACING_5MHZ),
    ChannelRule::new(
        &[1, 32, 33, 36, 37, 38, 41, 42, 43],
        34..=64,
        BAND_5GHZ,
        SPACING_5MHZ,
    ),
    ChannelRule::new(
        &[34, 35, 39, 40, 44, 45, 58],
        100..=140,
        BAND_5GHZ,
        SPACING_5MHZ,
    ),
    ChannelRule::new(&[59], 1..=3, BAND_60GHZ, SPACING_60GHZ),
];

const CN_RULES: &[ChannelRule] = &[
    ChannelRule::new(&[7, 8, 9], 1..=13, BAND_2GHZ, SPACING_5MHZ),
    ChannelRule::new(&[1, 2, 4, 5], 36..=64, BAND_5GHZ, SPACING_5MHZ),
    ChannelRule::new(&[3, 6], 149..=165, BAND_5GHZ, SPACING_5MHZ),
];

// IEEE Std 802.11-2012, Table E-4
const GLOBAL_RULES: &[ChannelRule] = &[
    ChannelRule::new(&[81], 1..=13, BAND_2GHZ, SPACING_5MHZ),
    ChannelRule::new(&[82], 14..=14, BAND_2GHZ_CH14, SPACING_5MHZ),
    ChannelRule::new(&[83, 84], 1..=13, BAND_2GHZ, SPACING_5MHZ),
    ChannelRule::new(&[115, 116, 117, 118, 119, 120], 36..=64, BAND_5GHZ, SPACING_5MHZ),
    ChannelRule::new(&[121, 122, 123], 100..=140, BAND_5GHZ, SPACING_5MHZ),
    ChannelRule::new(&[124, 125, 126, 127], 149..=161, BAND_5GHZ, SPACING_5MHZ),
    ChannelRule::new(&[128, 130], 36..=161, BAND_5GHZ, SPACING_5MHZ),
    ChannelRule::new(&[129], 50..=114, BAND_5GHZ, SPACING_5MHZ),
    ChannelRule::new(&[180], 1..=4, BAND_60GHZ, SPACING_60GHZ),
];

impl RegDomain {
    /// Country specific domains, in lookup order
    pub const COUNTRY_DOMAINS: [RegDomain; 4] = [
        RegDomain::NorthAmerica,
        RegDomain::Europe,
        RegDomain::Japan,
        RegDomain::China,
    ];

    /// Get domain name
    pub fn name(&self) -> &'static str {
        match self {
            RegDomain::NorthAmerica => "US",
            RegDomain::Europe => "EU",
            RegDomain::Japan => "JP",
            RegDomain::China => "CN",
            RegDomain::Global => "global",
        }
    }

    /// Member countries. The global domain has none.
    pub fn countries(&self) -> &'static [&'static str] {
        match self {
            RegDomain::NorthAmerica => US_OP_CLASS_CC,
            RegDomain::Europe => EU_OP_CLASS_CC,
            RegDomain::Japan => JP_OP_CLASS_CC,
            RegDomain::China => CN_OP_CLASS_CC,
            RegDomain::Global => &[],
        }
    }

    /// Operating class table
    pub fn rules(&self) -> &'static [ChannelRule] {
        match self {
            RegDomain::NorthAmerica => US_RULES,
            RegDomain::Europe => EU_RULES,
            RegDomain::Japan => JP_RULES,
            RegDomain::China => CN_RULES,
            RegDomain::Global => GLOBAL_RULES,
        }
    }

    /// Check whether `country` belongs to this domain. Only the first two
    /// characters of `country` are compared.
    pub fn matches(&self, country: &str) -> bool {
        let Some(cc) = country.as_bytes().get(..2) else {
            return false;
        };
        self.countries().iter().any(|member| member.as_bytes() == cc)
    }

    /// Frequency of `chan` in `op_class` under this domain's table.
    pub fn chan_to_freq(&self, op_class: u8, chan: u8) -> Option<u32> {
        self.rules()
            .iter()
            .find_map(|rule| rule.frequency(op_class, chan))
    }
}

/// Convert an operating class and channel to a center frequency in MHz.
///
/// Every country domain that `country` belongs to is tried in order, and
/// the global table is the last resort. A country listed in more than one
/// domain (CA) falls through from one to the next.
pub fn ieee80211_chan_to_freq(country: Option<&str>, op_class: u8, chan: u8) -> Option<u32> {
    if let Some(country) = country {
        for domain in RegDomain::COUNTRY_DOMAINS {
            if !domain.matches(country) {
                continue;
            }
            if let Some(freq) = domain.chan_to_freq(op_class, chan) {
                log::trace!(
                    "{} op_class={} chan={} -> {} MHz",
                    domain.name(),
                    op_class,
                    chan,
                    freq
                );
                return Some(freq);
            }
        }
    }

    RegDomain::Global.chan_to_freq(op_class, chan)
}

/// Convert a frequency in MHz to its hardware mode and channel number.
pub fn ieee80211_freq_to_chan(freq: u32) -> Option<(HwMode, u8)> {
    let (mode, chan) = match freq {
        2412..=2472 => (HwMode::Ieee80211G, (freq - BAND_2GHZ) / SPACING_5MHZ),
        2484 => (HwMode::Ieee80211B, 14),
        4900..=4999 => (HwMode::Ieee80211A, (freq - 4000) / SPACING_5MHZ),
        5000..=5899 => (HwMode::Ieee80211A, (freq - BAND_5GHZ) / SPACING_5MHZ),
        58320..=64800 => (HwMode::Ieee80211Ad, (freq - BAND_60GHZ) / SPACING_60GHZ),
        _ => return None,
    };

    u8::try_from(chan).ok().map(|chan| (mode, chan))
}

/// Coarse DFS check covering the 5.25-5.35 and 5.47-5.725 GHz ranges.
pub fn ieee80211_is_dfs(freq: u32) -> bool {
    (5260..=5320).contains(&freq) || (5500..=5700).contains(&freq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_us_2ghz() {
        assert_eq!(ieee80211_chan_to_freq(Some("US"), 12, 6), Some(2437));
        assert_eq!(ieee80211_chan_to_freq(Some("US"), 12, 1), Some(2412));
        assert_eq!(ieee80211_chan_to_freq(Some("US"), 12, 11), Some(2462));
        assert_eq!(ieee80211_chan_to_freq(Some("US"), 12, 12), None);
        assert_eq!(ieee80211_chan_to_freq(Some("US"), 12, 0), None);
    }

    #[test]
    fn test_us_5ghz() {
        assert_eq!(ieee80211_chan_to_freq(Some("US"), 1, 36), Some(5180));
        assert_eq!(ieee80211_chan_to_freq(Some("US"), 4, 144), Some(5720));
        assert_eq!(ieee80211_chan_to_freq(Some("US"), 3, 149), Some(5745));
        assert_eq!(ieee80211_chan_to_freq(Some("US"), 3, 165), None);
    }

    #[test]
    fn test_60ghz() {
        assert_eq!(ieee80211_chan_to_freq(Some("US"), 34, 2), Some(60480));
        assert_eq!(ieee80211_chan_to_freq(Some("DE"), 18, 4), Some(64800));
        assert_eq!(ieee80211_chan_to_freq(Some("JP"), 59, 3), Some(62640));
        assert_eq!(ieee80211_chan_to_freq(Some("JP"), 59, 4), None);
        assert_eq!(ieee80211_chan_to_freq(None, 180, 1), Some(58320));
    }

    #[test]
    fn test_europe() {
        assert_eq!(ieee80211_chan_to_freq(Some("FR"), 4, 13), Some(2472));
        assert_eq!(ieee80211_chan_to_freq(Some("DE"), 17, 169), Some(5845));
        assert_eq!(ieee80211_chan_to_freq(Some("UK"), 3, 140), Some(5700));
        assert!(RegDomain::Europe.matches("EL"));
        assert_eq!(EU_OP_CLASS_CC.len(), 45);
    }

    #[test]
    fn test_japan_channel_14() {
        assert_eq!(ieee80211_chan_to_freq(Some("JP"), 31, 14), Some(2484));
        assert_eq!(ieee80211_chan_to_freq(Some("JP"), 31, 13), None);
        assert_eq!(ieee80211_chan_to_freq(Some("JP"), 1, 34), Some(5170));
        assert_eq!(ieee80211_chan_to_freq(None, 82, 14), Some(2484));
    }

    #[test]
    fn test_china() {
        assert_eq!(ieee80211_chan_to_freq(Some("CN"), 3, 165), Some(5825));
        assert_eq!(ieee80211_chan_to_freq(Some("CN"), 7, 1), Some(2412));
    }

    #[test]
    fn test_canada_falls_through_to_china() {
        // Class 3 stops at channel 161 in the US table but reaches 165 in CN
        assert_eq!(ieee80211_chan_to_freq(Some("CA"), 3, 165), Some(5825));
        assert_eq!(ieee80211_chan_to_freq(Some("US"), 3, 165), None);
        assert!(RegDomain::NorthAmerica.matches("CA"));
        assert!(RegDomain::China.matches("CA"));
    }

    #[test]
    fn test_global_fallback() {
        assert_eq!(ieee80211_chan_to_freq(None, 81, 6), Some(2437));
        assert_eq!(ieee80211_chan_to_freq(Some("US"), 81, 6), Some(2437));
        assert_eq!(ieee80211_chan_to_freq(Some("ZZ"), 115, 36), Some(5180));
        assert_eq!(ieee80211_chan_to_freq(None, 129, 50), Some(5250));
        assert_eq!(ieee80211_chan_to_freq(None, 128, 155), Some(5775));
        assert_eq!(ieee80211_chan_to_freq(None, 12, 6), None);
        assert_eq!(ieee80211_chan_to_freq(None, 200, 1), None);
    }

    #[test]
    fn test_country_prefix_match() {
        assert_eq!(ieee80211_chan_to_freq(Some("US "), 12, 6), Some(2437));
        assert_eq!(ieee80211_chan_to_freq(Some("USA"), 12, 6), Some(2437));
        assert!(!RegDomain::NorthAmerica.matches("U"));
        assert!(!RegDomain::NorthAmerica.matches(""));
        assert!(!RegDomain::Global.matches("US"));
    }

    #[test]
    fn test_freq_to_chan() {
        assert_eq!(ieee80211_freq_to_chan(2412), Some((HwMode::Ieee80211G, 1)));
        assert_eq!(ieee80211_freq_to_chan(2472), Some((HwMode::Ieee80211G, 13)));
        assert_eq!(ieee80211_freq_to_chan(2484), Some((HwMode::Ieee80211B, 14)));
        assert_eq!(ieee80211_freq_to_chan(4920), Some((HwMode::Ieee80211A, 184)));
        assert_eq!(ieee80211_freq_to_chan(5180), Some((HwMode::Ieee80211A, 36)));
        assert_eq!(ieee80211_freq_to_chan(60480), Some((HwMode::Ieee80211Ad, 2)));
        assert_eq!(ieee80211_freq_to_chan(2477), None);
        assert_eq!(ieee80211_freq_to_chan(5900), None);
        assert_eq!(ieee80211_freq_to_chan(0), None);
    }

    #[test]
    fn test_is_dfs() {
        assert!(ieee80211_is_dfs(5260));
        assert!(ieee80211_is_dfs(5320));
        assert!(ieee80211_is_dfs(5500));
        assert!(ieee80211_is_dfs(5700));
        assert!(!ieee80211_is_dfs(5180));
        assert!(!ieee80211_is_dfs(5745));
        assert!(!ieee80211_is_dfs(2437));
    }

    #[test]
    fn test_hw_mode_name() {
        assert_eq!(HwMode::Ieee80211Ad.name(), "802.11ad");
        assert_eq!(RegDomain::Global.name(), "global");
    }
}
