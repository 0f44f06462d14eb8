//! # IEEE 802.11 information element parsing
//!
//! Decodes the variable-length Information Elements carried in 802.11
//! management frames and derives facts from them: which vendor extension a
//! blob belongs to, which header address is the BSSID, and which carrier
//! frequency a regulatory operating class and channel number refer to.
//!
//! ## Architecture
//!
//! The crate is organized into several modules:
//! - `element`: Element ID space and the raw TLV header
//! - `elems`: Element walker producing a set of borrowed element references
//! - `vendor`: Vendor-specific element dispatch by OUI and sub-type
//! - `header`: Frame control view and BSSID resolution from MAC headers
//! - `channel`: Regulatory operating class to frequency tables
//! - `wmm`: WMM access category parameter configuration
//! - `diag`: Diagnostic sinks used by the parsers
//! - `config`: TOML configuration for the command-line tool
//!
//! Every reference produced by the parsers borrows from the caller's input
//! buffer, so nothing outlives the bytes it was sliced from.

pub mod channel;
pub mod config;
pub mod diag;
pub mod element;
pub mod elems;
pub mod header;
pub mod vendor;
pub mod wmm;

// Re-export commonly used types
pub use crate::{
    channel::{ieee80211_chan_to_freq, ieee80211_freq_to_chan, ieee80211_is_dfs, HwMode},
    config::ElemsConfig,
    diag::{DiagSink, LogSink, NullSink},
    element::{ElementKind, Id},
    elems::{
        ieee802_11_ie_count, ieee802_11_vendor_ie_concat, parse_elems, parse_elems_with_sink,
        supp_rates_11b_only, Elements, ParseRes,
    },
    header::{fc2str, get_hdr_bssid, FrameControl, FrameType},
    vendor::{parse_vendor_specific, Wmm},
    wmm::{hostapd_config_wmm_ac, WmmAc, WmmAcParams},
};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ElemsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ElemsError>;

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Length of an element header (ID + length)
pub const ELEMENT_HEADER_LEN: usize = 2;

/// Length of an IEEE 802 MAC address
pub const ETH_ALEN: usize = 6;

// Utility functions
pub fn init_logging() {
    env_logger::init();
}

/// Format bytes as a space separated hex string for diagnostics.
pub(crate) fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| hex::encode([*b]))
        .collect::<Vec<_>>()
        .join(" ")
}
