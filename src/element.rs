//! Element ID space
//!
//! Identifiers of the information elements the walker understands, plus the
//! two-byte element header that precedes every element body.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw element identifier as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id(pub u8);

// IEEE Std 802.11-2012, 8.4.2.1, Table 8-54
impl Id {
    pub const SSID: Self = Self(0);
    pub const SUPP_RATES: Self = Self(1);
    pub const DS_PARAMS: Self = Self(3);
    pub const CF_PARAMS: Self = Self(4);
    pub const TIM: Self = Self(5);
    pub const CHALLENGE: Self = Self(16);
    pub const PWR_CAPABILITY: Self = Self(33);
    pub const SUPPORTED_CHANNELS: Self = Self(36);
    pub const ERP_INFO: Self = Self(42);
    pub const HT_CAP: Self = Self(45);
    pub const RSN: Self = Self(48);
    pub const EXT_SUPP_RATES: Self = Self(50);
    pub const MOBILITY_DOMAIN: Self = Self(54);
    pub const FAST_BSS_TRANSITION: Self = Self(55);
    pub const TIMEOUT_INTERVAL: Self = Self(56);
    pub const HT_OPERATION: Self = Self(61);
    pub const SSID_LIST: Self = Self(84);
    pub const BSS_MAX_IDLE_PERIOD: Self = Self(90);
    pub const LINK_ID: Self = Self(101);
    pub const INTERWORKING: Self = Self(107);
    pub const QOS_MAP_SET: Self = Self(110);
    pub const MESH_CONFIG: Self = Self(113);
    pub const MESH_ID: Self = Self(114);
    pub const PEER_MGMT: Self = Self(117);
    pub const EXT_CAPAB: Self = Self(127);
    pub const AMPE: Self = Self(139);
    pub const MIC: Self = Self(140);
    pub const VHT_CAP: Self = Self(191);
    pub const VHT_OPERATION: Self = Self(192);
    pub const VHT_OPMODE_NOTIF: Self = Self(199);
    pub const VENDOR_SPECIFIC: Self = Self(221);
    // Not assigned by IEEE; carried by action notification capable peers.
    pub const NOTIFICATION_INDICATOR: Self = Self(222);
}

impl From<u8> for Id {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<Id> for u8 {
    fn from(id: Id) -> Self {
        id.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Element kinds the walker dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Ssid,
    SuppRates,
    DsParams,
    CfParams,
    Tim,
    Challenge,
    PwrCapability,
    SupportedChannels,
    ErpInfo,
    HtCap,
    Rsn,
    ExtSuppRates,
    MobilityDomain,
    FastBssTransition,
    TimeoutInterval,
    HtOperation,
    SsidList,
    BssMaxIdlePeriod,
    LinkId,
    Interworking,
    QosMapSet,
    MeshConfig,
    MeshId,
    PeerMgmt,
    ExtCapab,
    Ampe,
    Mic,
    VhtCap,
    VhtOperation,
    VhtOpmodeNotif,
    VendorSpecific,
    NotificationIndicator,
    Unknown(u8),
}

impl From<Id> for ElementKind {
    fn from(id: Id) -> Self {
        match id {
            Id::SSID => Self::Ssid,
            Id::SUPP_RATES => Self::SuppRates,
            Id::DS_PARAMS => Self::DsParams,
            Id::CF_PARAMS => Self::CfParams,
            Id::TIM => Self::Tim,
            Id::CHALLENGE => Self::Challenge,
            Id::PWR_CAPABILITY => Self::PwrCapability,
            Id::SUPPORTED_CHANNELS => Self::SupportedChannels,
            Id::ERP_INFO => Self::ErpInfo,
            Id::HT_CAP => Self::HtCap,
            Id::RSN => Self::Rsn,
            Id::EXT_SUPP_RATES => Self::ExtSuppRates,
            Id::MOBILITY_DOMAIN => Self::MobilityDomain,
            Id::FAST_BSS_TRANSITION => Self::FastBssTransition,
            Id::TIMEOUT_INTERVAL => Self::TimeoutInterval,
            Id::HT_OPERATION => Self::HtOperation,
            Id::SSID_LIST => Self::SsidList,
            Id::BSS_MAX_IDLE_PERIOD => Self::BssMaxIdlePeriod,
            Id::LINK_ID => Self::LinkId,
            Id::INTERWORKING => Self::Interworking,
            Id::QOS_MAP_SET => Self::QosMapSet,
            Id::MESH_CONFIG => Self::MeshConfig,
            Id::MESH_ID => Self::MeshId,
            Id::PEER_MGMT => Self::PeerMgmt,
            Id::EXT_CAPAB => Self::ExtCapab,
            Id::AMPE => Self::Ampe,
            Id::MIC => Self::Mic,
            Id::VHT_CAP => Self::VhtCap,
            Id::VHT_OPERATION => Self::VhtOperation,
            Id::VHT_OPMODE_NOTIF => Self::VhtOpmodeNotif,
            Id::VENDOR_SPECIFIC => Self::VendorSpecific,
            Id::NOTIFICATION_INDICATOR => Self::NotificationIndicator,
            Id(other) => Self::Unknown(other),
        }
    }
}

impl From<u8> for ElementKind {
    fn from(value: u8) -> Self {
        Self::from(Id(value))
    }
}

impl ElementKind {
    /// Minimum body length for elements that are only recorded when long
    /// enough. Shorter bodies are skipped without counting as unknown.
    pub fn min_len(&self) -> usize {
        match self {
            ElementKind::LinkId => 18,
            ElementKind::QosMapSet => 16,
            ElementKind::BssMaxIdlePeriod => 3,
            ElementKind::VhtOpmodeNotif => 1,
            _ => 0,
        }
    }

    /// Whether a body of `len` bytes is long enough to be recorded.
    /// The operating mode notification body is a single octet.
    pub fn accepts_len(&self, len: usize) -> bool {
        match self {
            ElementKind::VhtOpmodeNotif => len == 1,
            _ => len >= self.min_len(),
        }
    }

    /// Elements that are consumed but never recorded.
    pub fn is_ignored(&self) -> bool {
        matches!(
            self,
            ElementKind::CfParams | ElementKind::Tim | ElementKind::PwrCapability
        )
    }

    /// Check if kind is outside the recognized ID set
    pub fn is_unknown(&self) -> bool {
        matches!(self, ElementKind::Unknown(_))
    }
}

/// Two-byte element header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub id: Id,
    pub body_len: u8,
}

impl Header {
    /// Split an element header off the front of `bytes`.
    pub fn parse(bytes: &[u8]) -> Option<(Self, &[u8])> {
        match bytes {
            [id, body_len, rest @ ..] => Some((
                Self {
                    id: Id(*id),
                    body_len: *body_len,
                },
                rest,
            )),
            _ => None,
        }
    }

    /// Total size of the element on the wire
    pub fn element_len(&self) -> usize {
        crate::ELEMENT_HEADER_LEN + self.body_len as usize
    }
}
