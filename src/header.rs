//! IEEE 802.11 MAC header inspection
//!
//! Frame control decoding and BSSID resolution for raw MAC headers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ETH_ALEN;

/// PS-Poll frames are 16 bytes; every other frame header is longer.
pub const MIN_HDR_LEN: usize = 16;

/// Header length of data and management frames with three addresses
pub const THREE_ADDR_HDR_LEN: usize = 24;

// Address field offsets
const ADDR1_OFFSET: usize = 4;
const ADDR2_OFFSET: usize = 10;
const ADDR3_OFFSET: usize = 16;

// IEEE Std 802.11-2012, 8.2.4.1.3, Table 8-1
pub const STYPE_ASSOC_REQ: u8 = 0;
pub const STYPE_ASSOC_RESP: u8 = 1;
pub const STYPE_REASSOC_REQ: u8 = 2;
pub const STYPE_REASSOC_RESP: u8 = 3;
pub const STYPE_PROBE_REQ: u8 = 4;
pub const STYPE_PROBE_RESP: u8 = 5;
pub const STYPE_BEACON: u8 = 8;
pub const STYPE_ATIM: u8 = 9;
pub const STYPE_DISASSOC: u8 = 10;
pub const STYPE_AUTH: u8 = 11;
pub const STYPE_DEAUTH: u8 = 12;
pub const STYPE_ACTION: u8 = 13;

pub const STYPE_PSPOLL: u8 = 10;
pub const STYPE_RTS: u8 = 11;
pub const STYPE_CTS: u8 = 12;
pub const STYPE_ACK: u8 = 13;
pub const STYPE_CFEND: u8 = 14;
pub const STYPE_CFENDACK: u8 = 15;

pub const STYPE_DATA: u8 = 0;
pub const STYPE_DATA_CFACK: u8 = 1;
pub const STYPE_DATA_CFPOLL: u8 = 2;
pub const STYPE_DATA_CFACKPOLL: u8 = 3;
pub const STYPE_NULLFUNC: u8 = 4;
pub const STYPE_CFACK: u8 = 5;
pub const STYPE_CFPOLL: u8 = 6;
pub const STYPE_CFACKPOLL: u8 = 7;
pub const STYPE_QOS_DATA: u8 = 8;
pub const STYPE_QOS_DATA_CFACK: u8 = 9;
pub const STYPE_QOS_DATA_CFPOLL: u8 = 10;
pub const STYPE_QOS_DATA_CFACKPOLL: u8 = 11;
pub const STYPE_QOS_NULL: u8 = 12;
pub const STYPE_QOS_CFPOLL: u8 = 14;
pub const STYPE_QOS_CFACKPOLL: u8 = 15;

/// IEEE 802.11 frame types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameType {
    /// Management frames (beacon, probe, auth, etc.)
    Management = 0,
    /// Control frames (RTS, CTS, ACK, etc.)
    Control = 1,
    /// Data frames
    Data = 2,
    /// Extension frames
    Extension = 3,
}

impl FrameType {
    fn from_bits(bits: u16) -> Self {
        match bits & 0x3 {
            0 => FrameType::Management,
            1 => FrameType::Control,
            2 => FrameType::Data,
            _ => FrameType::Extension,
        }
    }
}

/// Frame control field, host order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameControl(pub u16);

impl FrameControl {
    pub const TODS: u16 = 0x0100;
    pub const FROMDS: u16 = 0x0200;

    /// Read the little-endian frame control field at the start of `hdr`.
    pub fn parse(hdr: &[u8]) -> Option<Self> {
        match hdr {
            [lo, hi, ..] => Some(Self(u16::from_le_bytes([*lo, *hi]))),
            _ => None,
        }
    }

    pub fn frame_type(&self) -> FrameType {
        FrameType::from_bits(self.0 >> 2)
    }

    pub fn subtype(&self) -> u8 {
        ((self.0 >> 4) & 0xf) as u8
    }

    pub fn to_ds(&self) -> bool {
        self.0 & Self::TODS != 0
    }

    pub fn from_ds(&self) -> bool {
        self.0 & Self::FROMDS != 0
    }
}

impl fmt::Display for FrameControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:04x})", fc2str(self.0), self.0)
    }
}

/// Borrow the MAC address at `offset`, if the header holds it.
fn mac_addr(hdr: &[u8], offset: usize) -> Option<&[u8; ETH_ALEN]> {
    hdr.get(offset..offset + ETH_ALEN)?.try_into().ok()
}

/// Find the BSSID address field of a raw MAC header.
///
/// Returns `None` when the header is too short or the BSSID has no fixed
/// position (data frames with neither DS bit set, control frames other than
/// PS-Poll).
pub fn get_hdr_bssid(hdr: &[u8]) -> Option<&[u8; ETH_ALEN]> {
    if hdr.len() < MIN_HDR_LEN {
        return None;
    }

    let fc = FrameControl::parse(hdr)?;
    match fc.frame_type() {
        FrameType::Data => {
            if hdr.len() < THREE_ADDR_HDR_LEN {
                return None;
            }
            match (fc.to_ds(), fc.from_ds()) {
                (true, _) => mac_addr(hdr, ADDR1_OFFSET),
                (false, true) => mac_addr(hdr, ADDR2_OFFSET),
                (false, false) => None,
            }
        }
        FrameType::Control => {
            if fc.subtype() != STYPE_PSPOLL {
                return None;
            }
            mac_addr(hdr, ADDR1_OFFSET)
        }
        FrameType::Management => mac_addr(hdr, ADDR3_OFFSET),
        FrameType::Extension => None,
    }
}

/// Name of the frame type/subtype encoded in a frame control value.
pub fn fc2str(fc: u16) -> &'static str {
    let fc = FrameControl(fc);
    let stype = fc.subtype();

    let name = match fc.frame_type() {
        FrameType::Management => match stype {
            STYPE_ASSOC_REQ => Some("WLAN_FC_STYPE_ASSOC_REQ"),
            STYPE_ASSOC_RESP => Some("WLAN_FC_STYPE_ASSOC_RESP"),
            STYPE_REASSOC_REQ => Some("WLAN_FC_STYPE_REASSOC_REQ"),
            STYPE_REASSOC_RESP => Some("WLAN_FC_STYPE_REASSOC_RESP"),
            STYPE_PROBE_REQ => Some("WLAN_FC_STYPE_PROBE_REQ"),
            STYPE_PROBE_RESP => Some("WLAN_FC_STYPE_PROBE_RESP"),
            STYPE_BEACON => Some("WLAN_FC_STYPE_BEACON"),
            STYPE_ATIM => Some("WLAN_FC_STYPE_ATIM"),
            STYPE_DISASSOC => Some("WLAN_FC_STYPE_DISASSOC"),
            STYPE_AUTH => Some("WLAN_FC_STYPE_AUTH"),
            STYPE_DEAUTH => Some("WLAN_FC_STYPE_DEAUTH"),
            STYPE_ACTION => Some("WLAN_FC_STYPE_ACTION"),
            _ => None,
        },
        FrameType::Control => match stype {
            STYPE_PSPOLL => Some("WLAN_FC_STYPE_PSPOLL"),
            STYPE_RTS => Some("WLAN_FC_STYPE_RTS"),
            STYPE_CTS => Some("WLAN_FC_STYPE_CTS"),
            STYPE_ACK => Some("WLAN_FC_STYPE_ACK"),
            STYPE_CFEND => Some("WLAN_FC_STYPE_CFEND"),
            STYPE_CFENDACK => Some("WLAN_FC_STYPE_CFENDACK"),
            _ => None,
        },
        FrameType::Data => match stype {
            STYPE_DATA => Some("WLAN_FC_STYPE_DATA"),
            STYPE_DATA_CFACK => Some("WLAN_FC_STYPE_DATA_CFACK"),
            STYPE_DATA_CFPOLL => Some("WLAN_FC_STYPE_DATA_CFPOLL"),
            STYPE_DATA_CFACKPOLL => Some("WLAN_FC_STYPE_DATA_CFACKPOLL"),
            STYPE_NULLFUNC => Some("WLAN_FC_STYPE_NULLFUNC"),
            STYPE_CFACK => Some("WLAN_FC_STYPE_CFACK"),
            STYPE_CFPOLL => Some("WLAN_FC_STYPE_CFPOLL"),
            STYPE_CFACKPOLL => Some("WLAN_FC_STYPE_CFACKPOLL"),
            STYPE_QOS_DATA => Some("WLAN_FC_STYPE_QOS_DATA"),
            STYPE_QOS_DATA_CFACK => Some("WLAN_FC_STYPE_QOS_DATA_CFACK"),
            STYPE_QOS_DATA_CFPOLL => Some("WLAN_FC_STYPE_QOS_DATA_CFPOLL"),
            STYPE_QOS_DATA_CFACKPOLL => Some("WLAN_FC_STYPE_QOS_DATA_CFACKPOLL"),
            STYPE_QOS_NULL => Some("WLAN_FC_STYPE_QOS_NULL"),
            STYPE_QOS_CFPOLL => Some("WLAN_FC_STYPE_QOS_CFPOLL"),
            STYPE_QOS_CFACKPOLL => Some("WLAN_FC_STYPE_QOS_CFACKPOLL"),
            _ => None,
        },
        FrameType::Extension => None,
    };

    name.unwrap_or("WLAN_FC_TYPE_UNKNOWN")
}

/// Format a MAC address as colon separated hex
pub fn mac_to_string(addr: &[u8; ETH_ALEN]) -> String {
    format!(
        "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        addr[0], addr[1], addr[2], addr[3], addr[4], addr[5]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR1: [u8; 6] = [0x11; 6];
    const ADDR2: [u8; 6] = [0x22; 6];
    const ADDR3: [u8; 6] = [0x33; 6];

    fn header(fc: u16) -> Vec<u8> {
        let mut hdr = fc.to_le_bytes().to_vec();
        hdr.extend_from_slice(&[0, 0]); // duration
        hdr.extend_from_slice(&ADDR1);
        hdr.extend_from_slice(&ADDR2);
        hdr.extend_from_slice(&ADDR3);
        hdr.extend_from_slice(&[0x10, 0x00]); // sequence control
        hdr
    }

    fn fc(frame_type: u16, subtype: u16) -> u16 {
        (frame_type << 2) | (subtype << 4)
    }

    #[test]
    fn test_frame_control() {
        let fc = FrameControl::parse(&[0x88, 0x01]).unwrap();
        assert_eq!(fc.frame_type(), FrameType::Data);
        assert_eq!(fc.subtype(), STYPE_QOS_DATA);
        assert!(fc.to_ds());
        assert!(!fc.from_ds());
        assert!(FrameControl::parse(&[0x80]).is_none());
    }

    #[test]
    fn test_short_header() {
        for len in 0..MIN_HDR_LEN {
            assert_eq!(get_hdr_bssid(&vec![0u8; len]), None);
        }
    }

    #[test]
    fn test_management_uses_addr3() {
        for ds in [0, FrameControl::TODS, FrameControl::FROMDS, FrameControl::TODS | FrameControl::FROMDS] {
            for stype in [STYPE_BEACON, STYPE_PROBE_RESP, STYPE_AUTH] {
                let hdr = header(fc(0, stype as u16) | ds);
                assert_eq!(get_hdr_bssid(&hdr), Some(&ADDR3));
            }
        }
    }

    #[test]
    fn test_management_without_addr3() {
        let hdr = header(fc(0, STYPE_BEACON as u16));
        assert_eq!(get_hdr_bssid(&hdr[..20]), None);
    }

    #[test]
    fn test_data_frames() {
        let to_ds = header(fc(2, 0) | FrameControl::TODS);
        assert_eq!(get_hdr_bssid(&to_ds), Some(&ADDR1));

        let wds = header(fc(2, 0) | FrameControl::TODS | FrameControl::FROMDS);
        assert_eq!(get_hdr_bssid(&wds), Some(&ADDR1));

        let from_ds = header(fc(2, 8) | FrameControl::FROMDS);
        assert_eq!(get_hdr_bssid(&from_ds), Some(&ADDR2));

        let ibss = header(fc(2, 0));
        assert_eq!(get_hdr_bssid(&ibss), None);

        // Data frames need the full three address header
        assert_eq!(get_hdr_bssid(&to_ds[..20]), None);
    }

    #[test]
    fn test_control_frames() {
        let ps_poll = header(fc(1, STYPE_PSPOLL as u16));
        assert_eq!(get_hdr_bssid(&ps_poll[..16]), Some(&ADDR1));

        let rts = header(fc(1, STYPE_RTS as u16));
        assert_eq!(get_hdr_bssid(&rts[..16]), None);
    }

    #[test]
    fn test_extension_frames() {
        let hdr = header(fc(3, 0));
        assert_eq!(get_hdr_bssid(&hdr), None);
    }

    #[test]
    fn test_bssid_borrows_header() {
        let hdr = header(fc(0, STYPE_BEACON as u16));
        let bssid = get_hdr_bssid(&hdr).unwrap();
        assert_eq!(bssid.as_ptr(), hdr[16..].as_ptr());
    }

    #[test]
    fn test_fc2str() {
        assert_eq!(fc2str(0x0080), "WLAN_FC_STYPE_BEACON");
        assert_eq!(fc2str(0x00a4), "WLAN_FC_STYPE_PSPOLL");
        assert_eq!(fc2str(0x0088), "WLAN_FC_STYPE_QOS_DATA");
        assert_eq!(fc2str(0x00e0), "WLAN_FC_TYPE_UNKNOWN");
        assert_eq!(fc2str(0x000c), "WLAN_FC_TYPE_UNKNOWN");
        assert_eq!(
            FrameControl(0x0080).to_string(),
            "WLAN_FC_STYPE_BEACON (0x0080)"
        );
    }

    #[test]
    fn test_mac_to_string() {
        assert_eq!(mac_to_string(&[0x00, 0x25, 0x00, 0xff, 0x94, 0x73]), "00:25:00:ff:94:73");
    }
}
