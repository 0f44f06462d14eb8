//! Vendor-specific element dispatch
//!
//! A vendor-specific element body starts with a 3-byte OUI followed by a
//! vendor defined type byte. The OUI is checked first, so sub-type values of
//! different vendors never collide.

use log::Level;
use serde::Serialize;

use crate::diag::{diag, DiagSink};
use crate::elems::Elements;

/// Microsoft (also used for WPA, WMM and WPS)
pub const OUI_MICROSOFT: u32 = 0x0050f2;
/// Wi-Fi Alliance
pub const OUI_WFA: u32 = 0x506f9a;
/// Broadcom
pub const OUI_BROADCOM: u32 = 0x00904c;

// Microsoft OUI types
pub const WPA_OUI_TYPE: u8 = 1;
pub const WMM_OUI_TYPE: u8 = 2;
pub const WPS_OUI_TYPE: u8 = 4;

// WMM OUI subtypes
pub const WMM_OUI_SUBTYPE_INFORMATION_ELEMENT: u8 = 0;
pub const WMM_OUI_SUBTYPE_PARAMETER_ELEMENT: u8 = 1;
pub const WMM_OUI_SUBTYPE_TSPEC_ELEMENT: u8 = 2;

// Wi-Fi Alliance OUI types
pub const P2P_OUI_TYPE: u8 = 9;
pub const WFD_OUI_TYPE: u8 = 10;
pub const HS20_INDICATION_OUI_TYPE: u8 = 16;
pub const HS20_OSEN_OUI_TYPE: u8 = 18;

// Broadcom OUI types
pub const VENDOR_HT_CAPAB_OUI_TYPE: u8 = 0x33;
pub const VENDOR_VHT_TYPE: u8 = 0x04;
pub const VENDOR_VHT_SUBTYPE: u8 = 0x08;
pub const VENDOR_VHT_SUBTYPE2: u8 = 0x18;

/// Combined OUI and type value, as matched by
/// [`ieee802_11_vendor_ie_concat`](crate::elems::ieee802_11_vendor_ie_concat).
pub const fn oui_type(oui: u32, oui_type: u8) -> u32 {
    (oui << 8) | oui_type as u32
}

pub const WPA_IE_VENDOR_TYPE: u32 = oui_type(OUI_MICROSOFT, WPA_OUI_TYPE);
pub const WPS_IE_VENDOR_TYPE: u32 = oui_type(OUI_MICROSOFT, WPS_OUI_TYPE);
pub const P2P_IE_VENDOR_TYPE: u32 = oui_type(OUI_WFA, P2P_OUI_TYPE);
pub const WFD_IE_VENDOR_TYPE: u32 = oui_type(OUI_WFA, WFD_OUI_TYPE);
pub const HS20_IE_VENDOR_TYPE: u32 = oui_type(OUI_WFA, HS20_INDICATION_OUI_TYPE);
pub const OSEN_IE_VENDOR_TYPE: u32 = oui_type(OUI_WFA, HS20_OSEN_OUI_TYPE);

/// WMM element, classified by its OUI subtype.
///
/// Both variants borrow the full vendor body starting at the OUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "body")]
pub enum Wmm<'a> {
    Information(&'a [u8]),
    Parameter(&'a [u8]),
}

impl<'a> Wmm<'a> {
    /// Raw body including OUI, type and subtype
    pub fn body(&self) -> &'a [u8] {
        match *self {
            Wmm::Information(body) | Wmm::Parameter(body) => body,
        }
    }

    /// Check if this is a WMM parameter element
    pub fn is_parameter(&self) -> bool {
        matches!(self, Wmm::Parameter(_))
    }
}

/// Classify a vendor-specific element body and record it in `elems`.
///
/// Returns `false` if the content was not recognized; `elems` is left
/// untouched in that case. Never fails the enclosing element walk.
pub fn parse_vendor_specific<'a>(
    pos: &'a [u8],
    elems: &mut Elements<'a>,
    show_errors: bool,
    sink: &dyn DiagSink,
) -> bool {
    // OUI (3 bytes) + vendor type (1 byte)
    if pos.len() < 4 {
        diag!(
            sink,
            show_errors,
            Level::Trace,
            "short vendor specific information element ignored (len={})",
            pos.len()
        );
        return false;
    }

    let oui = u32::from_be_bytes([0, pos[0], pos[1], pos[2]]);
    let elen = pos.len();
    match oui {
        OUI_MICROSOFT => match pos[3] {
            WPA_OUI_TYPE => elems.wpa_ie = Some(pos),
            WMM_OUI_TYPE => {
                if elen < 5 {
                    diag!(
                        sink,
                        show_errors,
                        Level::Trace,
                        "short WMM information element ignored (len={})",
                        elen
                    );
                    return false;
                }
                match pos[4] {
                    WMM_OUI_SUBTYPE_INFORMATION_ELEMENT => {
                        elems.wmm = Some(Wmm::Information(pos))
                    }
                    WMM_OUI_SUBTYPE_PARAMETER_ELEMENT => elems.wmm = Some(Wmm::Parameter(pos)),
                    WMM_OUI_SUBTYPE_TSPEC_ELEMENT => elems.wmm_tspec = Some(pos),
                    subtype => {
                        diag!(
                            sink,
                            show_errors,
                            Level::Trace,
                            "unknown WMM information element ignored (subtype={} len={})",
                            subtype,
                            elen
                        );
                        return false;
                    }
                }
            }
            WPS_OUI_TYPE => elems.wps_ie = Some(pos),
            other => {
                diag!(
                    sink,
                    show_errors,
                    Level::Trace,
                    "Unknown Microsoft information element ignored (type={} len={})",
                    other,
                    elen
                );
                return false;
            }
        },

        OUI_WFA => match pos[3] {
            P2P_OUI_TYPE => elems.p2p = Some(pos),
            WFD_OUI_TYPE => elems.wfd = Some(pos),
            HS20_INDICATION_OUI_TYPE => elems.hs20 = Some(pos),
            HS20_OSEN_OUI_TYPE => elems.osen = Some(pos),
            other => {
                diag!(
                    sink,
                    show_errors,
                    Level::Trace,
                    "Unknown WFA information element ignored (type={} len={})",
                    other,
                    elen
                );
                return false;
            }
        },

        OUI_BROADCOM => match pos[3] {
            VENDOR_HT_CAPAB_OUI_TYPE => elems.vendor_ht_cap = Some(pos),
            VENDOR_VHT_TYPE => {
                if elen > 4 && matches!(pos[4], VENDOR_VHT_SUBTYPE | VENDOR_VHT_SUBTYPE2) {
                    elems.vendor_vht = Some(pos);
                } else {
                    return false;
                }
            }
            other => {
                diag!(
                    sink,
                    show_errors,
                    Level::Trace,
                    "Unknown Broadcom information element ignored (type={} len={})",
                    other,
                    elen
                );
                return false;
            }
        },

        _ => {
            diag!(
                sink,
                show_errors,
                Level::Trace,
                "unknown vendor specific information element ignored (vendor OUI {:02x}:{:02x}:{:02x} len={})",
                pos[0],
                pos[1],
                pos[2],
                elen
            );
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::{CaptureSink, NullSink};

    fn classify(body: &[u8]) -> (bool, Elements<'_>) {
        let mut elems = Elements::default();
        let recognized = parse_vendor_specific(body, &mut elems, true, &NullSink);
        (recognized, elems)
    }

    #[test]
    fn test_oui_type() {
        assert_eq!(WPA_IE_VENDOR_TYPE, 0x0050f201);
        assert_eq!(WPS_IE_VENDOR_TYPE, 0x0050f204);
        assert_eq!(P2P_IE_VENDOR_TYPE, 0x506f9a09);
    }

    #[test]
    fn test_short_vendor_element() {
        let sink = CaptureSink::new();
        let mut elems = Elements::default();
        let body = [0x00, 0x50, 0xf2];

        assert!(!parse_vendor_specific(&body, &mut elems, true, &sink));
        assert_eq!(elems, Elements::default());

        let messages = sink.take();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].1.contains("len=3"));
    }

    #[test]
    fn test_short_vendor_element_quiet() {
        let sink = CaptureSink::new();
        let mut elems = Elements::default();

        assert!(!parse_vendor_specific(&[0x00], &mut elems, false, &sink));
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_microsoft_wpa() {
        let body = [0x00, 0x50, 0xf2, 0x01, 0x01, 0x00];
        let (recognized, elems) = classify(&body);
        assert!(recognized);
        assert_eq!(elems.wpa_ie, Some(&body[..]));
    }

    #[test]
    fn test_microsoft_wps() {
        let body = [0x00, 0x50, 0xf2, 0x04, 0x10, 0x4a, 0x00, 0x01, 0x10];
        let (recognized, elems) = classify(&body);
        assert!(recognized);
        assert_eq!(elems.wps_ie, Some(&body[..]));
    }

    #[test]
    fn test_wmm_information_and_parameter() {
        let info = [0x00, 0x50, 0xf2, 0x02, 0x00, 0x01, 0x00];
        let (recognized, elems) = classify(&info);
        assert!(recognized);
        assert_eq!(elems.wmm, Some(Wmm::Information(&info[..])));
        assert!(!elems.wmm.unwrap().is_parameter());

        let mut param = vec![0x00, 0x50, 0xf2, 0x02, 0x01, 0x01, 0x80, 0x00];
        param.extend_from_slice(&[0u8; 16]);
        let (recognized, elems) = classify(&param);
        assert!(recognized);
        let wmm = elems.wmm.unwrap();
        assert!(wmm.is_parameter());
        assert_eq!(wmm.body(), &param[..]);
    }

    #[test]
    fn test_wmm_tspec() {
        let body = [0x00, 0x50, 0xf2, 0x02, 0x02, 0x01];
        let (recognized, elems) = classify(&body);
        assert!(recognized);
        assert_eq!(elems.wmm_tspec, Some(&body[..]));
        assert!(elems.wmm.is_none());
    }

    #[test]
    fn test_wmm_too_short() {
        let (recognized, elems) = classify(&[0x00, 0x50, 0xf2, 0x02]);
        assert!(!recognized);
        assert!(elems.wmm.is_none());
    }

    #[test]
    fn test_wmm_unknown_subtype() {
        let (recognized, elems) = classify(&[0x00, 0x50, 0xf2, 0x02, 0x07]);
        assert!(!recognized);
        assert_eq!(elems, Elements::default());
    }

    #[test]
    fn test_microsoft_unknown_type() {
        let (recognized, _) = classify(&[0x00, 0x50, 0xf2, 0x11, 0x00]);
        assert!(!recognized);
    }

    #[test]
    fn test_wfa_types() {
        let p2p = [0x50, 0x6f, 0x9a, 0x09, 0x02, 0x02, 0x00, 0x25, 0x00];
        let (recognized, elems) = classify(&p2p);
        assert!(recognized);
        assert_eq!(elems.p2p, Some(&p2p[..]));

        let wfd = [0x50, 0x6f, 0x9a, 0x0a, 0x00];
        assert_eq!(classify(&wfd).1.wfd, Some(&wfd[..]));

        let hs20 = [0x50, 0x6f, 0x9a, 0x10, 0x10];
        assert_eq!(classify(&hs20).1.hs20, Some(&hs20[..]));

        let osen = [0x50, 0x6f, 0x9a, 0x12, 0x01];
        assert_eq!(classify(&osen).1.osen, Some(&osen[..]));

        assert!(!classify(&[0x50, 0x6f, 0x9a, 0x7f]).0);
    }

    #[test]
    fn test_broadcom_ht_capab() {
        let body = [0x00, 0x90, 0x4c, 0x33, 0x2c, 0x01];
        let (recognized, elems) = classify(&body);
        assert!(recognized);
        assert_eq!(elems.vendor_ht_cap, Some(&body[..]));
    }

    #[test]
    fn test_broadcom_vht() {
        let body = [0x00, 0x90, 0x4c, 0x04, 0x08, 0xbf, 0x0c];
        let (recognized, elems) = classify(&body);
        assert!(recognized);
        assert_eq!(elems.vendor_vht, Some(&body[..]));

        let body2 = [0x00, 0x90, 0x4c, 0x04, 0x18, 0xbf, 0x0c];
        assert_eq!(classify(&body2).1.vendor_vht, Some(&body2[..]));
    }

    #[test]
    fn test_broadcom_vht_rejected() {
        // Matching OUI and type, but no subtype byte
        let (recognized, elems) = classify(&[0x00, 0x90, 0x4c, 0x04]);
        assert!(!recognized);
        assert!(elems.vendor_vht.is_none());

        let (recognized, elems) = classify(&[0x00, 0x90, 0x4c, 0x04, 0x09]);
        assert!(!recognized);
        assert!(elems.vendor_vht.is_none());
    }

    #[test]
    fn test_unknown_oui_reports_bytes() {
        let sink = CaptureSink::new();
        let mut elems = Elements::default();
        let body = [0x00, 0x17, 0xf2, 0x08, 0x00];

        assert!(!parse_vendor_specific(&body, &mut elems, true, &sink));
        let messages = sink.take();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].1.contains("00:17:f2"));
        assert!(messages[0].1.contains("len=5"));
    }
}
