//! Information element walker
//!
//! Walks a flat sequence of `(id, length, value)` elements, bounds checks
//! each declared length against the bytes that remain, and records a
//! borrowed reference to the value of every recognized element.

use bytes::{BufMut, BytesMut};
use log::Level;
use serde::Serialize;

use crate::diag::{diag, DiagSink, LogSink};
use crate::element::{ElementKind, Header, Id};
use crate::vendor::{self, Wmm};
use crate::{hex_dump, ElemsError, Result};

/// Outcome of an element walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseRes {
    /// Every element was well formed and recognized
    Ok,
    /// Well formed, but at least one element was not recognized
    Unknown,
    /// The element stream is malformed
    Failed,
}

impl ParseRes {
    /// Get result name
    pub fn name(&self) -> &'static str {
        match self {
            ParseRes::Ok => "ok",
            ParseRes::Unknown => "unknown",
            ParseRes::Failed => "failed",
        }
    }

    /// Check if the stream was structurally valid
    pub fn is_well_formed(&self) -> bool {
        !matches!(self, ParseRes::Failed)
    }
}

/// References to the elements found in one buffer.
///
/// Every field borrows the element value from the buffer passed to
/// [`parse_elems`]; vendor fields borrow the vendor body starting at the OUI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Elements<'a> {
    pub ssid: Option<&'a [u8]>,
    pub supp_rates: Option<&'a [u8]>,
    pub ds_params: Option<&'a [u8]>,
    pub challenge: Option<&'a [u8]>,
    pub erp_info: Option<&'a [u8]>,
    pub ext_supp_rates: Option<&'a [u8]>,
    pub wpa_ie: Option<&'a [u8]>,
    pub rsn_ie: Option<&'a [u8]>,
    pub wmm: Option<Wmm<'a>>,
    pub wmm_tspec: Option<&'a [u8]>,
    pub wps_ie: Option<&'a [u8]>,
    pub supp_channels: Option<&'a [u8]>,
    pub mdie: Option<&'a [u8]>,
    pub ftie: Option<&'a [u8]>,
    pub timeout_int: Option<&'a [u8]>,
    pub ht_capabilities: Option<&'a [u8]>,
    pub ht_operation: Option<&'a [u8]>,
    pub mesh_config: Option<&'a [u8]>,
    pub mesh_id: Option<&'a [u8]>,
    pub peer_mgmt: Option<&'a [u8]>,
    pub vht_capabilities: Option<&'a [u8]>,
    pub vht_operation: Option<&'a [u8]>,
    pub vht_opmode_notif: Option<&'a [u8]>,
    pub vendor_ht_cap: Option<&'a [u8]>,
    pub vendor_vht: Option<&'a [u8]>,
    pub p2p: Option<&'a [u8]>,
    pub wfd: Option<&'a [u8]>,
    pub link_id: Option<&'a [u8]>,
    pub interworking: Option<&'a [u8]>,
    pub qos_map_set: Option<&'a [u8]>,
    pub hs20: Option<&'a [u8]>,
    pub ext_capab: Option<&'a [u8]>,
    pub bss_max_idle_period: Option<&'a [u8]>,
    pub ssid_list: Option<&'a [u8]>,
    pub osen: Option<&'a [u8]>,
    pub afn: Option<&'a [u8]>,
    pub ampe: Option<&'a [u8]>,
    pub mic: Option<&'a [u8]>,
}

impl<'a> Elements<'a> {
    /// Slot for a plain element kind, `None` for kinds that are not stored
    /// directly (vendor, ignored and unknown elements).
    fn slot(&mut self, kind: ElementKind) -> Option<&mut Option<&'a [u8]>> {
        let slot = match kind {
            ElementKind::Ssid => &mut self.ssid,
            ElementKind::SuppRates => &mut self.supp_rates,
            ElementKind::DsParams => &mut self.ds_params,
            ElementKind::Challenge => &mut self.challenge,
            ElementKind::ErpInfo => &mut self.erp_info,
            ElementKind::ExtSuppRates => &mut self.ext_supp_rates,
            ElementKind::Rsn => &mut self.rsn_ie,
            ElementKind::SupportedChannels => &mut self.supp_channels,
            ElementKind::MobilityDomain => &mut self.mdie,
            ElementKind::FastBssTransition => &mut self.ftie,
            ElementKind::TimeoutInterval => &mut self.timeout_int,
            ElementKind::HtCap => &mut self.ht_capabilities,
            ElementKind::HtOperation => &mut self.ht_operation,
            ElementKind::MeshConfig => &mut self.mesh_config,
            ElementKind::MeshId => &mut self.mesh_id,
            ElementKind::PeerMgmt => &mut self.peer_mgmt,
            ElementKind::VhtCap => &mut self.vht_capabilities,
            ElementKind::VhtOperation => &mut self.vht_operation,
            ElementKind::VhtOpmodeNotif => &mut self.vht_opmode_notif,
            ElementKind::LinkId => &mut self.link_id,
            ElementKind::Interworking => &mut self.interworking,
            ElementKind::QosMapSet => &mut self.qos_map_set,
            ElementKind::ExtCapab => &mut self.ext_capab,
            ElementKind::BssMaxIdlePeriod => &mut self.bss_max_idle_period,
            ElementKind::SsidList => &mut self.ssid_list,
            ElementKind::NotificationIndicator => &mut self.afn,
            ElementKind::Ampe => &mut self.ampe,
            ElementKind::Mic => &mut self.mic,
            ElementKind::CfParams
            | ElementKind::Tim
            | ElementKind::PwrCapability
            | ElementKind::VendorSpecific
            | ElementKind::Unknown(_) => return None,
        };
        Some(slot)
    }

    /// Check if no element was recorded
    pub fn is_empty(&self) -> bool {
        *self == Elements::default()
    }
}

/// Parse information elements in a management frame body.
///
/// Diagnostics, if `show_errors` is set, go to the `log` facade.
pub fn parse_elems(ies: &[u8], show_errors: bool) -> (Elements<'_>, ParseRes) {
    parse_elems_with_sink(ies, show_errors, &LogSink)
}

/// Parse information elements, reporting diagnostics through `sink`.
///
/// On [`ParseRes::Failed`] the returned set still holds every element that
/// was recorded before the malformed one.
pub fn parse_elems_with_sink<'a>(
    ies: &'a [u8],
    show_errors: bool,
    sink: &dyn DiagSink,
) -> (Elements<'a>, ParseRes) {
    let mut elems = Elements::default();
    let mut pos = ies;
    let mut unknown = 0usize;

    while let Some((header, rest)) = Header::parse(pos) {
        let elen = header.body_len as usize;
        if elen > rest.len() {
            diag!(
                sink,
                show_errors,
                Level::Debug,
                "IEEE 802.11 element parse failed (id={} elen={} left={})",
                header.id,
                elen,
                rest.len()
            );
            diag!(sink, show_errors, Level::Trace, "IEs: {}", hex_dump(ies));
            return (elems, ParseRes::Failed);
        }
        let (body, mut next) = rest.split_at(elen);

        let kind = ElementKind::from(header.id);
        match kind {
            ElementKind::VendorSpecific => {
                if !vendor::parse_vendor_specific(body, &mut elems, show_errors, sink) {
                    unknown += 1;
                }
            }
            _ if kind.is_unknown() => {
                unknown += 1;
                diag!(
                    sink,
                    show_errors,
                    Level::Trace,
                    "IEEE 802.11 element parse ignored unknown element (id={} elen={})",
                    header.id,
                    elen
                );
            }
            _ if kind.is_ignored() => {}
            _ => {
                if kind.accepts_len(elen) {
                    if let Some(slot) = elems.slot(kind) {
                        *slot = Some(body);
                    }
                }
                // Everything after the MIC is encrypted: its declared length
                // becomes the remaining budget, so the walk ends here.
                if kind == ElementKind::Mic {
                    next = &next[..0];
                }
            }
        }

        pos = next;
    }

    // A lone trailing byte cannot hold an element header
    if !pos.is_empty() {
        return (elems, ParseRes::Failed);
    }

    let res = if unknown > 0 { ParseRes::Unknown } else { ParseRes::Ok };
    (elems, res)
}

/// Count the well formed elements at the start of `ies`.
///
/// Counting stops at the first element whose length overruns the buffer.
pub fn ieee802_11_ie_count(ies: &[u8]) -> usize {
    let mut count = 0;
    let mut pos = ies;

    while let Some((header, _)) = Header::parse(pos) {
        let Some(next) = pos.get(header.element_len()..) else {
            break;
        };
        count += 1;
        pos = next;
    }

    count
}

/// Iterate `(id, body)` pairs. An element that overruns the buffer yields a
/// single `Err(())` and ends the iteration.
fn walk(ies: &[u8]) -> impl Iterator<Item = std::result::Result<(Id, &[u8]), ()>> + '_ {
    let mut pos = ies;
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        let (header, rest) = Header::parse(pos)?;
        let elen = header.body_len as usize;
        if elen > rest.len() {
            done = true;
            return Some(Err(()));
        }
        let (body, next) = rest.split_at(elen);
        pos = next;
        Some(Ok((header.id, body)))
    })
}

/// Vendor body whose OUI and type equal `oui_type`, minus those four bytes.
fn vendor_payload(id: Id, body: &[u8], oui_type: u32) -> Option<&[u8]> {
    if id != Id::VENDOR_SPECIFIC || body.len() < 4 {
        return None;
    }
    let tag = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
    if tag == oui_type {
        Some(&body[4..])
    } else {
        None
    }
}

/// Concatenate the payloads of every vendor-specific element matching
/// `oui_type` (OUI in the upper 24 bits, vendor type in the low byte).
///
/// Returns `None` if no element matches, or if the stream is malformed
/// before the first match. After a match, collection stops quietly at the
/// first malformed element.
pub fn ieee802_11_vendor_ie_concat(ies: &[u8], oui_type: u32) -> Option<BytesMut> {
    let mut elements = walk(ies);

    let first = loop {
        match elements.next()? {
            Ok((id, body)) => {
                if let Some(payload) = vendor_payload(id, body, oui_type) {
                    break payload;
                }
            }
            Err(()) => return None,
        }
    };

    let mut buf = BytesMut::with_capacity(ies.len());
    buf.put_slice(first);
    for (id, body) in elements.map_while(|element| element.ok()) {
        if let Some(payload) = vendor_payload(id, body, oui_type) {
            buf.put_slice(payload);
        }
    }

    Some(buf)
}

/// Check if a rate code is one of the 802.11b rates (1, 2, 5.5, 11 Mbps).
/// The basic rate flag (0x80) is not masked off.
fn is_11b(rate: u8) -> bool {
    matches!(rate, 0x02 | 0x04 | 0x0b | 0x16)
}

/// Check if the advertised rate sets contain only 802.11b rates.
///
/// Returns `false` when neither rate element is present or both are empty.
pub fn supp_rates_11b_only(elems: &Elements<'_>) -> bool {
    if elems.supp_rates.is_none() && elems.ext_supp_rates.is_none() {
        return false;
    }

    let mut rates = elems
        .supp_rates
        .into_iter()
        .chain(elems.ext_supp_rates)
        .flatten()
        .peekable();

    rates.peek().is_some() && rates.all(|&rate| is_11b(rate))
}

/// Build one element, for tests and tools that assemble frames.
///
/// Fails if `body` does not fit the one-byte length field.
pub fn build_element(id: Id, body: &[u8]) -> Result<Vec<u8>> {
    let body_len = u8::try_from(body.len()).map_err(|_| {
        ElemsError::InvalidParameter(format!(
            "element {} body of {} bytes exceeds {}",
            id,
            body.len(),
            u8::MAX
        ))
    })?;

    let header = Header { id, body_len };
    let mut element = Vec::with_capacity(header.element_len());
    element.push(id.0);
    element.push(body_len);
    element.extend_from_slice(body);
    Ok(element)
}
