//! WMM access category parameters
//!
//! Per-AC EDCA settings and the `wmm_ac_<ac>_<field>` configuration keys
//! that update them.

use serde::{Deserialize, Serialize};

use crate::{ElemsError, Result};

/// Length of the `wmm_ac_` / `wme_ac_` key prefix
const KEY_PREFIX_LEN: usize = 7;

/// WMM access categories, in parameter table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum WmmAc {
    /// Best effort
    Be = 0,
    /// Background
    Bk = 1,
    /// Video
    Vi = 2,
    /// Voice
    Vo = 3,
}

impl WmmAc {
    pub const ALL: [WmmAc; 4] = [WmmAc::Be, WmmAc::Bk, WmmAc::Vi, WmmAc::Vo];

    /// Index into a parameter table
    pub fn index(self) -> usize {
        self as usize
    }

    /// Get AC name as used in configuration keys
    pub fn name(&self) -> &'static str {
        match self {
            WmmAc::Be => "be",
            WmmAc::Bk => "bk",
            WmmAc::Vi => "vi",
            WmmAc::Vo => "vo",
        }
    }

    /// Split a leading `<ac>_` off a key, returning the AC and the rest.
    fn strip_from(key: &str) -> Option<(Self, &str)> {
        Self::ALL.into_iter().find_map(|ac| {
            key.strip_prefix(ac.name())
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|rest| (ac, rest))
        })
    }
}

/// EDCA parameters of one access category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WmmAcParams {
    /// Arbitration inter-frame space number
    pub aifs: u8,
    /// Exponent of the minimum contention window
    pub cwmin: u8,
    /// Exponent of the maximum contention window
    pub cwmax: u8,
    /// TXOP limit in units of 32 microseconds
    pub txop_limit: u16,
    pub admission_control_mandatory: bool,
}

fn parse_value(field: &str, val: &str) -> Result<i64> {
    val.trim().parse::<i64>().map_err(|e| {
        log::error!("Invalid {} value '{}'", field, val);
        ElemsError::Parse(format!("{} value '{}': {}", field, val, e))
    })
}

fn check_range(label: &str, value: i64, min: i64, max: i64) -> Result<i64> {
    if value < min || value > max {
        log::error!("Invalid {} value {}", label, value);
        return Err(ElemsError::InvalidParameter(format!(
            "{} value {} outside {}..={}",
            label, value, min, max
        )));
    }
    Ok(value)
}

/// Apply one `wmm_ac_<be|bk|vi|vo>_<field>` setting to `params`.
///
/// The first seven characters of `name` are skipped without inspection, so
/// both `wmm_ac_` and `wme_ac_` keys are accepted. Recognized fields are
/// `aifs` (1..=255), `cwmin` and `cwmax` (0..=12), `txop_limit` (0..=65535)
/// and `acm` (0 or 1). On error `params` is left unchanged.
pub fn hostapd_config_wmm_ac(params: &mut [WmmAcParams; 4], name: &str, val: &str) -> Result<()> {
    let key = name.get(KEY_PREFIX_LEN..).unwrap_or_default();
    let Some((ac, field)) = WmmAc::strip_from(key) else {
        log::error!("Unknown WMM name '{}'", key);
        return Err(ElemsError::InvalidParameter(format!(
            "unknown WMM name '{}'",
            name
        )));
    };

    let entry = &mut params[ac.index()];
    match field {
        "aifs" => {
            let v = check_range("AIFS", parse_value(field, val)?, 1, 255)?;
            entry.aifs = v as u8;
        }
        "cwmin" => {
            let v = check_range("cwMin", parse_value(field, val)?, 0, 12)?;
            entry.cwmin = v as u8;
        }
        "cwmax" => {
            let v = check_range("cwMax", parse_value(field, val)?, 0, 12)?;
            entry.cwmax = v as u8;
        }
        "txop_limit" => {
            let v = check_range("txop", parse_value(field, val)?, 0, 0xffff)?;
            entry.txop_limit = v as u16;
        }
        "acm" => {
            let v = check_range("acm", parse_value(field, val)?, 0, 1)?;
            entry.admission_control_mandatory = v == 1;
        }
        _ => {
            log::error!("Unknown wmm_ac_ field '{}'", field);
            return Err(ElemsError::InvalidParameter(format!(
                "unknown wmm_ac_ field '{}'",
                field
            )));
        }
    }

    log::debug!("WMM AC {} {} = {}", ac.name(), field, val);
    Ok(())
}
