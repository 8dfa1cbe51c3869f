use crate::error::{Error, Result};
use crate::operation::OpKind;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A caller-declared weight for one operation kind, written `kind:weight`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MixEntry {
    pub kind: OpKind,
    pub weight: f64,
}

impl FromStr for MixEntry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, weight) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidProportion(format!("expected kind:weight, got {s:?}")))?;
        let weight = weight
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidProportion(format!("bad weight in {s:?}")))?;
        Ok(MixEntry { kind: kind.trim().parse()?, weight })
    }
}

impl Display for MixEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.weight)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mix {
    entries: Vec<MixEntry>,
}

impl Mix {
    /// Weights are not normalized; each must be finite and non-negative and
    /// each kind may appear once.
    pub fn new(entries: Vec<MixEntry>) -> Result<Self> {
        for (i, e) in entries.iter().enumerate() {
            if !e.weight.is_finite() || e.weight < 0.0 {
                return Err(Error::InvalidProportion(format!("{e}: weight must be >= 0")));
            }
            if entries[..i].iter().any(|prev| prev.kind == e.kind) {
                return Err(Error::InvalidProportion(format!("{} listed twice", e.kind)));
            }
        }
        Ok(Mix { entries })
    }

    /// `floor(total * weight)` per kind, in entry order. The counts need not
    /// add up to `total` when the weights do not split it evenly.
    pub fn counts(&self, total: u64) -> Result<Vec<(OpKind, u64)>> {
        self.entries
            .iter()
            .map(|e| Ok((e.kind, share(total, e.weight)?)))
            .collect()
    }
}

/// `floor(total * weight)`, rejected when it does not fit a `u64`.
pub fn share(total: u64, weight: f64) -> Result<u64> {
    let count = (total as f64 * weight).floor();
    if count >= u64::MAX as f64 {
        return Err(Error::InvalidProportion(format!(
            "weight {weight} of {total} operations overflows"
        )));
    }
    Ok(count as u64)
}
