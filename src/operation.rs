use crate::error::{Error, Result};
use crate::generator::MAX_VALUE;
use clap::ValueEnum;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One benchmark operation, one line of a workload file.
///
/// Point and range deletes share the `D` tag on the wire. A reader tells
/// them apart only by the number of integers after the tag: one is a
/// point delete, two is a range delete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Insert { key: u64, values: Vec<u32> },
    Query { key: u64 },
    Scan { start: u64, end: u64 },
    PointDelete { key: u64 },
    RangeDelete { start: u64, end: u64 },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum OpKind {
    Put,
    Get,
    Scan,
    Pdel,
    Rdel,
}

impl OpKind {
    pub const ALL: [OpKind; 5] = [OpKind::Put, OpKind::Get, OpKind::Scan, OpKind::Pdel, OpKind::Rdel];

    pub fn name(self) -> &'static str {
        match self {
            OpKind::Put => "put",
            OpKind::Get => "get",
            OpKind::Scan => "scan",
            OpKind::Pdel => "pdel",
            OpKind::Rdel => "rdel",
        }
    }
}

impl Display for OpKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OpKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OpKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| Error::InvalidProportion(format!("unknown operation kind {s:?}")))
    }
}

impl Operation {
    pub fn kind(&self) -> OpKind {
        match self {
            Operation::Insert { .. } => OpKind::Put,
            Operation::Query { .. } => OpKind::Get,
            Operation::Scan { .. } => OpKind::Scan,
            Operation::PointDelete { .. } => OpKind::Pdel,
            Operation::RangeDelete { .. } => OpKind::Rdel,
        }
    }

    /// Decodes one body line; `line` is only used for error reporting.
    /// Insert values must be below `MAX_VALUE` and ranges must have
    /// `start < end`.
    pub fn decode(text: &str, line: usize) -> Result<Self> {
        let mut fields = text.split(' ');
        let tag = fields.next().unwrap_or_default();
        let nums = fields
            .map(|f| {
                f.parse::<u64>()
                    .map_err(|_| Error::parse(line, format!("{f:?} is not an unsigned integer")))
            })
            .collect::<Result<Vec<u64>>>()?;

        let op = match (tag, nums.as_slice()) {
            ("I", [key, values @ ..]) => Operation::Insert {
                key: *key,
                values: values
                    .iter()
                    .map(|v| {
                        u32::try_from(*v)
                            .ok()
                            .filter(|v| *v < MAX_VALUE)
                            .ok_or_else(|| Error::parse(line, format!("value {v} out of range")))
                    })
                    .collect::<Result<_>>()?,
            },
            ("Q", [key]) => Operation::Query { key: *key },
            ("S" | "D", [start, end]) if start >= end => {
                return Err(Error::parse(line, format!("empty range {start}..{end}")));
            }
            ("S", [start, end]) => Operation::Scan { start: *start, end: *end },
            ("D", [key]) => Operation::PointDelete { key: *key },
            ("D", [start, end]) => Operation::RangeDelete { start: *start, end: *end },
            ("I" | "Q" | "S" | "D", _) => {
                return Err(Error::parse(
                    line,
                    format!("wrong number of fields ({}) for {tag}", nums.len()),
                ));
            }
            _ => return Err(Error::parse(line, format!("unknown operation tag {tag:?}"))),
        };
        Ok(op)
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Insert { key, values } => {
                write!(f, "I {key}")?;
                for v in values {
                    write!(f, " {v}")?;
                }
                Ok(())
            }
            Operation::Query { key } => write!(f, "Q {key}"),
            Operation::Scan { start, end } => write!(f, "S {start} {end}"),
            Operation::PointDelete { key } => write!(f, "D {key}"),
            Operation::RangeDelete { start, end } => write!(f, "D {start} {end}"),
        }
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Operation::decode(s, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_every_kind() {
        let cases = [
            (Operation::Insert { key: 4, values: vec![9, 1, 65534] }, "I 4 9 1 65534"),
            (Operation::Query { key: 17 }, "Q 17"),
            (Operation::Scan { start: 10, end: 20 }, "S 10 20"),
            (Operation::PointDelete { key: 3 }, "D 3"),
            (Operation::RangeDelete { start: 5, end: 15 }, "D 5 15"),
        ];
        for (op, text) in cases {
            assert_eq!(op.to_string(), text);
        }
    }

    #[test]
    fn delete_kind_follows_field_count() {
        assert_eq!("D 8".parse::<Operation>().unwrap(), Operation::PointDelete { key: 8 });
        assert_eq!(
            "D 8 18".parse::<Operation>().unwrap(),
            Operation::RangeDelete { start: 8, end: 18 }
        );
        assert!("D 8 18 28".parse::<Operation>().is_err());
        assert!("D".parse::<Operation>().is_err());
    }

    #[test]
    fn values_and_ranges_must_be_generatable() {
        assert!("I 1 65534".parse::<Operation>().is_ok());
        for bad in ["I 1 65535", "I 1 4 4294967295", "S 5 5", "S 9 3", "D 7 7", "D 9 3"] {
            assert!(matches!(bad.parse::<Operation>(), Err(Error::Parse { .. })), "{bad:?}");
        }
    }

    #[test]
    fn insert_without_values_is_allowed() {
        assert_eq!(
            "I 12".parse::<Operation>().unwrap(),
            Operation::Insert { key: 12, values: vec![] }
        );
    }

    #[test]
    fn malformed_lines_report_their_line() {
        for bad in ["X 1", "Q", "Q 1 2", "S 1", "Q -1", "Q  1", "I 1 99999999999", "", "I 1 65535"] {
            match Operation::decode(bad, 12) {
                Err(Error::Parse { line, .. }) => assert_eq!(line, 12, "{bad:?}"),
                other => panic!("{bad:?} decoded to {other:?}"),
            }
        }
    }

    #[test]
    fn kind_names_parse_back() {
        for kind in OpKind::ALL {
            assert_eq!(kind.name().parse::<OpKind>().unwrap(), kind);
        }
        assert!("insert".parse::<OpKind>().is_err());
    }
}
