use crate::error::{Error, Result};
use crate::operation::Operation;
use crate::workload::Workload;
use std::fs;
use std::path::Path;

pub fn read(path: &Path) -> Result<Workload> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse(&text)
}

/// Parses a whole workload file. The header must match the number of
/// operation lines that follow.
pub fn parse(text: &str) -> Result<Workload> {
    let mut lines = text.lines();
    let header = lines.next().ok_or_else(|| Error::parse(1, "missing header"))?;
    let declared = header
        .parse::<u64>()
        .map_err(|_| Error::parse(1, format!("header {header:?} is not an operation count")))?;

    let ops = lines
        .enumerate()
        .map(|(i, line)| Operation::decode(line, i + 2))
        .collect::<Result<Vec<_>>>()?;

    if ops.len() as u64 != declared {
        return Err(Error::parse(
            1,
            format!("header declares {declared} operations, found {}", ops.len()),
        ));
    }
    Ok(Workload::new(ops))
}
