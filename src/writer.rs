use crate::error::{Error, Result};
use crate::workload::Workload;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Header line with the operation count, then one line per operation.
pub fn write_to<W: Write>(workload: &Workload, out: W) -> std::io::Result<()> {
    let mut out = BufWriter::new(out);
    writeln!(out, "{}", workload.len())?;
    for op in workload.operations() {
        writeln!(out, "{op}")?;
    }
    out.flush()
}

/// Replaces `dest` with the serialized workload.
///
/// Bytes go to a temporary file next to `dest` that is renamed over it
/// once complete, so a failed write leaves no partial workload behind.
/// The containing directory must already exist.
pub fn write(workload: &Workload, dest: &Path) -> Result<()> {
    let dir = match dest.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    write_to(workload, tmp.as_file()).map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(dest).map_err(|e| Error::io(dest, e.error))?;
    Ok(())
}
