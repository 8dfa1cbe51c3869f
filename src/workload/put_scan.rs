use crate::error::Result;
use crate::operation::OpKind;
use crate::workload::{MixConfig, Params};

/// Bulk inserts with a sprinkling of wide scans.
#[derive(Default)]
pub struct PutScan;

impl MixConfig for PutScan {
    fn get_name(&self) -> String {
        "put_scan".to_owned()
    }

    fn get_params(&self) -> Params {
        Params {
            key_max: 100_000,
            dims: 2,
            scan_range: 1_000,
            delete_range: 0,
        }
    }

    fn get_counts(&self) -> Result<Vec<(OpKind, u64)>> {
        Ok(vec![(OpKind::Put, 100_000), (OpKind::Scan, 1_000)])
    }
}
