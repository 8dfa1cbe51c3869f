use crate::error::Result;
use crate::operation::OpKind;
use crate::workload::mix::share;
use crate::workload::{MixConfig, Params};

/// Half inserts, the rest split over deletes, reads and scans.
#[derive(Default)]
pub struct FiveWay;

const TOTAL: u64 = 50_000;

const WEIGHTS: [(OpKind, f64); 5] = [
    (OpKind::Put, 0.5),
    (OpKind::Pdel, 0.1),
    (OpKind::Rdel, 0.1),
    (OpKind::Get, 0.2),
    (OpKind::Scan, 0.1),
];

impl MixConfig for FiveWay {
    fn get_name(&self) -> String {
        "five_way".to_owned()
    }

    fn get_params(&self) -> Params {
        Params {
            key_max: 100_000,
            dims: 2,
            scan_range: 10,
            delete_range: 10,
        }
    }

    fn get_counts(&self) -> Result<Vec<(OpKind, u64)>> {
        WEIGHTS
            .iter()
            .map(|&(kind, weight)| Ok((kind, share(TOTAL, weight)?)))
            .collect()
    }
}
