pub mod five_way;
pub mod mix;
pub mod put_scan;

use crate::error::{Error, Result};
use crate::generator::Sampler;
use crate::operation::{OpKind, Operation};
use clap::ValueEnum;
use rand::Rng;
use std::collections::BTreeMap;
use thousands::Separable;
use tracing::{debug, info};

/// Shape of the sampled operations. Fields a kind does not use are ignored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    /// Keys are drawn from `[0, key_max)`.
    pub key_max: u64,
    /// Number of distinct values per insert.
    pub dims: usize,
    pub scan_range: u64,
    pub delete_range: u64,
}

/// A composed sequence of operations. The declared count written in the
/// file header is always the length of the sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Workload {
    ops: Vec<Operation>,
}

impl Workload {
    pub fn new(ops: Vec<Operation>) -> Self {
        Workload { ops }
    }

    pub fn len(&self) -> u64 {
        self.ops.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    pub fn counts(&self) -> BTreeMap<OpKind, u64> {
        let mut counts = BTreeMap::new();
        for op in &self.ops {
            *counts.entry(op.kind()).or_default() += 1;
        }
        counts
    }
}

pub fn build_insert<R: Rng>(s: &mut Sampler<R>, key_max: u64, dims: usize) -> Result<Operation> {
    Ok(Operation::Insert {
        key: s.sample_key(key_max)?,
        values: s.sample_values(dims)?,
    })
}

pub fn build_query<R: Rng>(s: &mut Sampler<R>, key_max: u64) -> Result<Operation> {
    Ok(Operation::Query { key: s.sample_key(key_max)? })
}

pub fn build_scan<R: Rng>(s: &mut Sampler<R>, key_max: u64, scan_range: u64) -> Result<Operation> {
    let (start, end) = s.sample_range(key_max, scan_range)?;
    Ok(Operation::Scan { start, end })
}

pub fn build_point_delete<R: Rng>(s: &mut Sampler<R>, key_max: u64) -> Result<Operation> {
    Ok(Operation::PointDelete { key: s.sample_key(key_max)? })
}

pub fn build_range_delete<R: Rng>(
    s: &mut Sampler<R>,
    key_max: u64,
    range_size: u64,
) -> Result<Operation> {
    let (start, end) = s.sample_range(key_max, range_size)?;
    Ok(Operation::RangeDelete { start, end })
}

pub fn build<R: Rng>(s: &mut Sampler<R>, kind: OpKind, params: &Params) -> Result<Operation> {
    match kind {
        OpKind::Put => build_insert(s, params.key_max, params.dims),
        OpKind::Get => build_query(s, params.key_max),
        OpKind::Scan => build_scan(s, params.key_max, params.scan_range),
        OpKind::Pdel => build_point_delete(s, params.key_max),
        OpKind::Rdel => build_range_delete(s, params.key_max, params.delete_range),
    }
}

fn build_many<R: Rng>(
    s: &mut Sampler<R>,
    kind: OpKind,
    n: u64,
    params: &Params,
) -> Result<Vec<Operation>> {
    (0..n).map(|_| build(s, kind, params)).collect()
}

/// `n` operations of one kind, in generation order.
pub fn homogeneous<R: Rng>(
    s: &mut Sampler<R>,
    kind: OpKind,
    n: u64,
    params: &Params,
) -> Result<Workload> {
    let ops = build_many(s, kind, n, params)?;
    debug!(%kind, ops = n, "built homogeneous workload");
    Ok(Workload::new(ops))
}

/// `n` inserts with keys `key_start, key_start + 1, ...`.
pub fn sequential_inserts<R: Rng>(
    s: &mut Sampler<R>,
    n: u64,
    key_start: u64,
    dims: usize,
) -> Result<Workload> {
    if n > 0 && key_start.checked_add(n - 1).is_none() {
        return Err(Error::InvalidDomain { key_max: key_start, range_size: n });
    }
    let ops = (0..n)
        .map(|i| -> Result<Operation> {
            Ok(Operation::Insert {
                key: key_start + i,
                values: s.sample_values(dims)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Workload::new(ops))
}

/// Builds each kind's operations in bulk, in the order given, then shuffles
/// the concatenation. Per-kind counts survive the shuffle exactly.
pub fn mixed<R: Rng>(
    s: &mut Sampler<R>,
    counts: &[(OpKind, u64)],
    params: &Params,
) -> Result<Workload> {
    let total = counts
        .iter()
        .try_fold(0u64, |acc, (_, n)| acc.checked_add(*n))
        .ok_or_else(|| Error::InvalidProportion("operation counts overflow".to_owned()))?;
    let mut ops = Vec::new();
    for &(kind, n) in counts {
        debug!(%kind, ops = n, "building");
        ops.extend(build_many(s, kind, n, params)?);
    }
    s.shuffle(&mut ops);
    info!("Mixed {} operations across {} kinds", total.separate_with_underscores(), counts.len());
    Ok(Workload::new(ops))
}

/// A named, fixed mix.
pub trait MixConfig {
    fn get_name(&self) -> String;
    fn get_params(&self) -> Params;
    /// How many operations of each kind, in build order.
    fn get_counts(&self) -> Result<Vec<(OpKind, u64)>>;
}

pub fn compose<R: Rng>(s: &mut Sampler<R>, config: &dyn MixConfig) -> Result<Workload> {
    info!("Composing preset {}", config.get_name());
    mixed(s, &config.get_counts()?, &config.get_params())
}

#[derive(Copy, Clone, Debug, ValueEnum)]
// Update get_preset when adding new variation
pub enum Preset {
    FiveWay,
    PutScan,
}

pub fn get_preset(preset: Preset) -> Box<dyn MixConfig> {
    match preset {
        Preset::FiveWay => Box::new(five_way::FiveWay),
        Preset::PutScan => Box::new(put_scan::PutScan),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::KeyDistribution;
    use std::collections::HashSet;

    fn sampler() -> Sampler {
        Sampler::new(0xC0FFEE, KeyDistribution::Uniform)
    }

    fn params() -> Params {
        Params { key_max: 1_000, dims: 3, scan_range: 10, delete_range: 25 }
    }

    #[test]
    fn inserts_keep_keys_in_domain_and_values_distinct() {
        let mut s = sampler();
        for _ in 0..1_000 {
            match build_insert(&mut s, 100, 2).unwrap() {
                Operation::Insert { key, values } => {
                    assert!(key < 100);
                    assert_eq!(values.len(), 2);
                    assert_ne!(values[0], values[1]);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn scans_have_exact_width() {
        let mut s = sampler();
        for _ in 0..1_000 {
            match build_scan(&mut s, 1_000, 10).unwrap() {
                Operation::Scan { start, end } => {
                    assert_eq!(end - start, 10);
                    assert!(end <= 1_000);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn homogeneous_yields_one_kind() {
        let mut s = sampler();
        for kind in OpKind::ALL {
            let wl = homogeneous(&mut s, kind, 200, &params()).unwrap();
            assert_eq!(wl.len(), 200);
            assert!(wl.operations().iter().all(|op| op.kind() == kind));
        }
    }

    #[test]
    fn range_deletes_use_delete_range() {
        let mut s = sampler();
        let wl = homogeneous(&mut s, OpKind::Rdel, 100, &params()).unwrap();
        for op in wl.operations() {
            match op {
                Operation::RangeDelete { start, end } => {
                    assert_eq!(end - start, 25);
                    assert!(*end <= 1_000);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn sampler_failures_abort_composition() {
        let mut s = sampler();
        let bad = Params { key_max: 5, scan_range: 6, ..params() };
        assert!(matches!(
            homogeneous(&mut s, OpKind::Scan, 10, &bad),
            Err(Error::InvalidDomain { key_max: 5, range_size: 6 })
        ));
        let empty = Params { key_max: 0, ..params() };
        assert!(mixed(&mut s, &[(OpKind::Get, 1)], &empty).is_err());
    }

    #[test]
    fn sequential_inserts_count_up_from_start() {
        let mut s = sampler();
        let wl = sequential_inserts(&mut s, 50, 1_000, 4).unwrap();
        for (i, op) in wl.operations().iter().enumerate() {
            match op {
                Operation::Insert { key, values } => {
                    assert_eq!(*key, 1_000 + i as u64);
                    assert_eq!(values.iter().collect::<HashSet<_>>().len(), 4);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn sequential_keys_past_u64_max_are_rejected() {
        let mut s = sampler();
        assert!(matches!(
            sequential_inserts(&mut s, 2, u64::MAX, 1),
            Err(Error::InvalidDomain { key_max: u64::MAX, range_size: 2 })
        ));
        let last = sequential_inserts(&mut s, 1, u64::MAX, 1).unwrap();
        assert!(matches!(last.operations(), [Operation::Insert { key: u64::MAX, .. }]));
        assert!(sequential_inserts(&mut s, 0, u64::MAX, 1).unwrap().is_empty());
    }

    #[test]
    fn overflowing_mix_counts_are_rejected() {
        let mut s = sampler();
        let counts = [(OpKind::Get, u64::MAX), (OpKind::Put, 1)];
        assert!(matches!(
            mixed(&mut s, &counts, &params()),
            Err(Error::InvalidProportion(_))
        ));
    }

    #[test]
    fn mixed_keeps_counts_and_interleaves() {
        let mut s = sampler();
        let counts = [(OpKind::Put, 300), (OpKind::Get, 100), (OpKind::Scan, 50)];
        let wl = mixed(&mut s, &counts, &params()).unwrap();
        assert_eq!(wl.len(), 450);
        let got = wl.counts();
        assert_eq!(got[&OpKind::Put], 300);
        assert_eq!(got[&OpKind::Get], 100);
        assert_eq!(got[&OpKind::Scan], 50);
        // unshuffled order would put all 300 inserts first
        assert!(wl.operations()[..300].iter().any(|op| op.kind() != OpKind::Put));
    }

    #[test]
    fn same_seed_same_workload() {
        let counts = [(OpKind::Put, 20), (OpKind::Rdel, 20)];
        let a = mixed(&mut sampler(), &counts, &params()).unwrap();
        let b = mixed(&mut sampler(), &counts, &params()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn presets_compose_their_counts() {
        let mut s = sampler();
        let wl = compose(&mut s, get_preset(Preset::FiveWay).as_ref()).unwrap();
        assert_eq!(wl.len(), 50_000);
        let counts = wl.counts();
        assert_eq!(counts[&OpKind::Put], 25_000);
        assert_eq!(counts[&OpKind::Pdel], 5_000);
        assert_eq!(counts[&OpKind::Rdel], 5_000);
        assert_eq!(counts[&OpKind::Get], 10_000);
        assert_eq!(counts[&OpKind::Scan], 5_000);
    }
}
