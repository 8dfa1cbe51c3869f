use crate::error::{Error, Result};
use rand::distr::Distribution;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::Zipf;

/// Exclusive upper bound of every insert payload value.
pub const MAX_VALUE: u32 = (1 << 16) - 1;

/// How keys and range starts are spread over their domain.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum KeyDistribution {
    Uniform,
    /// Rank 1 maps to key 0, so low keys are hot.
    Zipf { exponent: f64 },
}

impl KeyDistribution {
    pub fn zipf(exponent: f64) -> Result<Self> {
        if !exponent.is_finite() || exponent < 0.0 {
            return Err(Error::InvalidDistribution(format!(
                "zipf exponent must be finite and non-negative, got {exponent}"
            )));
        }
        Ok(KeyDistribution::Zipf { exponent })
    }
}

/// The one random source of a generation run. Keys, ranges, payload values
/// and the final shuffle all draw from the same handle, so a seed fully
/// determines the output.
pub struct Sampler<R = SmallRng> {
    rng: R,
    keys: KeyDistribution,
    // zipf over the last requested domain size
    zipf: Option<(u64, Zipf<f64>)>,
}

impl Sampler<SmallRng> {
    pub fn new(seed: u64, keys: KeyDistribution) -> Self {
        Sampler::from_rng(SmallRng::seed_from_u64(seed), keys)
    }
}

impl<R: Rng> Sampler<R> {
    pub fn from_rng(rng: R, keys: KeyDistribution) -> Self {
        Sampler { rng, keys, zipf: None }
    }

    /// A key in `[0, key_max)`.
    pub fn sample_key(&mut self, key_max: u64) -> Result<u64> {
        if key_max == 0 {
            return Err(Error::InvalidDomain { key_max, range_size: 0 });
        }
        self.draw(key_max)
    }

    /// A `(start, start + range_size)` pair with `start` in
    /// `[0, key_max - range_size]`.
    pub fn sample_range(&mut self, key_max: u64, range_size: u64) -> Result<(u64, u64)> {
        if key_max == 0 || range_size == 0 || range_size > key_max {
            return Err(Error::InvalidDomain { key_max, range_size });
        }
        let start = self.draw(key_max - range_size + 1)?;
        Ok((start, start + range_size))
    }

    /// `dims` pairwise-distinct values from `[0, MAX_VALUE)`, in draw order.
    pub fn sample_values(&mut self, dims: usize) -> Result<Vec<u32>> {
        if dims > MAX_VALUE as usize {
            return Err(Error::InvalidDimension { dims, max: MAX_VALUE });
        }
        Ok(rand::seq::index::sample(&mut self.rng, MAX_VALUE as usize, dims)
            .into_iter()
            .map(|v| v as u32)
            .collect())
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    // n > 0
    fn draw(&mut self, n: u64) -> Result<u64> {
        let exponent = match self.keys {
            KeyDistribution::Uniform => return Ok(self.rng.random_range(0..n)),
            KeyDistribution::Zipf { exponent } => exponent,
        };
        let zipf = match self.zipf.take() {
            Some((cached, zipf)) if cached == n => zipf,
            _ => Zipf::new(n as f64, exponent)
                .map_err(|e| Error::InvalidDistribution(e.to_string()))?,
        };
        let rank = zipf.sample(&mut self.rng) as u64;
        self.zipf = Some((n, zipf));
        Ok(rank.saturating_sub(1).min(n - 1))
    }
}
