//! Volatility grid and the curves sampled on it.

use serde::Serialize;

use crate::config::Parameters;
use crate::error::{Error, Result};

/// Strictly increasing volatility samples. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VolatilityGrid {
    sigmas: Vec<f64>,
}

impl VolatilityGrid {
    /// `points` evenly spaced samples covering `[sigma_min, sigma_max]`.
    pub fn linspace(sigma_min: f64, sigma_max: f64, points: usize) -> Result<Self> {
        if !(sigma_min > 0.0) {
            return Err(Error::NonPositiveSigmaMin(sigma_min));
        }
        if !(sigma_max > sigma_min) || !sigma_max.is_finite() {
            return Err(Error::EmptyVolatilityDomain {
                sigma_min,
                sigma_max,
            });
        }
        if points < 2 {
            return Err(Error::GridTooSmall(points));
        }

        let step = (sigma_max - sigma_min) / (points - 1) as f64;
        let mut sigmas: Vec<f64> = (0..points).map(|i| sigma_min + step * i as f64).collect();
        sigmas[points - 1] = sigma_max;

        // step can fall below float resolution on a very narrow domain
        if !sigmas.windows(2).all(|w| w[0] < w[1]) {
            return Err(Error::DegenerateGrid {
                sigma_min,
                sigma_max,
                points,
            });
        }

        Ok(Self { sigmas })
    }

    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        Self::linspace(params.sigma_min, params.sigma_max, params.grid_points)
    }

    /// Samples already known to be increasing, e.g. a filtered subset of a grid.
    pub(crate) fn from_sorted(sigmas: Vec<f64>) -> Self {
        debug_assert!(sigmas.windows(2).all(|w| w[0] < w[1]));
        Self { sigmas }
    }

    /// Keep only the samples where `mask` is true.
    pub fn select(&self, mask: &[bool]) -> Self {
        debug_assert_eq!(mask.len(), self.sigmas.len());
        let sigmas = self
            .sigmas
            .iter()
            .zip(mask)
            .filter(|(_, &keep)| keep)
            .map(|(&s, _)| s)
            .collect();
        Self::from_sorted(sigmas)
    }

    pub fn sigmas(&self) -> &[f64] {
        &self.sigmas
    }

    pub fn len(&self) -> usize {
        self.sigmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sigmas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.sigmas.iter().copied()
    }
}

/// Values aligned index-for-index with a grid. `None` marks points where
/// the underlying model is undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AnchorCurve {
    values: Vec<Option<f64>>,
}

impl AnchorCurve {
    pub fn sample(grid: &VolatilityGrid, f: impl Fn(f64) -> Option<f64>) -> Self {
        Self {
            values: grid.iter().map(f).collect(),
        }
    }

    /// A curve that is defined at every point.
    pub fn sample_defined(grid: &VolatilityGrid, f: impl Fn(f64) -> f64) -> Self {
        Self::sample(grid, |s| Some(f(s)))
    }

    pub fn from_values(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    pub fn select(&self, mask: &[bool]) -> Self {
        debug_assert_eq!(mask.len(), self.values.len());
        let values = self
            .values
            .iter()
            .zip(mask)
            .filter(|(_, &keep)| keep)
            .map(|(&v, _)| v)
            .collect();
        Self { values }
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}
