//! Seeded k-means for pseudo-label bootstrapping
//!
//! Lloyd's algorithm with k-means++ initialization. The assignment step
//! runs in parallel across rows; results are deterministic for a fixed
//! (input, cluster count, seed) triple.

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::PipelineError;

/// K-means configuration.
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    seed: u64,
    max_iter: usize,
    tol: f32,
}

/// Fitted clustering: labels per row plus the final centroids.
#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Cluster assignment in `[0, k)` for each input row.
    pub labels: Vec<usize>,

    /// Final centroid matrix, `k × d`.
    pub centroids: Array2<f32>,

    /// Within-cluster sum of squared distances.
    pub inertia: f32,

    /// Number of Lloyd iterations run.
    pub n_iter: usize,
}

impl KMeans {
    /// Create a seeded k-means with default iteration limits.
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            seed,
            max_iter: 300,
            tol: 1e-4,
        }
    }

    /// Set the maximum number of Lloyd iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the centroid-movement convergence tolerance.
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    /// Partition the rows of `data` into `k` groups.
    ///
    /// Fails with [`PipelineError::InvalidClusterCount`] when `k` is zero or
    /// exceeds the row count, and with
    /// [`PipelineError::DegenerateClustering`] when `k` non-empty groups
    /// cannot be produced (fewer distinct rows than `k`).
    pub fn fit(&self, data: &Array2<f32>) -> Result<KMeansFit, PipelineError> {
        let n = data.nrows();

        if self.k == 0 {
            return Err(PipelineError::InvalidClusterCount {
                requested: self.k,
                reason: "must be at least 1".to_string(),
            });
        }
        if self.k > n {
            return Err(PipelineError::InvalidClusterCount {
                requested: self.k,
                reason: format!("exceeds row count {n}"),
            });
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = self.init_centroids(data, &mut rng)?;
        let mut n_iter = 0;

        for iter in 1..=self.max_iter {
            n_iter = iter;

            let assignment = assign_rows(data, &centroids);
            let new_centroids = self.update_centroids(data, &assignment);

            let shift = centroid_shift(&centroids, &new_centroids);
            centroids = new_centroids;

            if shift <= self.tol * self.tol {
                break;
            }
        }

        // Final assignment so labels match the final centroids.
        let assignment = assign_rows(data, &centroids);
        let labels: Vec<usize> = assignment.iter().map(|&(label, _)| label).collect();
        let inertia: f32 = assignment.iter().map(|&(_, dist)| dist).sum();

        let mut seen = vec![false; self.k];
        for &label in &labels {
            seen[label] = true;
        }
        let produced = seen.iter().filter(|&&s| s).count();
        if produced != self.k {
            return Err(PipelineError::DegenerateClustering {
                requested: self.k,
                produced,
            });
        }

        Ok(KMeansFit {
            labels,
            centroids,
            inertia,
            n_iter,
        })
    }

    /// K-means++ seeding: subsequent centroids are drawn proportionally to
    /// the squared distance from the nearest centroid chosen so far.
    fn init_centroids(
        &self,
        data: &Array2<f32>,
        rng: &mut StdRng,
    ) -> Result<Array2<f32>, PipelineError> {
        let n = data.nrows();
        let d = data.ncols();

        let mut chosen = Vec::with_capacity(self.k);
        chosen.push(rng.gen_range(0..n));

        let mut dist2: Vec<f32> = (0..n)
            .map(|i| squared_distance(data.row(i), data.row(chosen[0])))
            .collect();

        while chosen.len() < self.k {
            let total: f32 = dist2.iter().sum();
            if total <= 0.0 {
                // Every remaining row coincides with a chosen centroid.
                return Err(PipelineError::DegenerateClustering {
                    requested: self.k,
                    produced: chosen.len(),
                });
            }

            let mut target = rng.gen::<f32>() * total;
            let mut next = None;
            let mut last_candidate = None;
            for (i, &weight) in dist2.iter().enumerate() {
                if weight <= 0.0 {
                    continue;
                }
                last_candidate = Some(i);
                target -= weight;
                if target <= 0.0 {
                    next = Some(i);
                    break;
                }
            }
            // Rounding can leave a sliver of target; fall back to the last
            // nonzero-weight row.
            let next = next
                .or(last_candidate)
                .ok_or(PipelineError::DegenerateClustering {
                    requested: self.k,
                    produced: chosen.len(),
                })?;

            chosen.push(next);
            for i in 0..n {
                let dist = squared_distance(data.row(i), data.row(next));
                if dist < dist2[i] {
                    dist2[i] = dist;
                }
            }
        }

        let mut centroids = Array2::zeros((self.k, d));
        for (c, &row) in chosen.iter().enumerate() {
            centroids.row_mut(c).assign(&data.row(row));
        }
        Ok(centroids)
    }

    /// Mean of the rows assigned to each centroid. A centroid left with no
    /// rows is relocated to the row currently farthest from its centroid,
    /// one distinct row per relocation.
    fn update_centroids(&self, data: &Array2<f32>, assignment: &[(usize, f32)]) -> Array2<f32> {
        let d = data.ncols();
        let mut sums = Array2::<f32>::zeros((self.k, d));
        let mut counts = vec![0usize; self.k];

        for (i, &(label, _)) in assignment.iter().enumerate() {
            let mut row = sums.row_mut(label);
            row += &data.row(i);
            counts[label] += 1;
        }

        let mut dist2: Vec<f32> = assignment.iter().map(|&(_, dist)| dist).collect();
        for c in 0..self.k {
            if counts[c] > 0 {
                let mut row = sums.row_mut(c);
                row /= counts[c] as f32;
                continue;
            }

            // Deterministic relocation: farthest row wins, first index on ties.
            let mut farthest = 0;
            for (i, &dist) in dist2.iter().enumerate() {
                if dist > dist2[farthest] {
                    farthest = i;
                }
            }
            dist2[farthest] = -1.0;
            sums.row_mut(c).assign(&data.row(farthest));
        }

        sums
    }
}

/// Nearest-centroid assignment for every row, in parallel. Ties go to the
/// lowest centroid index.
fn assign_rows(data: &Array2<f32>, centroids: &Array2<f32>) -> Vec<(usize, f32)> {
    let n = data.nrows();
    (0..n)
        .into_par_iter()
        .map(|i| nearest_centroid(data.row(i), centroids))
        .collect()
}

fn nearest_centroid(row: ArrayView1<f32>, centroids: &Array2<f32>) -> (usize, f32) {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (c, centroid) in centroids.rows().into_iter().enumerate() {
        let dist = squared_distance(row, centroid);
        if dist < best_dist {
            best = c;
            best_dist = dist;
        }
    }
    (best, best_dist)
}

fn squared_distance(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum()
}

/// Largest squared movement of any centroid between iterations.
fn centroid_shift(old: &Array2<f32>, new: &Array2<f32>) -> f32 {
    let mut max_shift = 0.0f32;
    for (old_row, new_row) in old.rows().into_iter().zip(new.rows()) {
        let shift = squared_distance(old_row, new_row);
        if shift > max_shift {
            max_shift = shift;
        }
    }
    max_shift
}
