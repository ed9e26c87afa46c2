use ndarray::prelude::*;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansParams {
    pub k: usize,
    pub attempts: usize,
    pub max_iter: usize,
    /// Refinement stops once no center moves farther than this.
    pub epsilon: f32,
}

#[derive(Debug, Clone)]
pub struct Clustering {
    /// Cluster index per input row.
    pub labels: Vec<usize>,
    /// One row per cluster.
    pub centers: Array2<f32>,
    /// Sum of squared distances from each row to its center.
    pub compactness: f32,
}

#[inline]
fn dist2(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn nearest(sample: ArrayView1<'_, f32>, centers: &Array2<f32>) -> (usize, f32) {
    let mut best = (0, f32::MAX);

    for (idx, center) in centers.outer_iter().enumerate() {
        let d = dist2(sample, center);
        if d < best.1 {
            best = (idx, d);
        }
    }

    best
}

/// k-means++ seeding: each next center is drawn with probability
/// proportional to its squared distance from the closest center so far.
fn init_centers<R: Rng>(data: ArrayView2<'_, f32>, k: usize, rng: &mut R) -> Array2<f32> {
    let n = data.nrows();
    let mut centers = Array2::zeros((k, data.ncols()));
    centers.row_mut(0).assign(&data.row(rng.gen_range(0..n)));

    let mut dists: Vec<f32> = data
        .outer_iter()
        .map(|row| dist2(row, centers.row(0)))
        .collect();

    for c in 1..k {
        let total: f32 = dists.iter().sum();

        let pick = if total > 0.0 {
            let mut r = rng.gen::<f32>() * total;
            let mut pick = n - 1;
            for (idx, d) in dists.iter().enumerate() {
                if r < *d {
                    pick = idx;
                    break;
                }
                r -= d;
            }
            pick
        } else {
            rng.gen_range(0..n)
        };

        centers.row_mut(c).assign(&data.row(pick));

        for (d, row) in dists.iter_mut().zip(data.outer_iter()) {
            *d = d.min(dist2(row, centers.row(c)));
        }
    }

    centers
}

fn assign(data: ArrayView2<'_, f32>, centers: &Array2<f32>, labels: &mut [usize]) -> f32 {
    let mut compactness = 0.0;

    for (label, row) in labels.iter_mut().zip(data.outer_iter()) {
        let (idx, d) = nearest(row, centers);
        *label = idx;
        compactness += d;
    }

    compactness
}

fn recompute_centers(data: ArrayView2<'_, f32>, labels: &[usize], k: usize) -> Array2<f32> {
    let mut sums = Array2::<f32>::zeros((k, data.ncols()));
    let mut counts = vec![0usize; k];

    for (&label, row) in labels.iter().zip(data.outer_iter()) {
        let mut sum = sums.row_mut(label);
        sum += &row;
        counts[label] += 1;
    }

    for (c, count) in counts.iter().enumerate() {
        if *count > 0 {
            sums.row_mut(c).mapv_inplace(|v| v / *count as f32);
        }
    }

    // an emptied cluster takes over the sample worst served by its current center
    for c in (0..k).filter(|&c| counts[c] == 0) {
        let worst = labels
            .iter()
            .zip(data.outer_iter())
            .enumerate()
            .map(|(idx, (&label, row))| (idx, dist2(row, sums.row(label))))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(idx, _)| idx)
            .unwrap_or(0);

        sums.row_mut(c).assign(&data.row(worst));
    }

    sums
}

fn run_once<R: Rng>(data: ArrayView2<'_, f32>, params: &KMeansParams, rng: &mut R) -> Clustering {
    let eps2 = params.epsilon.max(0.0).powi(2);
    let mut labels = vec![0; data.nrows()];
    let mut centers = init_centers(data, params.k, rng);
    let mut compactness = assign(data, &centers, &mut labels);

    for _ in 1..params.max_iter.max(2) {
        let next = recompute_centers(data, &labels, params.k);
        let shift = next
            .outer_iter()
            .zip(centers.outer_iter())
            .map(|(a, b)| dist2(a, b))
            .fold(0.0f32, f32::max);

        centers = next;
        compactness = assign(data, &centers, &mut labels);

        if shift <= eps2 {
            break;
        }
    }

    Clustering {
        labels,
        centers,
        compactness,
    }
}

/// Partitions the rows of `data` into `params.k` clusters, keeping the most
/// compact of `params.attempts` independently seeded runs.
///
/// Returns `None` when there are fewer rows than clusters.
pub fn kmeans<R: Rng>(
    data: ArrayView2<'_, f32>,
    params: &KMeansParams,
    rng: &mut R,
) -> Option<Clustering> {
    if params.k == 0 || data.nrows() < params.k {
        return None;
    }

    let mut best: Option<Clustering> = None;

    for _ in 0..params.attempts.max(1) {
        let attempt = run_once(data, params, rng);

        if best
            .as_ref()
            .map_or(true, |b| attempt.compactness < b.compactness)
        {
            best = Some(attempt);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params() -> KMeansParams {
        KMeansParams {
            k: 2,
            attempts: 5,
            max_iter: 10,
            epsilon: 1.0,
        }
    }

    #[test]
    fn too_few_samples() {
        let data = array![[1.0f32, 2.0, 3.0]];
        let mut rng = StdRng::seed_from_u64(1);
        assert!(kmeans(data.view(), &params(), &mut rng).is_none());
    }

    #[test]
    fn separates_two_blobs() {
        let data = array![
            [50.0f32, 10.0, 10.0],
            [150.0, -10.0, -10.0],
            [52.0, 11.0, 9.0],
            [148.0, -9.0, -11.0],
            [49.0, 9.0, 10.0],
        ];
        let mut rng = StdRng::seed_from_u64(42);
        let result = kmeans(data.view(), &params(), &mut rng).unwrap();

        assert_eq!(result.centers.nrows(), 2);
        assert_eq!(result.labels[0], result.labels[2]);
        assert_eq!(result.labels[0], result.labels[4]);
        assert_eq!(result.labels[1], result.labels[3]);
        assert_ne!(result.labels[0], result.labels[1]);

        let team_a = result.centers.row(result.labels[0]);
        assert!((team_a[0] - 50.333).abs() < 0.01);
    }

    #[test]
    fn identical_samples_still_give_two_centers() {
        let data = array![[10.0f32, 10.0, 10.0], [10.0, 10.0, 10.0]];
        let mut rng = StdRng::seed_from_u64(3);
        let result = kmeans(data.view(), &params(), &mut rng).unwrap();

        assert_eq!(result.centers.nrows(), 2);
        assert_eq!(result.labels.len(), 2);
        assert!(result.labels.iter().all(|&l| l < 2));
        assert_eq!(result.compactness, 0.0);
    }

    #[test]
    fn same_seed_same_result() {
        let data = array![
            [1.0f32, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [10.0, 0.0, 0.0],
            [11.0, 0.0, 0.0],
        ];
        let a = kmeans(data.view(), &params(), &mut StdRng::seed_from_u64(9)).unwrap();
        let b = kmeans(data.view(), &params(), &mut StdRng::seed_from_u64(9)).unwrap();

        assert_eq!(a.labels, b.labels);
        assert_eq!(a.centers, b.centers);
    }
}
