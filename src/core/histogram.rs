use crate::error::{ChartError, ChartResult};

/// Evenly spaced bin edges covering the finite samples.
///
/// Mirrors the usual histogram convention: an empty sample set bins over
/// `[0, 1]`, and a constant sample set is widened by half a unit per side.
pub fn bin_edges(samples: &[f64], bins: usize) -> ChartResult<Vec<f64>> {
    if bins == 0 {
        return Err(ChartError::InvalidData(
            "histogram bin count must be > 0".to_owned(),
        ));
    }

    let mut finite = samples.iter().copied().filter(|value| value.is_finite());
    let (mut low, mut high) = match finite.next() {
        Some(first) => finite.fold((first, first), |(low, high), value| {
            (low.min(value), high.max(value))
        }),
        None => (0.0, 1.0),
    };
    if low == high {
        low -= 0.5;
        high += 0.5;
    }

    let step = (high - low) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| low + step * i as f64).collect();
    edges.push(high);
    Ok(edges)
}

/// Counts samples per bin; bins are half-open except the last one.
///
/// Samples outside `[edges[0], edges[last]]` are ignored.
#[must_use]
pub fn bin_counts(samples: &[f64], edges: &[f64]) -> Vec<f64> {
    if edges.len() < 2 {
        return Vec::new();
    }
    let bins = edges.len() - 1;
    let first = edges[0];
    let last = edges[bins];
    let mut counts = vec![0.0; bins];

    for &value in samples {
        if !value.is_finite() || value < first || value > last {
            continue;
        }
        let index = if value == last {
            bins - 1
        } else {
            edges.partition_point(|edge| *edge <= value).saturating_sub(1)
        };
        counts[index.min(bins - 1)] += 1.0;
    }
    counts
}

/// Applies density normalization and/or cumulation to raw bin counts.
#[must_use]
pub fn shape_counts(counts: &[f64], edges: &[f64], density: bool, cumulative: bool) -> Vec<f64> {
    let widths: Vec<f64> = edges.windows(2).map(|pair| pair[1] - pair[0]).collect();
    let total: f64 = counts.iter().sum();

    let mut heights: Vec<f64> = if density && total > 0.0 {
        counts
            .iter()
            .zip(&widths)
            .map(|(count, width)| count / (total * width))
            .collect()
    } else {
        counts.to_vec()
    };

    if cumulative {
        let mut running = 0.0;
        for (index, height) in heights.iter_mut().enumerate() {
            running += if density && total > 0.0 {
                *height * widths[index]
            } else {
                *height
            };
            *height = running;
        }
    }
    heights
}

/// Bin counts and edges in one call.
pub fn histogram(samples: &[f64], bins: usize) -> ChartResult<(Vec<f64>, Vec<f64>)> {
    let edges = bin_edges(samples, bins)?;
    let counts = bin_counts(samples, &edges);
    Ok((counts, edges))
}
