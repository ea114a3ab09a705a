//! Cosine scoring for the embedding index.

/// Cosine of the angle between `a` and `b`.
///
/// Zero when the widths differ or either side has no magnitude, so a query
/// made only of stop words scores nothing against every record.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let (dot, aa, bb) = a
        .iter()
        .zip(b)
        .fold((0.0f64, 0.0f64, 0.0f64), |(dot, aa, bb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, aa + x * x, bb + y * y)
        });

    let magnitude = (aa * bb).sqrt();
    if magnitude <= f64::EPSILON {
        0.0
    } else {
        (dot / magnitude) as f32
    }
}

/// Positions of `candidates` scoring at least `threshold` against `query`,
/// best first and at most `k` of them. Equal scores keep candidate order.
pub fn rank_by_similarity<V: AsRef<[f32]>>(
    candidates: &[V],
    query: &[f32],
    k: usize,
    threshold: f32,
) -> Vec<(usize, f32)> {
    let mut hits = Vec::new();
    for (position, candidate) in candidates.iter().enumerate() {
        let score = cosine_similarity(candidate.as_ref(), query);
        // NaN fails the comparison and is dropped
        if score >= threshold {
            hits.push((position, score));
        }
    }

    hits.sort_by(|a, b| b.1.total_cmp(&a.1));
    hits.truncate(k);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::HashingEmbedder;
    use crate::index::DEFAULT_THRESHOLD;
    use campusbuddy_core::embedding::Embedder;

    fn positions(hits: &[(usize, f32)]) -> Vec<usize> {
        hits.iter().map(|(position, _)| *position).collect()
    }

    #[test]
    fn record_sharing_the_query_term_ranks_first() {
        let embedder = HashingEmbedder::default();
        let records: Vec<Vec<f32>> = ["Dr. Lee physics lecture", "The Lair pizza"]
            .iter()
            .map(|text| embedder.encode(text).unwrap())
            .collect();
        let query = embedder.encode("pizza").unwrap();

        let hits = rank_by_similarity(&records, &query, 3, DEFAULT_THRESHOLD);
        assert_eq!(hits.first().map(|(position, _)| *position), Some(1));
        assert!(hits[0].1 >= DEFAULT_THRESHOLD);
    }

    #[test]
    fn stop_word_query_matches_nothing() {
        let embedder = HashingEmbedder::new(64);
        let records = vec![embedder.encode("The Lair pizza").unwrap()];
        let query = embedder.encode("where is the").unwrap();

        assert_eq!(cosine_similarity(&records[0], &query), 0.0);
        assert!(rank_by_similarity(&records, &query, 3, DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn threshold_is_inclusive() {
        let candidates: [[f32; 2]; 2] = [[1.0, 0.0], [0.0, 1.0]];
        let hits = rank_by_similarity(&candidates, &[1.0, 0.0], 5, 1.0);
        assert_eq!(hits, vec![(0, 1.0)]);
    }

    #[test]
    fn scaled_vectors_tie_and_keep_candidate_order() {
        let candidates: [[f32; 2]; 4] = [[0.0, 1.0], [2.0, 0.0], [1.0, 0.0], [4.0, 0.0]];
        let hits = rank_by_similarity(&candidates, &[1.0, 0.0], 5, 0.5);
        assert_eq!(positions(&hits), vec![1, 2, 3]);
    }

    #[test]
    fn k_caps_the_hit_list() {
        let candidates: [[f32; 2]; 3] = [[1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let hits = rank_by_similarity(&candidates, &[1.0, 0.0], 2, 0.0);
        assert_eq!(positions(&hits), vec![0, 1]);
        assert!(rank_by_similarity(&candidates, &[1.0, 0.0], 0, 0.0).is_empty());
    }

    #[test]
    fn width_mismatch_and_nan_never_match() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);

        let candidates: [&[f32]; 3] = [&[1.0, 0.0, 0.0], &[f32::NAN, 0.0], &[1.0, 0.0]];
        let hits = rank_by_similarity(&candidates, &[1.0, 0.0], 5, DEFAULT_THRESHOLD);
        assert_eq!(positions(&hits), vec![2]);
    }
}
