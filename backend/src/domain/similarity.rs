/// Cosine-similarity ranking of candidate embeddings against a query
use super::value_objects::EmbeddingVector;

/// Position of a candidate in the input slice together with its score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCandidate {
    pub index: usize,
    pub score: f64,
}

/// Score every candidate against `query` and order them by descending score.
///
/// The sort is stable: candidates with equal scores keep their input order.
/// Nothing is truncated here. A candidate whose dimension differs from the
/// query scores 0, as does any non-finite score.
pub fn rank_by_similarity(
    query: &EmbeddingVector,
    candidates: &[EmbeddingVector],
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| RankedCandidate {
            index,
            score: clean_score(query.cosine_similarity(candidate).unwrap_or(0.0)),
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Non-finite values and negative zero become 0 so `total_cmp` sees one zero
fn clean_score(score: f64) -> f64 {
    if score.is_finite() && score != 0.0 {
        score
    } else {
        0.0
    }
}
