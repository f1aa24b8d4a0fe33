use std::{cmp::Ordering, collections::HashMap};

/// Upper bound of a single signal score: cosine similarity shifted by +1.0.
pub const MAX_SIMILARITY: f64 = 2.0;

/// Shift applied to raw cosine similarity so scores stay non-negative.
pub const SIMILARITY_SHIFT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredId {
	pub id: String,
	pub score: f64,
}
impl ScoredId {
	pub fn new(id: impl Into<String>, score: f64) -> Self {
		Self { id: id.into(), score }
	}
}

/// One signal's hits together with the weight they contribute with.
#[derive(Debug, Clone, Copy)]
pub struct WeightedHits<'a> {
	pub weight: f64,
	pub hits: &'a [ScoredId],
}

/// Merges per-signal hits into one combined score per id.
///
/// An id missing from a signal contributes nothing for that signal. Contributions are summed in
/// ascending order per id, so the result does not depend on the order signals arrive in.
pub fn aggregate<'a, I>(signals: I) -> HashMap<String, f64>
where
	I: IntoIterator<Item = WeightedHits<'a>>,
{
	let mut contributions: HashMap<String, Vec<f64>> = HashMap::new();

	for signal in signals {
		for hit in signal.hits {
			let contribution = hit.score * signal.weight;

			if !contribution.is_finite() {
				continue;
			}

			contributions.entry(hit.id.clone()).or_default().push(contribution);
		}
	}

	contributions
		.into_iter()
		.map(|(id, mut parts)| {
			parts.sort_by(f64::total_cmp);

			(id, parts.into_iter().sum::<f64>())
		})
		.collect()
}

/// Orders by descending score, ties by ascending id, and keeps at most `k` entries.
pub fn rank(scores: HashMap<String, f64>, k: usize) -> Vec<ScoredId> {
	let mut ranked: Vec<ScoredId> =
		scores.into_iter().map(|(id, score)| ScoredId { id, score }).collect();

	ranked.sort_by(cmp_ranked);
	ranked.truncate(k);

	ranked
}

pub fn cmp_ranked(a: &ScoredId, b: &ScoredId) -> Ordering {
	b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id))
}

pub fn max_possible_score(weight_sum: f64) -> f64 {
	weight_sum * MAX_SIMILARITY
}

/// `combined_score` as a percentage of the best attainable score, rounded to two decimals.
pub fn match_pct(combined_score: f64, weight_sum: f64) -> f64 {
	let max = max_possible_score(weight_sum);

	if max <= 0.0 || !combined_score.is_finite() {
		return 0.0;
	}

	let pct = (combined_score / max * 100.0).clamp(0.0, 100.0);

	(pct * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
	use super::*;

	fn hits(pairs: &[(&str, f64)]) -> Vec<ScoredId> {
		pairs.iter().map(|(id, score)| ScoredId::new(*id, *score)).collect()
	}

	#[test]
	fn weighted_sum_combines_three_signals() {
		let academic = hits(&[("A", 1.8), ("B", 1.2)]);
		let professional = hits(&[("A", 1.5), ("C", 1.9)]);
		let topic = hits(&[("C", 1.7), ("B", 1.6)]);
		let scores = aggregate([
			WeightedHits { weight: 0.2, hits: &academic },
			WeightedHits { weight: 0.3, hits: &professional },
			WeightedHits { weight: 0.5, hits: &topic },
		]);

		assert!((scores["A"] - 0.81).abs() < 1e-9);
		assert!((scores["B"] - 1.04).abs() < 1e-9);
		assert!((scores["C"] - 1.42).abs() < 1e-9);

		let ranked = rank(scores, 3);
		let order: Vec<&str> = ranked.iter().map(|entry| entry.id.as_str()).collect();

		assert_eq!(order, vec!["C", "B", "A"]);
	}

	#[test]
	fn aggregation_is_order_independent() {
		let a = hits(&[("x", 1.1), ("y", 0.3), ("z", 1.97)]);
		let b = hits(&[("x", 0.7), ("z", 1.01)]);
		let c = hits(&[("y", 1.9), ("x", 0.13), ("w", 1.5)]);
		let forward = aggregate([
			WeightedHits { weight: 0.2, hits: &a },
			WeightedHits { weight: 0.3, hits: &b },
			WeightedHits { weight: 0.5, hits: &c },
		]);
		let shuffled = aggregate([
			WeightedHits { weight: 0.5, hits: &c },
			WeightedHits { weight: 0.2, hits: &a },
			WeightedHits { weight: 0.3, hits: &b },
		]);

		assert_eq!(forward, shuffled);
	}

	#[test]
	fn missing_signal_contributes_zero() {
		let academic = hits(&[("solo", 2.0)]);
		let topic: Vec<ScoredId> = Vec::new();
		let scores = aggregate([
			WeightedHits { weight: 0.3, hits: &academic },
			WeightedHits { weight: 0.7, hits: &topic },
		]);

		assert_eq!(scores.len(), 1);
		assert!((scores["solo"] - 0.6).abs() < 1e-12);
	}

	#[test]
	fn non_finite_scores_are_ignored() {
		let noisy = hits(&[("a", f64::NAN), ("b", 1.0)]);
		let scores = aggregate([WeightedHits { weight: 1.0, hits: &noisy }]);

		assert!(!scores.contains_key("a"));
		assert_eq!(scores["b"], 1.0);
	}

	#[test]
	fn ties_break_by_ascending_id() {
		let scores = HashMap::from([
			("delta".to_string(), 1.0),
			("alpha".to_string(), 1.0),
			("charlie".to_string(), 1.5),
			("bravo".to_string(), 1.0),
		]);
		let ranked = rank(scores.clone(), 10);
		let order: Vec<&str> = ranked.iter().map(|entry| entry.id.as_str()).collect();

		assert_eq!(order, vec!["charlie", "alpha", "bravo", "delta"]);
		assert_eq!(rank(scores, 10), ranked);
	}

	#[test]
	fn rank_truncates_and_handles_empty_input() {
		let scores = HashMap::from([
			("a".to_string(), 0.1),
			("b".to_string(), 0.2),
			("c".to_string(), 0.3),
		]);
		let ranked = rank(scores, 2);

		assert_eq!(ranked.len(), 2);
		assert!(ranked[0].score >= ranked[1].score);
		assert!(rank(HashMap::new(), 5).is_empty());
		assert!(rank(HashMap::from([("a".to_string(), 1.0)]), 0).is_empty());
	}

	#[test]
	fn percentage_is_rounded_and_bounded() {
		assert_eq!(match_pct(1.42, 1.0), 71.0);
		assert_eq!(match_pct(0.81, 1.0), 40.5);
		assert_eq!(match_pct(1.0 / 3.0, 1.0), 16.67);
		assert_eq!(match_pct(2.0, 1.0), 100.0);
		assert_eq!(match_pct(0.0, 1.0), 0.0);
		assert_eq!(match_pct(2.5, 1.0), 100.0);
		assert_eq!(match_pct(1.0, 0.0), 0.0);
	}

	#[test]
	fn percentage_stays_in_range_across_attainable_scores() {
		for step in 0..=200 {
			let score = f64::from(step) / 100.0;
			let pct = match_pct(score, 1.0);

			assert!((0.0..=100.0).contains(&pct), "score {score} produced {pct}");
		}
	}
}
