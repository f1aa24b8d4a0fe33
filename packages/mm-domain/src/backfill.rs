//! Decisions taken after the primary population has been ranked.

use mm_config::Strategy;

use crate::scoring::ScoredId;

/// Population tier a ranked entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
	Primary,
	Secondary,
}

/// Next step once the primary ranking is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextRound {
	/// The primary ranking is final.
	Done,
	/// Rank the secondary population for `remaining` more slots and append them.
	Backfill { remaining: u32 },
	/// Replace the empty primary ranking with a full secondary ranking.
	Fallback,
}

pub fn next_round(strategy: Strategy, top_k: u32, primary_len: usize) -> NextRound {
	match strategy {
		Strategy::None => NextRound::Done,
		Strategy::Backfill => {
			let filled = u32::try_from(primary_len).unwrap_or(u32::MAX);

			if filled >= top_k {
				NextRound::Done
			} else {
				NextRound::Backfill { remaining: top_k - filled }
			}
		},
		Strategy::Fallback =>
			if primary_len == 0 {
				NextRound::Fallback
			} else {
				NextRound::Done
			},
	}
}

/// `primary ++ secondary`, tagged by tier. Secondary entries never move ahead of primary ones.
pub fn concat(primary: Vec<ScoredId>, secondary: Vec<ScoredId>) -> Vec<(ScoredId, Tier)> {
	primary
		.into_iter()
		.map(|entry| (entry, Tier::Primary))
		.chain(secondary.into_iter().map(|entry| (entry, Tier::Secondary)))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn backfill_requests_exact_shortfall() {
		assert_eq!(next_round(Strategy::Backfill, 5, 2), NextRound::Backfill { remaining: 3 });
		assert_eq!(next_round(Strategy::Backfill, 5, 0), NextRound::Backfill { remaining: 5 });
		assert_eq!(next_round(Strategy::Backfill, 5, 5), NextRound::Done);
	}

	#[test]
	fn fallback_only_triggers_on_empty_primary() {
		assert_eq!(next_round(Strategy::Fallback, 5, 0), NextRound::Fallback);
		assert_eq!(next_round(Strategy::Fallback, 5, 1), NextRound::Done);
	}

	#[test]
	fn no_strategy_is_always_done() {
		assert_eq!(next_round(Strategy::None, 5, 0), NextRound::Done);
	}

	#[test]
	fn secondary_entries_follow_primary_even_with_higher_scores() {
		let primary = vec![ScoredId::new("p1", 0.9), ScoredId::new("p2", 0.4)];
		let secondary = vec![ScoredId::new("s1", 1.9)];
		let merged = concat(primary.clone(), secondary);

		assert_eq!(merged.len(), 3);
		assert_eq!(merged[0], (primary[0].clone(), Tier::Primary));
		assert_eq!(merged[1], (primary[1].clone(), Tier::Primary));
		assert_eq!(merged[2].0.id, "s1");
		assert_eq!(merged[2].1, Tier::Secondary);
	}
}
