use serde_json::Value;

use mm_domain::{
	backfill::Tier,
	scoring::{self, ScoredId},
};

use crate::{MatchService, Profile, with_deadline};

impl MatchService {
	/// Resolves ranked ids into caller-facing records, in rank order.
	///
	/// A record that cannot be fetched is logged and skipped.
	pub(crate) async fn materialize(
		&self,
		ranked: Vec<(ScoredId, Tier)>,
		weight_sum: f64,
	) -> Vec<Profile> {
		let timeout = self.index_timeout();
		let mut records = Vec::with_capacity(ranked.len());

		for (entry, tier) in ranked {
			let fetched = with_deadline("Profile fetch", timeout, self.index.get(&entry.id)).await;
			let mut record = match fetched {
				Ok(Some(record)) => record,
				Ok(None) => {
					tracing::warn!(
						matched_id = %entry.id,
						?tier,
						"Ranked candidate has no stored profile. Skipping."
					);

					continue;
				},
				Err(err) => {
					tracing::warn!(
						matched_id = %entry.id,
						?tier,
						error = %err,
						"Failed to fetch ranked candidate. Skipping."
					);

					continue;
				},
			};

			self.decorate(&mut record, &entry, weight_sum);
			records.push(record);
		}

		records
	}

	fn decorate(&self, record: &mut Profile, entry: &ScoredId, weight_sum: f64) {
		for field in &self.cfg.storage.qdrant.vector_fields {
			record.remove(field);
		}

		record.insert("match_score".to_string(), Value::from(entry.score));
		record.insert(
			"match_pct".to_string(),
			Value::from(scoring::match_pct(entry.score, weight_sum)),
		);
		record.insert("matched_id".to_string(), Value::String(entry.id.clone()));
	}
}
