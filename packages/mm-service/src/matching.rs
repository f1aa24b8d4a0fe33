use serde::{Deserialize, Serialize};

use crate::{MatchRequest, MatchService, Profile, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchResponse {
	pub user_id: String,
	pub matches: Vec<Profile>,
	pub total_matches: usize,
	pub search_type: String,
	pub message: String,
}

impl MatchService {
	/// Ranks the configured `match` populations against the caller's texts.
	pub async fn match_candidates(&self, req: MatchRequest) -> Result<MatchResponse> {
		let use_case = &self.cfg.use_cases.matching;
		let outcome = self.execute(use_case, req).await?;
		let search_type = outcome.search_type(&use_case.labels);
		let message = outcome.message(&use_case.labels);

		Ok(MatchResponse {
			user_id: outcome.user_id,
			total_matches: outcome.records.len(),
			matches: outcome.records,
			search_type,
			message,
		})
	}
}
