use serde::{Deserialize, Serialize};

use crate::{MatchRequest, MatchService, Profile, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
	pub user_id: String,
	pub recommendations: Vec<Profile>,
	pub total_recs: usize,
	pub message: String,
}

impl MatchService {
	/// Primary population first, topped up from the secondary one when it falls short.
	pub async fn recommend(&self, req: MatchRequest) -> Result<RecommendResponse> {
		let use_case = &self.cfg.use_cases.recommend;
		let outcome = self.execute(use_case, req).await?;
		let message = outcome.message(&use_case.labels);

		Ok(RecommendResponse {
			user_id: outcome.user_id,
			total_recs: outcome.records.len(),
			recommendations: outcome.records,
			message,
		})
	}
}
