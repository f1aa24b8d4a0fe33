use std::time::Duration;

use tokio::task::JoinSet;

use mm_config::{SignalInput, UseCase, UseCaseLabels};
use mm_domain::{
	backfill::{self, NextRound, Tier},
	plan,
	scoring::{self, ScoredId, WeightedHits},
};

use crate::{
	Error, MatchRequest, MatchService, Profile, Result, request::ValidatedRequest, with_deadline,
};

/// Query vector for one configured signal.
#[derive(Clone, Debug)]
pub(crate) struct SignalVector {
	pub(crate) field: String,
	pub(crate) weight: f64,
	pub(crate) vector: Vec<f32>,
}

/// Result of one use-case run, before labelling.
pub(crate) struct Outcome {
	pub(crate) user_id: String,
	pub(crate) records: Vec<Profile>,
	pub(crate) fell_back: bool,
}
impl Outcome {
	/// Secondary label only when fallback records are returned; an empty response reports the
	/// primary search like its message does.
	pub(crate) fn search_type(&self, labels: &UseCaseLabels) -> String {
		match (self.fell_back && !self.records.is_empty(), labels.secondary_search_type.as_ref()) {
			(true, Some(secondary)) => secondary.clone(),
			_ => labels.primary_search_type.clone(),
		}
	}

	pub(crate) fn message(&self, labels: &UseCaseLabels) -> String {
		if self.records.is_empty() {
			return labels.empty.clone();
		}

		match (self.fell_back, labels.secondary.as_ref()) {
			(true, Some(secondary)) => secondary.clone(),
			_ => labels.found.clone(),
		}
	}
}

impl MatchService {
	pub(crate) async fn execute(&self, use_case: &UseCase, req: MatchRequest) -> Result<Outcome> {
		let req = req.validate(use_case)?;
		let profile =
			with_deadline("Profile lookup", self.index_timeout(), self.index.get(&req.user_id))
				.await?
				.ok_or_else(|| Error::NotFound {
					message: format!("Could not find user_id={}.", req.user_id),
				})?;
		let topic = self.resolve_topic(&req, &profile);
		let signals = self.embed_signals(use_case, &req, &topic).await?;
		let primary = self.rank_population(&signals, &use_case.primary, req.top_k).await?;
		let (ranked, fell_back) = match backfill::next_round(
			use_case.strategy,
			req.top_k,
			primary.len(),
		) {
			NextRound::Done => (backfill::concat(primary, Vec::new()), false),
			NextRound::Backfill { remaining } => {
				let secondary =
					self.rank_population(&signals, &use_case.secondary, remaining).await?;

				(backfill::concat(primary, secondary), false)
			},
			NextRound::Fallback => {
				let secondary =
					self.rank_population(&signals, &use_case.secondary, req.top_k).await?;

				(backfill::concat(Vec::new(), secondary), true)
			},
		};

		tracing::debug!(
			user_id = %req.user_id,
			primary = ranked.iter().filter(|(_, tier)| *tier == Tier::Primary).count(),
			secondary = ranked.iter().filter(|(_, tier)| *tier == Tier::Secondary).count(),
			fell_back,
			"Ranked candidates."
		);

		let weight_sum = use_case.signals.iter().map(|signal| signal.weight).sum::<f64>();
		let records = self.materialize(ranked, weight_sum).await;

		Ok(Outcome { user_id: req.user_id, records, fell_back })
	}

	fn resolve_topic(&self, req: &ValidatedRequest, profile: &Profile) -> String {
		if let Some(topic) = req.topic.as_ref() {
			return topic.clone();
		}

		profile
			.get(&self.cfg.storage.qdrant.topic_field)
			.and_then(|value| value.as_str())
			.unwrap_or_default()
			.to_string()
	}

	/// Embeds every distinct signal input in one batched provider call.
	pub(crate) async fn embed_signals(
		&self,
		use_case: &UseCase,
		req: &ValidatedRequest,
		topic: &str,
	) -> Result<Vec<SignalVector>> {
		let mut inputs: Vec<SignalInput> = Vec::with_capacity(use_case.signals.len());

		for signal in &use_case.signals {
			if !inputs.contains(&signal.input) {
				inputs.push(signal.input);
			}
		}

		let texts: Vec<String> =
			inputs.iter().map(|input| signal_text(*input, req, topic)).collect();
		let cfg = &self.cfg.providers.embedding;
		let vectors = with_deadline(
			"Embedding",
			Duration::from_millis(cfg.timeout_ms),
			self.providers.embedding.embed(cfg, &texts),
		)
		.await?;

		if vectors.len() != texts.len() {
			return Err(Error::Provider {
				message: format!(
					"Embedding provider returned {} vectors for {} inputs.",
					vectors.len(),
					texts.len()
				),
			});
		}

		let dim = self.cfg.storage.qdrant.vector_dim as usize;

		if vectors.iter().any(|vector| vector.len() != dim) {
			return Err(Error::Provider {
				message: "Embedding vector dimension mismatch.".to_string(),
			});
		}

		let mut out = Vec::with_capacity(use_case.signals.len());

		for signal in &use_case.signals {
			let Some(position) = inputs.iter().position(|input| *input == signal.input) else {
				continue;
			};

			out.push(SignalVector {
				field: signal.field.clone(),
				weight: signal.weight,
				vector: vectors[position].clone(),
			});
		}

		Ok(out)
	}

	/// Searches every signal concurrently within `populations`, then aggregates and ranks to `k`.
	///
	/// Any failed or timed-out signal fails the whole round. Dropping the returned future aborts
	/// the searches still in flight.
	pub(crate) async fn rank_population(
		&self,
		signals: &[SignalVector],
		populations: &[String],
		k: u32,
	) -> Result<Vec<ScoredId>> {
		let known_fields = &self.cfg.storage.qdrant.vector_fields;
		let timeout = self.index_timeout();
		let mut searches = JoinSet::new();

		for (position, signal) in signals.iter().enumerate() {
			let query =
				plan::plan(known_fields, &signal.field, signal.vector.clone(), k, populations)?;
			let index = self.index.clone();

			searches.spawn(async move {
				let hits = with_deadline("Similarity search", timeout, index.search(&query)).await;

				(position, hits)
			});
		}

		let mut per_signal: Vec<Vec<ScoredId>> = vec![Vec::new(); signals.len()];

		while let Some(joined) = searches.join_next().await {
			let (position, hits) = joined.map_err(|err| Error::Index {
				message: format!("Similarity search task failed: {err}"),
			})?;

			per_signal[position] = hits?;
		}

		let scores = scoring::aggregate(
			signals
				.iter()
				.zip(&per_signal)
				.map(|(signal, hits)| WeightedHits { weight: signal.weight, hits }),
		);

		Ok(scoring::rank(scores, k as usize))
	}
}

fn signal_text(input: SignalInput, req: &ValidatedRequest, topic: &str) -> String {
	match input {
		SignalInput::Academic => req.academic.clone(),
		SignalInput::Professional => req.professional.clone(),
		SignalInput::Topic => topic.to_string(),
		SignalInput::ProfessionalTopic => format!("{} {}", req.professional, topic),
	}
}
