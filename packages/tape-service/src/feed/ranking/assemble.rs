use std::collections::HashSet;

use time::OffsetDateTime;

use tape_domain::{Channel, DiscoveryPath};

use super::{
	candidates::Candidate,
	scoring::{ScoreBreakdown, cmp_f32_desc},
};
use crate::feed::FeedItem;

#[derive(Debug)]
pub struct RankedCandidate {
	pub candidate: Candidate,
	pub title: String,
	pub created_at: OffsetDateTime,
	pub channel: Channel,
	pub rationale: String,
	pub breakdown: ScoreBreakdown,
}

/// Final assembly: optional channel filter, the only guaranteed ordering
/// (relevance descending, then created_at descending, then doc_id), and
/// truncation to the requested limit.
///
/// A duplicate document guid here means the classifier broke its exclusivity
/// contract; that is an internal-consistency failure, not a recoverable
/// condition.
pub fn assemble_items(
	mut ranked: Vec<RankedCandidate>,
	channel_filter: Option<Channel>,
	limit: u32,
) -> Vec<FeedItem> {
	let mut seen = HashSet::with_capacity(ranked.len());

	for item in &ranked {
		assert!(
			seen.insert(item.candidate.doc_id),
			"document {} assigned to more than one channel",
			item.candidate.doc_id
		);
	}

	if let Some(channel) = channel_filter {
		ranked.retain(|item| item.channel == channel);
	}

	ranked.sort_by(|a, b| {
		cmp_f32_desc(a.breakdown.final_score, b.breakdown.final_score)
			.then_with(|| b.created_at.cmp(&a.created_at))
			.then_with(|| a.candidate.doc_id.cmp(&b.candidate.doc_id))
	});
	ranked.truncate(limit as usize);

	ranked
		.into_iter()
		.map(|item| {
			let discovered_via = item
				.candidate
				.graph
				.as_ref()
				.map(|signal| signal.path)
				.unwrap_or(DiscoveryPath::Semantic);
			let expanded_from =
				item.candidate.graph.as_ref().map(|signal| signal.origin_ticker.clone());

			FeedItem {
				doc_id: item.candidate.doc_id,
				title: item.title,
				channel: item.channel,
				relevance_score: item.breakdown.final_score,
				discovered_via,
				expanded_from,
				rationale: Some(item.rationale),
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use time::Duration;
	use uuid::Uuid;

	use super::*;

	fn ranked(
		doc_id: Uuid,
		final_score: f32,
		created_at: OffsetDateTime,
		channel: Channel,
	) -> RankedCandidate {
		RankedCandidate {
			candidate: Candidate { doc_id, graph: None, semantic: Some(final_score) },
			title: "headline".to_string(),
			created_at,
			channel,
			rationale: "test".to_string(),
			breakdown: ScoreBreakdown {
				semantic: final_score,
				graph: 0.0,
				trust: 0.0,
				recency: 0.0,
				theme_boost: 0.0,
				final_score,
			},
		}
	}

	#[test]
	fn sorts_by_score_then_recency_then_id() {
		let base = OffsetDateTime::UNIX_EPOCH + Duration::days(100);
		let older = Uuid::new_v4();
		let newer = Uuid::new_v4();
		let top = Uuid::new_v4();
		let items = assemble_items(
			vec![
				ranked(older, 0.5, base - Duration::hours(5), Channel::Maintenance),
				ranked(top, 0.9, base - Duration::hours(9), Channel::Maintenance),
				ranked(newer, 0.5, base, Channel::Opportunity),
			],
			None,
			10,
		);

		assert_eq!(
			items.iter().map(|item| item.doc_id).collect::<Vec<_>>(),
			vec![top, newer, older],
			"equal scores must order by created_at descending"
		);
	}

	#[test]
	fn truncates_to_limit() {
		let base = OffsetDateTime::UNIX_EPOCH + Duration::days(100);
		let items = assemble_items(
			(0..5)
				.map(|i| {
					ranked(Uuid::new_v4(), 0.1 * i as f32, base, Channel::Maintenance)
				})
				.collect(),
			None,
			2,
		);

		assert_eq!(items.len(), 2);
	}

	#[test]
	fn channel_filter_keeps_single_channel() {
		let base = OffsetDateTime::UNIX_EPOCH + Duration::days(100);
		let items = assemble_items(
			vec![
				ranked(Uuid::new_v4(), 0.9, base, Channel::Maintenance),
				ranked(Uuid::new_v4(), 0.8, base, Channel::Opportunity),
			],
			Some(Channel::Opportunity),
			10,
		);

		assert_eq!(items.len(), 1);
		assert_eq!(items[0].channel, Channel::Opportunity);
	}

	#[test]
	fn empty_input_is_a_valid_terminal_state() {
		assert!(assemble_items(Vec::new(), None, 10).is_empty());
	}

	#[test]
	#[should_panic(expected = "assigned to more than one channel")]
	fn duplicate_guid_is_fatal() {
		let base = OffsetDateTime::UNIX_EPOCH + Duration::days(100);
		let doc_id = Uuid::new_v4();

		assemble_items(
			vec![
				ranked(doc_id, 0.9, base, Channel::Maintenance),
				ranked(doc_id, 0.8, base, Channel::Opportunity),
			],
			None,
			10,
		);
	}

	#[test]
	fn semantic_only_items_report_semantic_discovery() {
		let base = OffsetDateTime::UNIX_EPOCH + Duration::days(100);
		let items =
			assemble_items(vec![ranked(Uuid::new_v4(), 0.4, base, Channel::Opportunity)], None, 10);

		assert_eq!(items[0].discovered_via, DiscoveryPath::Semantic);
		assert!(items[0].expanded_from.is_none());
	}
}
