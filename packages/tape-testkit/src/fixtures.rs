use time::OffsetDateTime;
use uuid::Uuid;

use tape_domain::{
	AffectEdge, Client, Direction, Document, Holding, ImpactTier, InvestmentPolicy, Magnitude,
	Source, WatchItem,
};

use crate::InstrumentRef;

pub struct DocumentBuilder {
	doc: Document,
}
impl DocumentBuilder {
	pub fn new(title: &str) -> Self {
		Self {
			doc: Document {
				doc_id: Uuid::new_v4(),
				title: title.to_string(),
				event_type: "market_update".to_string(),
				impact_tier: ImpactTier::Gold,
				impact_score: 70.0,
				created_at: OffsetDateTime::now_utc(),
				source: Source {
					source_id: Uuid::new_v4(),
					name: "newswire".to_string(),
					trust_level: 7,
				},
				affects: Vec::new(),
				mentions: Vec::new(),
			},
		}
	}

	pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
		self.doc.created_at = created_at;

		self
	}

	pub fn impact_tier(mut self, tier: ImpactTier) -> Self {
		self.doc.impact_tier = tier;

		self
	}

	pub fn impact_score(mut self, score: f32) -> Self {
		self.doc.impact_score = score;

		self
	}

	pub fn trust_level(mut self, trust_level: i16) -> Self {
		self.doc.source.trust_level = trust_level;

		self
	}

	pub fn event_type(mut self, event_type: &str) -> Self {
		self.doc.event_type = event_type.to_string();

		self
	}

	pub fn affects(
		mut self,
		instrument: &InstrumentRef,
		direction: Direction,
		magnitude: Magnitude,
	) -> Self {
		self.doc.affects.push(AffectEdge {
			instrument_id: instrument.instrument_id,
			ticker: instrument.ticker.clone(),
			sector: instrument.sector.clone(),
			direction,
			magnitude,
		});

		self
	}

	pub fn mention(mut self, mention: &str) -> Self {
		self.doc.mentions.push(mention.to_string());

		self
	}

	pub fn build(self) -> Document {
		self.doc
	}
}

pub struct ClientBuilder {
	client: Client,
}
impl ClientBuilder {
	pub fn new() -> Self {
		Self {
			client: Client {
				client_id: Uuid::new_v4(),
				groups: Vec::new(),
				portfolio: Vec::new(),
				watchlist: Vec::new(),
				mandate_text: String::new(),
				mandate_embedding: vec![0.1, 0.2, 0.3],
				min_trust: 1,
				risk_tier: "balanced".to_string(),
				ips: InvestmentPolicy {
					excluded_sectors: Vec::new(),
					esg_exclusions: Vec::new(),
					themes: Vec::new(),
				},
			},
		}
	}

	pub fn min_trust(mut self, min_trust: i16) -> Self {
		self.client.min_trust = min_trust;

		self
	}

	pub fn holds(mut self, instrument: &InstrumentRef, weight: f32) -> Self {
		self.client.portfolio.push(Holding {
			instrument_id: instrument.instrument_id,
			ticker: instrument.ticker.clone(),
			weight,
			sentiment: 0.0,
		});

		self
	}

	pub fn watches(mut self, instrument: &InstrumentRef) -> Self {
		self.client.watchlist.push(WatchItem {
			instrument_id: instrument.instrument_id,
			ticker: instrument.ticker.clone(),
		});

		self
	}

	pub fn theme(mut self, theme: &str) -> Self {
		self.client.ips.themes.push(theme.to_string());

		self
	}

	pub fn exclude_sector(mut self, sector: &str) -> Self {
		self.client.ips.excluded_sectors.push(sector.to_string());

		self
	}

	pub fn exclude_esg(mut self, event_type: &str) -> Self {
		self.client.ips.esg_exclusions.push(event_type.to_string());

		self
	}

	pub fn mandate(mut self, text: &str, embedding: Vec<f32>) -> Self {
		self.client.mandate_text = text.to_string();
		self.client.mandate_embedding = embedding;

		self
	}

	pub fn build(self) -> Client {
		self.client
	}
}

impl Default for ClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}
