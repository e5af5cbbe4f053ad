pub mod fixtures;

use std::{
	collections::HashMap,
	sync::{
		Arc, Mutex,
		atomic::{AtomicBool, Ordering},
	},
};

use color_eyre::eyre;
use uuid::Uuid;

use tape_domain::{Client, DiscoveryPath, Document, GraphHit, Holding, VectorHit};
use tape_service::{
	Adapters, BoxFuture, ClientProvider, DocumentProvider, GraphStore, VectorIndex,
};

const SUPPLY_HOP_COST: u8 = 1;
const COMPETITOR_HOP_COST: u8 = 2;

#[derive(Debug, Clone)]
pub struct InstrumentRef {
	pub instrument_id: Uuid,
	pub ticker: String,
	pub sector: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeKind {
	SuppliesTo,
	CompetesWith,
}

#[derive(Debug, Clone)]
struct Edge {
	from: Uuid,
	to: Uuid,
	kind: EdgeKind,
}

#[derive(Debug, Clone)]
struct Exposure {
	instrument_id: Uuid,
	factor_id: Uuid,
	beta: f32,
}

#[derive(Debug, Clone)]
struct Reached {
	ticker: String,
	hop_distance: u8,
	path: DiscoveryPath,
	origin_ticker: String,
	beta: Option<f32>,
}

#[derive(Default)]
struct State {
	clients: HashMap<Uuid, Client>,
	documents: HashMap<Uuid, Document>,
	instruments: HashMap<Uuid, InstrumentRef>,
	edges: Vec<Edge>,
	exposures: Vec<Exposure>,
	similarities: Vec<VectorHit>,
}

/// In-memory stand-ins for the graph store, vector index, and metadata
/// providers. The graph fake runs the same frontier-walk contract as the
/// Postgres adapter over fixture edges, and re-reads the client's portfolio
/// on every traversal.
#[derive(Default)]
pub struct InMemoryStores {
	state: Mutex<State>,
	pub fail_graph: AtomicBool,
	pub fail_vectors: AtomicBool,
}
impl InMemoryStores {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn adapters(self: &Arc<Self>) -> Adapters {
		Adapters::new(self.clone(), self.clone(), self.clone(), self.clone())
	}

	pub fn instrument(&self, ticker: &str, sector: &str) -> InstrumentRef {
		let mut state = self.lock();

		if let Some(existing) =
			state.instruments.values().find(|instrument| instrument.ticker == ticker)
		{
			return existing.clone();
		}

		let instrument = InstrumentRef {
			instrument_id: Uuid::new_v4(),
			ticker: ticker.to_string(),
			sector: sector.to_string(),
		};

		state.instruments.insert(instrument.instrument_id, instrument.clone());

		instrument
	}

	pub fn add_supply_edge(&self, from: &InstrumentRef, to: &InstrumentRef) {
		self.lock().edges.push(Edge {
			from: from.instrument_id,
			to: to.instrument_id,
			kind: EdgeKind::SuppliesTo,
		});
	}

	pub fn add_competitor_edge(&self, a: &InstrumentRef, b: &InstrumentRef) {
		self.lock().edges.push(Edge {
			from: a.instrument_id,
			to: b.instrument_id,
			kind: EdgeKind::CompetesWith,
		});
	}

	pub fn add_factor_exposure(&self, instrument: &InstrumentRef, factor_id: Uuid, beta: f32) {
		self.lock().exposures.push(Exposure {
			instrument_id: instrument.instrument_id,
			factor_id,
			beta,
		});
	}

	pub fn insert_document(&self, doc: Document) {
		self.lock().documents.insert(doc.doc_id, doc);
	}

	pub fn insert_client(&self, client: Client) {
		self.lock().clients.insert(client.client_id, client);
	}

	pub fn set_portfolio(&self, client_id: Uuid, portfolio: Vec<Holding>) {
		if let Some(client) = self.lock().clients.get_mut(&client_id) {
			client.portfolio = portfolio;
		}
	}

	pub fn set_similarity(&self, doc_id: Uuid, similarity: f32) {
		let mut state = self.lock();

		state.similarities.retain(|hit| hit.doc_id != doc_id);
		state.similarities.push(VectorHit { doc_id, similarity });
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, State> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}
}

fn traverse_sync(state: &State, client_id: Uuid, max_hops: u8, max_fanout: u32) -> Vec<GraphHit> {
	let Some(client) = state.clients.get(&client_id) else {
		return Vec::new();
	};

	let mut origin_ids: Vec<Uuid> = client
		.portfolio
		.iter()
		.map(|holding| holding.instrument_id)
		.chain(client.watchlist.iter().map(|item| item.instrument_id))
		.collect();

	origin_ids.sort();
	origin_ids.dedup();

	let mut reached: HashMap<Uuid, Reached> = HashMap::new();
	let mut frontier = Vec::new();

	for origin_id in &origin_ids {
		let Some(instrument) = state.instruments.get(origin_id) else {
			continue;
		};

		reached.insert(
			*origin_id,
			Reached {
				ticker: instrument.ticker.clone(),
				hop_distance: 0,
				path: DiscoveryPath::Direct,
				origin_ticker: instrument.ticker.clone(),
				beta: None,
			},
		);
		frontier.push(*origin_id);
	}

	while !frontier.is_empty() {
		let mut next = Vec::new();

		for node in frontier {
			let Some(entry) = reached.get(&node).cloned() else {
				continue;
			};
			let mut neighbors: Vec<(Uuid, u8, DiscoveryPath)> = state
				.edges
				.iter()
				.filter_map(|edge| {
					let neighbor = if edge.from == node {
						edge.to
					} else if edge.to == node {
						edge.from
					} else {
						return None;
					};
					let (cost, path) = match edge.kind {
						EdgeKind::SuppliesTo => (SUPPLY_HOP_COST, DiscoveryPath::SupplyChain),
						EdgeKind::CompetesWith =>
							(COMPETITOR_HOP_COST, DiscoveryPath::Competitor),
					};

					Some((neighbor, cost, path))
				})
				.collect();

			neighbors.sort_by_key(|(neighbor, ..)| *neighbor);

			for (neighbor, cost, edge_path) in neighbors.into_iter().take(max_fanout as usize) {
				let new_hop = entry.hop_distance.saturating_add(cost);

				if new_hop > max_hops {
					continue;
				}
				if reached.get(&neighbor).is_some_and(|existing| existing.hop_distance <= new_hop)
				{
					continue;
				}
				let Some(instrument) = state.instruments.get(&neighbor) else {
					continue;
				};
				let path =
					if entry.path == DiscoveryPath::Direct { edge_path } else { entry.path };

				reached.insert(
					neighbor,
					Reached {
						ticker: instrument.ticker.clone(),
						hop_distance: new_hop,
						path,
						origin_ticker: entry.origin_ticker.clone(),
						beta: None,
					},
				);
				next.push(neighbor);
			}
		}

		frontier = next;
	}

	for origin_id in &origin_ids {
		let Some(origin) = reached.get(origin_id).cloned() else {
			continue;
		};

		for exposure in state.exposures.iter().filter(|e| e.instrument_id == *origin_id) {
			for other in state
				.exposures
				.iter()
				.filter(|e| e.factor_id == exposure.factor_id && e.instrument_id != *origin_id)
			{
				if reached.contains_key(&other.instrument_id) {
					continue;
				}
				let Some(instrument) = state.instruments.get(&other.instrument_id) else {
					continue;
				};

				reached.insert(
					other.instrument_id,
					Reached {
						ticker: instrument.ticker.clone(),
						hop_distance: 1,
						path: DiscoveryPath::Factor,
						origin_ticker: origin.origin_ticker.clone(),
						beta: Some(exposure.beta * other.beta),
					},
				);
			}
		}
	}

	let mut doc_ids: Vec<Uuid> = state.documents.keys().copied().collect();

	doc_ids.sort();

	let mut hits = Vec::new();

	for doc_id in doc_ids {
		let doc = &state.documents[&doc_id];

		for edge in &doc.affects {
			let Some(entry) = reached.get(&edge.instrument_id) else {
				continue;
			};

			hits.push(GraphHit {
				doc_id,
				instrument_id: edge.instrument_id,
				ticker: entry.ticker.clone(),
				hop_distance: entry.hop_distance,
				path: entry.path,
				origin_ticker: entry.origin_ticker.clone(),
				beta: entry.beta,
			});
		}
	}

	hits
}

impl GraphStore for InMemoryStores {
	fn traverse<'a>(
		&'a self,
		client_id: Uuid,
		max_hops: u8,
		max_fanout: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<GraphHit>>> {
		Box::pin(async move {
			if self.fail_graph.load(Ordering::SeqCst) {
				return Err(eyre::eyre!("graph store offline"));
			}

			Ok(traverse_sync(&self.lock(), client_id, max_hops, max_fanout))
		})
	}
}

impl VectorIndex for InMemoryStores {
	fn similarity_search<'a>(
		&'a self,
		_embedding: &'a [f32],
		top_n: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<VectorHit>>> {
		Box::pin(async move {
			if self.fail_vectors.load(Ordering::SeqCst) {
				return Err(eyre::eyre!("vector index offline"));
			}

			let mut hits = self.lock().similarities.clone();

			hits.sort_by(|a, b| {
				b.similarity
					.partial_cmp(&a.similarity)
					.unwrap_or(std::cmp::Ordering::Equal)
					.then_with(|| a.doc_id.cmp(&b.doc_id))
			});
			hits.truncate(top_n as usize);

			Ok(hits)
		})
	}
}

impl DocumentProvider for InMemoryStores {
	fn get_documents<'a>(
		&'a self,
		doc_ids: &'a [Uuid],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Document>>> {
		Box::pin(async move {
			let state = self.lock();

			Ok(doc_ids.iter().filter_map(|doc_id| state.documents.get(doc_id).cloned()).collect())
		})
	}
}

impl ClientProvider for InMemoryStores {
	fn get_client<'a>(
		&'a self,
		client_id: Uuid,
	) -> BoxFuture<'a, color_eyre::Result<Option<Client>>> {
		Box::pin(async move { Ok(self.lock().clients.get(&client_id).cloned()) })
	}
}
