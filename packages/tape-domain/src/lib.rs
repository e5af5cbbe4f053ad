pub mod decay;
pub mod model;
pub mod policy;
pub mod themes;

pub use model::{
	AffectEdge, Channel, Client, Direction, DiscoveryPath, Document, GraphHit, Holding,
	ImpactTier, InvestmentPolicy, Magnitude, Source, VectorHit, WatchItem,
};
