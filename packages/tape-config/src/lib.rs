mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, DecayRates, Feed, GraphProximity, Postgres, Qdrant, ScoreWeights, Scoring, Security,
	Service, Storage, Traversal,
};

use std::{fs, path::Path};

const WEIGHT_SUM_TOLERANCE: f32 = 1e-6;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.collection must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.vector_dim == 0 {
		return Err(Error::Validation {
			message: "storage.qdrant.vector_dim must be greater than zero.".to_string(),
		});
	}
	if cfg.feed.default_limit == 0 {
		return Err(Error::Validation {
			message: "feed.default_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.feed.max_limit < cfg.feed.default_limit {
		return Err(Error::Validation {
			message: "feed.max_limit must not be less than feed.default_limit.".to_string(),
		});
	}
	if cfg.feed.overshoot_factor == 0 {
		return Err(Error::Validation {
			message: "feed.overshoot_factor must be greater than zero.".to_string(),
		});
	}
	if cfg.feed.source_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "feed.source_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.traversal.max_fanout == 0 {
		return Err(Error::Validation {
			message: "traversal.max_fanout must be greater than zero.".to_string(),
		});
	}

	validate_weights(&cfg.scoring.weights)?;
	validate_proximity(&cfg.scoring.proximity)?;
	validate_decay(&cfg.scoring.decay_per_hour)?;

	if !cfg.scoring.theme_boost_weight.is_finite() {
		return Err(Error::Validation {
			message: "scoring.theme_boost_weight must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.scoring.theme_boost_weight) {
		return Err(Error::Validation {
			message: "scoring.theme_boost_weight must be in the range 0.0-1.0.".to_string(),
		});
	}

	Ok(())
}

fn validate_weights(weights: &ScoreWeights) -> Result<()> {
	for (label, weight) in [
		("semantic", weights.semantic),
		("graph", weights.graph),
		("trust", weights.trust),
		("recency", weights.recency),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation {
				message: format!("scoring.weights.{label} must be a finite number."),
			});
		}
		if !(0.0..=1.0).contains(&weight) {
			return Err(Error::Validation {
				message: format!("scoring.weights.{label} must be in the range 0.0-1.0."),
			});
		}
	}

	let sum = weights.semantic + weights.graph + weights.trust + weights.recency;

	if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
		return Err(Error::Validation {
			message: format!("scoring.weights must sum to 1.0; got {sum}."),
		});
	}

	Ok(())
}

fn validate_proximity(proximity: &GraphProximity) -> Result<()> {
	for (label, value) in [("one_hop", proximity.one_hop), ("two_hop", proximity.two_hop)] {
		if !value.is_finite() {
			return Err(Error::Validation {
				message: format!("scoring.proximity.{label} must be a finite number."),
			});
		}
		if !(0.0..=1.0).contains(&value) {
			return Err(Error::Validation {
				message: format!("scoring.proximity.{label} must be in the range 0.0-1.0."),
			});
		}
	}
	if proximity.two_hop > proximity.one_hop {
		return Err(Error::Validation {
			message: "scoring.proximity.two_hop must not exceed scoring.proximity.one_hop."
				.to_string(),
		});
	}

	Ok(())
}

fn validate_decay(decay: &DecayRates) -> Result<()> {
	let rates = [
		("platinum", decay.platinum),
		("gold", decay.gold),
		("silver", decay.silver),
		("bronze", decay.bronze),
		("standard", decay.standard),
	];

	for (label, rate) in rates {
		if !rate.is_finite() {
			return Err(Error::Validation {
				message: format!("scoring.decay_per_hour.{label} must be a finite number."),
			});
		}
		if rate < 0.0 {
			return Err(Error::Validation {
				message: format!("scoring.decay_per_hour.{label} must be zero or greater."),
			});
		}
	}

	for window in rates.windows(2) {
		let (lower_label, lower) = window[0];
		let (higher_label, higher) = window[1];

		if lower >= higher {
			return Err(Error::Validation {
				message: format!(
					"scoring.decay_per_hour must increase strictly from platinum to standard; {lower_label} ({lower}) is not below {higher_label} ({higher})."
				),
			});
		}
	}

	Ok(())
}
