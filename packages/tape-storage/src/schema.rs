pub fn render_schema() -> String {
	let init = include_str!("../../../sql/init.sql");

	expand_includes(init)
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_sources.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_sources.sql")),
				"tables/002_instruments.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_instruments.sql")),
				"tables/003_instrument_aliases.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_instrument_aliases.sql")),
				"tables/004_instrument_edges.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_instrument_edges.sql")),
				"tables/005_factor_exposures.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_factor_exposures.sql")),
				"tables/006_documents.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_documents.sql")),
				"tables/007_document_affects.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_document_affects.sql")),
				"tables/008_document_mentions.sql" =>
					out.push_str(include_str!("../../../sql/tables/008_document_mentions.sql")),
				"tables/009_clients.sql" =>
					out.push_str(include_str!("../../../sql/tables/009_clients.sql")),
				"tables/010_client_holdings.sql" =>
					out.push_str(include_str!("../../../sql/tables/010_client_holdings.sql")),
				"tables/011_client_watchlist.sql" =>
					out.push_str(include_str!("../../../sql/tables/011_client_watchlist.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn schema_expands_every_include() {
		let rendered = render_schema();

		assert!(!rendered.contains("\\ir "), "Unexpanded include left in schema.");
		assert!(rendered.contains("CREATE TABLE IF NOT EXISTS documents"));
		assert!(rendered.contains("CREATE TABLE IF NOT EXISTS client_watchlist"));
	}

	#[test]
	fn schema_statements_are_semicolon_separated() {
		let rendered = render_schema();
		let statements: Vec<&str> =
			rendered.split(';').map(str::trim).filter(|s| !s.is_empty()).collect();

		assert!(statements.len() >= 11, "Expected at least one statement per table.");
	}
}
