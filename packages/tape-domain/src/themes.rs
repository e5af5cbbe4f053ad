use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

use crate::model::Document;

/// Text surface a document exposes to theme matching.
pub fn theme_text(doc: &Document) -> String {
	let mut out = String::with_capacity(doc.title.len() + doc.event_type.len() + 16);

	out.push_str(&doc.title);
	out.push(' ');
	out.push_str(&doc.event_type.replace('_', " "));

	for mention in &doc.mentions {
		out.push(' ');
		out.push_str(mention);
	}

	out
}

/// Themes from `themes` that match `text`, in the order they were configured.
///
/// A single-word theme matches on word boundaries; a multi-word theme
/// matches as a normalized phrase.
pub fn matched_themes<'a>(text: &str, themes: &'a [String]) -> Vec<&'a str> {
	if themes.is_empty() {
		return Vec::new();
	}

	let normalized = normalize(text);
	let words: HashSet<&str> = normalized.unicode_words().collect();
	let mut out = Vec::new();

	for theme in themes {
		let theme_norm = normalize(theme);
		let mut theme_words = theme_norm.unicode_words();
		let Some(first) = theme_words.next() else {
			continue;
		};

		let matched = if theme_words.next().is_none() {
			words.contains(first)
		} else {
			phrase_matches(&normalized, &theme_norm)
		};

		if matched {
			out.push(theme.as_str());
		}
	}

	out
}

/// Fraction of the client's themes matched by `text`, in [0, 1].
pub fn theme_score(text: &str, themes: &[String]) -> f32 {
	if themes.is_empty() {
		return 0.0;
	}

	matched_themes(text, themes).len() as f32 / themes.len() as f32
}

fn normalize(text: &str) -> String {
	text.to_lowercase()
}

fn phrase_matches(normalized_text: &str, normalized_phrase: &str) -> bool {
	let text_words: Vec<&str> = normalized_text.unicode_words().collect();
	let phrase_words: Vec<&str> = normalized_phrase.unicode_words().collect();

	if phrase_words.is_empty() || text_words.len() < phrase_words.len() {
		return false;
	}

	text_words.windows(phrase_words.len()).any(|window| window == phrase_words.as_slice())
}
