use crate::pool::{TermKind, TermPool};

/// The theme's own metadata and term lists. `languages[0]` is the primary language.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Theme {
	pub title: String,
	pub description: String,
	languages: Vec<String>,
	pub keywords: TermPool,
	pub required_words: TermPool,
	pub excluded_words: TermPool,
}
impl Theme {
	pub fn with_languages(languages: Vec<String>) -> Self {
		let mut theme = Self::default();

		theme.set_languages(languages);

		theme
	}

	pub fn languages(&self) -> &[String] {
		&self.languages
	}

	pub fn primary_language(&self) -> Option<&str> {
		self.languages.first().map(String::as_str)
	}

	pub fn additional_languages(&self) -> &[String] {
		self.languages.get(1..).unwrap_or_default()
	}

	pub fn has_additional_languages(&self) -> bool {
		self.languages.len() > 1
	}

	/// Replaces the language list, dropping blanks and case-insensitive repeats.
	pub fn set_languages(&mut self, languages: Vec<String>) {
		let mut out: Vec<String> = Vec::with_capacity(languages.len());

		for code in languages {
			let code = code.trim();

			if !code.is_empty() && !out.iter().any(|known| known.eq_ignore_ascii_case(code)) {
				out.push(code.to_string());
			}
		}

		self.languages = out;
	}

	pub fn set_primary_language(&mut self, code: &str) -> bool {
		let code = code.trim();

		if code.is_empty() {
			return false;
		}

		let mut languages = vec![code.to_string()];

		languages.extend(
			self.additional_languages()
				.iter()
				.filter(|known| !known.eq_ignore_ascii_case(code))
				.cloned(),
		);

		if languages == self.languages {
			return false;
		}

		self.languages = languages;

		true
	}

	/// No-op for a blank code, the primary language, or a language already present.
	pub fn add_additional_language(&mut self, code: &str) -> bool {
		let code = code.trim();

		if code.is_empty() || self.languages.iter().any(|known| known.eq_ignore_ascii_case(code))
		{
			return false;
		}
		// Without a primary language the first code added becomes the primary.
		self.languages.push(code.to_string());

		true
	}

	pub fn remove_additional_language(&mut self, code: &str) -> bool {
		let Some((primary, additional)) = self.languages.split_first() else {
			return false;
		};
		let mut languages = vec![primary.clone()];

		languages.extend(
			additional.iter().filter(|known| !known.eq_ignore_ascii_case(code.trim())).cloned(),
		);

		if languages.len() == self.languages.len() {
			return false;
		}

		self.languages = languages;

		true
	}

	pub fn list(&self, kind: TermKind) -> &TermPool {
		match kind {
			TermKind::Keyword => &self.keywords,
			TermKind::Must => &self.required_words,
			TermKind::Exclude => &self.excluded_words,
		}
	}

	pub fn list_mut(&mut self, kind: TermKind) -> &mut TermPool {
		match kind {
			TermKind::Keyword => &mut self.keywords,
			TermKind::Must => &mut self.required_words,
			TermKind::Exclude => &mut self.excluded_words,
		}
	}

	pub fn lists_mut(&mut self) -> [&mut TermPool; 3] {
		[&mut self.keywords, &mut self.required_words, &mut self.excluded_words]
	}
}
