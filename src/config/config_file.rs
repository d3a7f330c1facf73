/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	pub guess: Option<Guess>,
	pub statement: Option<Statement>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Guess {
	/// Commodity assumed when an amount is typed without one, and used for
	/// the fallback amount when nothing better is known.
	pub default_commodity: Option<String>,

	/// Largest edit distance between descriptions that still counts as a
	/// match.
	pub match_threshold: Option<usize>,
	pub max_matches: Option<usize>,
}

/// Column mapping for CSV bank statements. Columns are 0-based.
#[derive(Debug, Default, Deserialize)]
pub struct Statement {
	pub delimiter: Option<char>,
	pub has_headers: Option<bool>,
	pub date_column: Option<usize>,
	pub description_column: Option<usize>,
	pub amount_column: Option<usize>,

	/// If unset, every row uses the default commodity.
	pub commodity_column: Option<usize>,

	/// chrono format string, i.e. `%d.%m.%Y`
	pub date_format: Option<String>,

	/// The journal account the statement belongs to
	pub account: Option<String>,

	/// Negate amounts, for exports that list spending as positive
	pub invert: Option<bool>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_config() {
		let config: Config = toml::from_str("").unwrap();
		assert!(config.guess.is_none());
		assert!(config.statement.is_none());
	}

	#[test]
	fn test_full_config() {
		let config: Config = toml::from_str(
			r#"
			[guess]
			default_commodity = "USD"
			match_threshold = 4
			max_matches = 10

			[statement]
			delimiter = ";"
			has_headers = false
			date_column = 0
			description_column = 2
			amount_column = 3
			date_format = "%d.%m.%Y"
			account = "Assets:Checking"
			invert = true
			"#,
		)
		.unwrap();

		let guess = config.guess.unwrap();
		assert_eq!(guess.default_commodity.as_deref(), Some("USD"));
		assert_eq!(guess.match_threshold, Some(4));
		assert_eq!(guess.max_matches, Some(10));

		let statement = config.statement.unwrap();
		assert_eq!(statement.delimiter, Some(';'));
		assert_eq!(statement.has_headers, Some(false));
		assert_eq!(statement.description_column, Some(2));
		assert!(statement.commodity_column.is_none());
		assert_eq!(statement.account.as_deref(), Some("Assets:Checking"));
		assert_eq!(statement.invert, Some(true));
	}
}
