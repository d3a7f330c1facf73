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
pub mod account_guesser;
pub mod amount_guesser;
pub mod date_guesser;
pub mod distance;
pub mod matcher;

/// The outcome of one inference: either a suggested value or nothing. A
/// missing guess is never an error; the user simply gets no suggestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Guess<T> {
	value: Option<T>,
}

impl<T> Guess<T> {
	pub fn found(value: T) -> Self {
		Self { value: Some(value) }
	}

	pub fn none() -> Self {
		Self { value: None }
	}

	pub fn success(&self) -> bool {
		self.value.is_some()
	}

	pub fn into_option(self) -> Option<T> {
		self.value
	}
}

impl<T> From<Option<T>> for Guess<T> {
	fn from(value: Option<T>) -> Self {
		Self { value }
	}
}

/// One rule of a composite guesser. Rules are tried in order and the first
/// success wins.
pub type Strategy<C, T> = fn(&C) -> Guess<T>;

pub fn first_success<C, T>(
	context: &C,
	strategies: &[Strategy<C, T>],
) -> Guess<T> {
	strategies
		.iter()
		.map(|strategy| strategy(context))
		.find(Guess::success)
		.unwrap_or_else(Guess::none)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn never(_: &u32) -> Guess<u32> {
		Guess::none()
	}

	fn double(n: &u32) -> Guess<u32> {
		Guess::found(n * 2)
	}

	fn square(n: &u32) -> Guess<u32> {
		Guess::found(n * n)
	}

	#[test]
	fn test_first_success_wins() {
		assert_eq!(
			first_success(&3, &[never, double, square]),
			Guess::found(6)
		);
		assert_eq!(first_success(&3, &[square, double]), Guess::found(9));
	}

	#[test]
	fn test_all_failing() {
		assert_eq!(first_success(&3, &[never, never]), Guess::none());
		assert_eq!(first_success::<u32, u32>(&3, &[]), Guess::none());
	}

	struct Shelf<'a> {
		books: &'a [&'a str],
	}

	fn first_book(shelf: &Shelf) -> Guess<String> {
		shelf.books.first().map(|b| b.to_string()).into()
	}

	fn longest_title(shelf: &Shelf) -> Guess<String> {
		shelf
			.books
			.iter()
			.filter(|b| b.len() > 4)
			.max_by_key(|b| b.len())
			.map(|b| b.to_string())
			.into()
	}

	#[test]
	fn test_borrowing_context() {
		let strategies: [Strategy<Shelf, String>; 2] =
			[|s| longest_title(s), |s| first_book(s)];

		let books = ["Emma", "Middlemarch", "Ulysses"];
		let shelf = Shelf { books: &books };
		assert_eq!(
			first_success(&shelf, &strategies),
			Guess::found("Middlemarch".to_string())
		);

		let short = ["Emma"];
		let shelf = Shelf { books: &short };
		assert_eq!(
			first_success(&shelf, &strategies),
			Guess::found("Emma".to_string())
		);
	}

	#[test]
	fn test_accessors() {
		let guess = Guess::found("x");
		assert!(guess.success());
		assert_eq!(guess.into_option(), Some("x"));
		assert!(!Guess::<u32>::none().success());
		assert_eq!(Guess::from(Some(1)).into_option(), Some(1));
	}
}
