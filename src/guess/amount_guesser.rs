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
use crate::gl::transaction::{PostingInput, Transaction};
use crate::guess::{first_success, Guess, Strategy};
use crate::import::statement::StatementEntry;
use crate::util::amount::{Amount, AmountParser};

pub const DEFAULT_COMMODITY: &str = "EUR";

pub struct AmountContext<'a> {
	/// Raw text of the amount field
	pub text: &'a str,
	pub entered: &'a [PostingInput],
	pub matches: &'a [Transaction],
	pub hint: Option<&'a StatementEntry>,
	pub default_commodity: &'a str,
}

/// Suggests the amount for the next posting. Unlike the other guessers this
/// always comes up with something, since a zero amount is still a useful
/// starting point to edit.
pub struct AmountGuesser {
	parser: AmountParser,
}

impl AmountGuesser {
	pub fn new() -> Self {
		Self {
			parser: AmountParser::new(),
		}
	}

	pub fn guess(&self, context: &AmountContext) -> Guess<Amount> {
		// Whatever the user typed wins, as long as it reads as an amount
		if let Some(typed) =
			self.parser.parse(context.text.trim(), context.default_commodity)
		{
			return Guess::found(typed);
		}

		let strategies: [Strategy<AmountContext, Amount>; 4] = [
			|c| balance_of_entered(c),
			|c| first_amount_of_best_match(c),
			|c| statement_amount(c),
			|c| zero_in_default_commodity(c),
		];
		first_success(context, &strategies)
	}
}

/// The amount that brings the postings so far to zero. Only applies when
/// they are all in one commodity.
fn balance_of_entered(context: &AmountContext) -> Guess<Amount> {
	let mut amounts = context.entered.iter().filter_map(|p| p.amount.clone());

	let Some(first) = amounts.next() else {
		return Guess::none();
	};

	let mut total = first;
	for amount in amounts {
		if amount.commodity != total.commodity {
			return Guess::none();
		}
		match total.checked_add(&amount) {
			Some(sum) => total = sum,
			None => return Guess::none(),
		}
	}

	Guess::found(-total)
}

fn first_amount_of_best_match(context: &AmountContext) -> Guess<Amount> {
	context
		.matches
		.first()
		.and_then(|best| best.postings().first())
		.map(|posting| posting.amount.clone())
		.into()
}

fn statement_amount(context: &AmountContext) -> Guess<Amount> {
	context.hint.map(|entry| entry.amount.clone()).into()
}

fn zero_in_default_commodity(context: &AmountContext) -> Guess<Amount> {
	Guess::found(Amount::zero(context.default_commodity))
}
