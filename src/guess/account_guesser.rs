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
use crate::gl::history::TransactionHistory;
use crate::gl::transaction::{PostingInput, Transaction};
use crate::guess::{first_success, Guess, Strategy};
use log::debug;

/// Everything the account guess may look at. Matches are ordered best-first.
pub struct AccountContext<'a> {
	pub matches: &'a [Transaction],
	pub entered: &'a [PostingInput],
	pub history: &'a TransactionHistory,
	pub description: &'a str,
}

/// Suggests the account for the next posting. Transactions with similar
/// descriptions tend to repeat the same accounts in the same order, so the
/// best match is asked first; failing that, the last recorded transaction
/// gives at least a plausible starting point.
pub fn guess(context: &AccountContext) -> Guess<String> {
	debug!(
		"account {} of {:?}: {} matches",
		context.entered.len() + 1,
		context.description,
		context.matches.len()
	);

	let strategies: [Strategy<AccountContext, String>; 2] = [
		|c| same_position_in_best_match(c),
		|c| first_account_of_most_recent(c),
	];
	first_success(context, &strategies)
}

fn same_position_in_best_match(context: &AccountContext) -> Guess<String> {
	context
		.matches
		.first()
		.and_then(|best| best.postings().get(context.entered.len()))
		.map(|posting| posting.account.clone())
		.into()
}

fn first_account_of_most_recent(context: &AccountContext) -> Guess<String> {
	context
		.history
		.most_recent()
		.and_then(|t| t.postings().first())
		.map(|posting| posting.account.clone())
		.into()
}
