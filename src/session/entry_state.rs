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
use crate::config::config_file;
use crate::gl::history::TransactionHistory;
use crate::gl::transaction::{PostingInput, Transaction};
use crate::guess::account_guesser::{self, AccountContext};
use crate::guess::amount_guesser::{
	AmountContext, AmountGuesser, DEFAULT_COMMODITY,
};
use crate::guess::date_guesser::DateGuesser;
use crate::guess::matcher::{
	HistoryMatcher, DEFAULT_MAX_RESULTS, DEFAULT_THRESHOLD,
};
use crate::guess::Guess;
use crate::import::statement::StatementEntry;
use crate::session::linker::{link, LinkHandle};
use crate::session::store::Store;
use crate::util::amount::Amount;
use crate::util::clock::Clock;
use crate::util::date::Date;

/// Everything about the transaction being entered: what the user typed so
/// far and what the guessers currently suggest.
#[derive(Clone, Debug, Default)]
pub struct EntryState {
	pub history: TransactionHistory,
	pub hint: Option<StatementEntry>,

	pub date_text: String,
	pub description: String,
	/// Postings accepted so far, first one first
	pub entered: Vec<PostingInput>,
	/// Raw text of the amount field of the posting being typed
	pub amount_text: String,

	/// Best match first
	pub matches: Vec<Transaction>,
	pub date_guess: Option<Date>,
	pub account_guess: Option<String>,
	pub amount_guess: Option<Amount>,
}

#[derive(Clone, Debug)]
pub struct GuessSettings {
	pub default_commodity: String,
	pub match_threshold: usize,
	pub max_matches: usize,
}

impl Default for GuessSettings {
	fn default() -> Self {
		Self {
			default_commodity: DEFAULT_COMMODITY.to_string(),
			match_threshold: DEFAULT_THRESHOLD,
			max_matches: DEFAULT_MAX_RESULTS,
		}
	}
}

impl From<&config_file::Guess> for GuessSettings {
	fn from(config: &config_file::Guess) -> Self {
		let defaults = GuessSettings::default();
		Self {
			default_commodity: config
				.default_commodity
				.clone()
				.unwrap_or(defaults.default_commodity),
			match_threshold: config
				.match_threshold
				.unwrap_or(defaults.match_threshold),
			max_matches: config.max_matches.unwrap_or(defaults.max_matches),
		}
	}
}

/// How often each linked guesser has computed, for diagnostics.
#[derive(Clone, Debug)]
pub struct SessionLinks {
	pub matcher: LinkHandle,
	pub account: LinkHandle,
	pub amount: LinkHandle,
	pub date: LinkHandle,
}

/// One transaction being entered. Owns the store and wires every guesser to
/// it; callers only ever change input fields and read guesses back.
pub struct Session {
	store: Store<EntryState>,
	links: SessionLinks,
}

impl Session {
	pub fn new(
		history: TransactionHistory,
		hint: Option<StatementEntry>,
		clock: Box<dyn Clock>,
		settings: GuessSettings,
	) -> Self {
		let store = Store::new(EntryState {
			history,
			hint,
			..Default::default()
		});

		// Registration order is evaluation order: matches have to be fresh
		// before the account and amount guessers read them.
		let mut history_matcher =
			HistoryMatcher::new(settings.match_threshold, settings.max_matches);
		let matcher = link(
			&store,
			"matcher",
			|s: &EntryState| (s.description.clone(), s.history.clone()),
			move |(description, history)| {
				let found =
					history_matcher.find_matches(&description, &history);
				Guess::found(found)
			},
			|s, matches| s.matches = matches.unwrap_or_default(),
		);

		let account = link(
			&store,
			"account",
			|s: &EntryState| {
				(
					s.matches.clone(),
					s.entered.clone(),
					s.history.clone(),
					s.description.clone(),
				)
			},
			|(matches, entered, history, description)| {
				account_guesser::guess(&AccountContext {
					matches: &matches,
					entered: &entered,
					history: &history,
					description: &description,
				})
			},
			|s, guess| s.account_guess = guess,
		);

		let amounts = AmountGuesser::new();
		let default_commodity = settings.default_commodity;
		let amount = link(
			&store,
			"amount",
			|s: &EntryState| {
				(
					s.amount_text.clone(),
					s.entered.clone(),
					s.matches.clone(),
					s.hint.clone(),
				)
			},
			move |(text, entered, matches, hint)| {
				amounts.guess(&AmountContext {
					text: &text,
					entered: &entered,
					matches: &matches,
					hint: hint.as_ref(),
					default_commodity: &default_commodity,
				})
			},
			|s, guess| s.amount_guess = guess,
		);

		let dates = DateGuesser::new();
		let date = link(
			&store,
			"date",
			|s: &EntryState| (s.date_text.clone(), s.hint.clone()),
			move |(text, hint)| {
				dates.guess(&text, clock.as_ref(), hint.as_ref())
			},
			|s, guess| s.date_guess = guess,
		);

		let session = Self {
			store,
			links: SessionLinks {
				matcher,
				account,
				amount,
				date,
			},
		};

		// Suggestions are available before the first keystroke
		session.store.notify();
		session
	}

	pub fn set_date_text(&self, text: &str) {
		self.store.update(|s| s.date_text = text.to_string());
	}

	pub fn set_description(&self, text: &str) {
		self.store.update(|s| s.description = text.to_string());
	}

	pub fn set_amount_text(&self, text: &str) {
		self.store.update(|s| s.amount_text = text.to_string());
	}

	/// Accepts the posting being typed and starts on the next one.
	pub fn push_posting(&self, posting: PostingInput) {
		self.store.update(|s| {
			s.entered.push(posting);
			s.amount_text.clear();
		});
	}

	/// Starts over on a new transaction, keeping history and guessers (and
	/// with them the distance cache).
	pub fn reset(
		&self,
		history: TransactionHistory,
		hint: Option<StatementEntry>,
	) {
		self.store.update(|s| {
			*s = EntryState {
				history,
				hint,
				..Default::default()
			}
		});
	}

	pub fn state(&self) -> EntryState {
		self.store.snapshot()
	}

	pub fn links(&self) -> &SessionLinks {
		&self.links
	}
}
