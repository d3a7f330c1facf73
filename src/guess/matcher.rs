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
use crate::gl::transaction::Transaction;
use crate::guess::distance::DistanceCache;
use log::debug;
use std::cmp::Reverse;

pub const DEFAULT_THRESHOLD: usize = 6;
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// A historical transaction together with how far its description is from
/// what the user typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
	pub transaction: Transaction,
	pub distance: usize,
}

/// Finds the past transactions whose descriptions are closest to the one
/// being typed. Owns its distance cache, which lives as long as the session.
#[derive(Debug)]
pub struct HistoryMatcher {
	cache: DistanceCache,
	threshold: usize,
	max_results: usize,
}

impl HistoryMatcher {
	pub fn new(threshold: usize, max_results: usize) -> Self {
		Self {
			cache: DistanceCache::new(),
			threshold,
			max_results,
		}
	}

	/// Matching transactions, best first.
	pub fn find_matches(
		&mut self,
		input: &str,
		history: &TransactionHistory,
	) -> Vec<Transaction> {
		self.scored_matches(input, history)
			.into_iter()
			.map(|m| {
				debug!(
					"  {:?} at distance {}",
					m.transaction.desc(),
					m.distance
				);
				m.transaction
			})
			.collect()
	}

	/// Every transaction within the threshold, ordered by distance. Equal
	/// distances put the later date first, and equal dates put the later
	/// journal position first.
	pub fn scored_matches(
		&mut self,
		input: &str,
		history: &TransactionHistory,
	) -> Vec<Match> {
		let mut scored: Vec<(usize, usize, &Transaction)> = history
			.transactions()
			.iter()
			.enumerate()
			.filter_map(|(i, t)| {
				let d = self.cache.distance(input, t.desc());
				(d <= self.threshold).then_some((d, i, t))
			})
			.collect();

		scored.sort_by_key(|&(d, i, t)| (d, Reverse(*t.date()), Reverse(i)));
		scored.truncate(self.max_results);

		debug!(
			"{} of {} transactions match {:?} ({} cached, {} computed)",
			scored.len(),
			history.len(),
			input,
			self.cache.len(),
			self.cache.computations()
		);

		scored
			.into_iter()
			.map(|(distance, _, t)| Match {
				transaction: t.clone(),
				distance,
			})
			.collect()
	}
}

impl Default for HistoryMatcher {
	fn default() -> Self {
		Self::new(DEFAULT_THRESHOLD, DEFAULT_MAX_RESULTS)
	}
}
