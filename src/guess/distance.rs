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
use std::collections::HashMap;

/// Memoized edit distances between pairs of strings. Pairs are stored in a
/// canonical order, so `(a, b)` and `(b, a)` share one entry.
///
/// Unbounded: a session only ever compares the handful of descriptions the
/// user types against the journal's descriptions.
#[derive(Debug, Default)]
pub struct DistanceCache {
	/// Keyed by the lesser string, then the greater one, so lookups can
	/// borrow both
	cache: HashMap<String, HashMap<String, usize>>,
	entries: usize,

	/// How many distances were actually computed rather than looked up
	computations: usize,
}

impl DistanceCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Unit-cost edit distance between `a` and `b`, counted in chars.
	pub fn distance(&mut self, a: &str, b: &str) -> usize {
		if let Some(d) = self.get(a, b) {
			return d;
		}

		let (lo, hi) = ordered(a, b);
		let d = levenshtein(lo, hi);
		self.computations += 1;
		self.entries += 1;
		self.cache
			.entry(lo.to_string())
			.or_default()
			.insert(hi.to_string(), d);
		d
	}

	pub fn get(&self, a: &str, b: &str) -> Option<usize> {
		let (lo, hi) = ordered(a, b);
		self.cache.get(lo)?.get(hi).copied()
	}

	pub fn computations(&self) -> usize {
		self.computations
	}

	/// Number of distinct pairs held
	pub fn len(&self) -> usize {
		self.entries
	}
}

fn ordered<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
	if a <= b {
		(a, b)
	} else {
		(b, a)
	}
}

/// Classic two-row dynamic programming over chars.
fn levenshtein(a: &str, b: &str) -> usize {
	let a: Vec<char> = a.chars().collect();
	let b: Vec<char> = b.chars().collect();

	if a.is_empty() {
		return b.len();
	}
	if b.is_empty() {
		return a.len();
	}

	let mut prev: Vec<usize> = (0..=b.len()).collect();
	let mut curr = vec![0; b.len() + 1];

	for (i, ca) in a.iter().enumerate() {
		curr[0] = i + 1;
		for (j, cb) in b.iter().enumerate() {
			let substitution = prev[j] + usize::from(ca != cb);
			let deletion = prev[j + 1] + 1;
			let insertion = curr[j] + 1;
			curr[j + 1] = substitution.min(deletion).min(insertion);
		}
		std::mem::swap(&mut prev, &mut curr);
	}

	prev[b.len()]
}
