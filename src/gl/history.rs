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
use crate::gl::transaction::Transaction;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Every transaction recorded in the journal, oldest first. Cloning is cheap;
/// the list itself is shared and never modified after construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionHistory {
	transactions: Rc<Vec<Transaction>>,
}

impl TransactionHistory {
	pub fn new(transactions: Vec<Transaction>) -> Self {
		Self {
			transactions: Rc::new(transactions),
		}
	}

	pub fn transactions(&self) -> &[Transaction] {
		&self.transactions
	}

	pub fn is_empty(&self) -> bool {
		self.transactions.is_empty()
	}

	pub fn len(&self) -> usize {
		self.transactions.len()
	}

	/// The last transaction recorded, which is not necessarily the one with
	/// the latest date.
	pub fn most_recent(&self) -> Option<&Transaction> {
		self.transactions.last()
	}

	/// All accounts ever posted to, sorted.
	pub fn accounts(&self) -> Vec<String> {
		self.transactions
			.iter()
			.flat_map(|t| t.postings().iter().map(|p| p.account.clone()))
			.collect::<BTreeSet<_>>()
			.into_iter()
			.collect()
	}

	/// Returns a new history with the transaction appended.
	pub fn with(&self, transaction: Transaction) -> Self {
		let mut transactions = (*self.transactions).clone();
		transactions.push(transaction);
		Self::new(transactions)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::gl::transaction::Posting;
	use crate::util::amount::Amount;
	use crate::util::date::Date;
	use rust_decimal_macros::dec;

	fn txn(desc: &str, accounts: &[&str]) -> Transaction {
		let postings = accounts
			.iter()
			.map(|a| Posting::new(a, Amount::new(dec!(0), "EUR")))
			.collect();
		Transaction::new(Date::from_str("2024-11-15").unwrap(), desc, postings)
			.unwrap()
	}

	#[test]
	fn test_most_recent_is_last_recorded() {
		let history = TransactionHistory::new(vec![
			txn("First", &["Expenses:A"]),
			txn("Second", &["Expenses:B"]),
		]);
		assert_eq!(history.most_recent().unwrap().desc(), "Second");
		assert!(TransactionHistory::default().most_recent().is_none());
	}

	#[test]
	fn test_accounts_are_distinct_and_sorted() {
		let history = TransactionHistory::new(vec![
			txn("First", &["Expenses:B", "Assets:Cash"]),
			txn("Second", &["Expenses:A", "Assets:Cash"]),
		]);
		assert_eq!(
			history.accounts(),
			vec!["Assets:Cash", "Expenses:A", "Expenses:B"]
		);
	}

	#[test]
	fn test_with_leaves_original_untouched() {
		let history = TransactionHistory::new(vec![txn("First", &["A:B"])]);
		let extended = history.with(txn("Second", &["A:C"]));
		assert_eq!(history.len(), 1);
		assert_eq!(extended.len(), 2);
	}
}
