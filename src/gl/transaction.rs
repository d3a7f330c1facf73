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
use crate::util::amount::Amount;
use crate::util::date::Date;
use anyhow::{bail, Error};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

/// One account/amount line of a confirmed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Posting {
	pub account: String,
	pub amount: Amount,
}

impl Posting {
	pub fn new(account: &str, amount: Amount) -> Self {
		Self {
			account: account.to_string(),
			amount,
		}
	}
}

/// A posting that is still being typed in. Either half may be missing until
/// the user settles on it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostingInput {
	pub account: Option<String>,
	pub amount: Option<Amount>,
}

impl PostingInput {
	pub fn new(account: Option<&str>, amount: Option<Amount>) -> Self {
		Self {
			account: account.map(str::to_string),
			amount,
		}
	}
}

/// A recorded transaction. Postings are fixed once constructed; the only way
/// to build one is through `Transaction::new`, which rejects an empty set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
	date: Date,
	desc: String,
	postings: Vec<Posting>,
}

impl Transaction {
	pub fn new(
		date: Date,
		desc: &str,
		postings: Vec<Posting>,
	) -> Result<Self, Error> {
		if postings.is_empty() {
			bail!("Transaction has no postings")
		}
		if let Some(p) = postings.iter().find(|p| p.account.is_empty()) {
			bail!("Account is empty (amount {})", p.amount)
		}

		Ok(Self {
			date,
			desc: desc.to_string(),
			postings,
		})
	}

	/// Assembles a transaction from in-progress inputs. Every input needs an
	/// account; at most one may leave its amount off, in which case it takes
	/// whatever balances the rest.
	pub fn from_inputs(
		date: Date,
		desc: &str,
		inputs: &[PostingInput],
	) -> Result<Self, Error> {
		let mut postings = Vec::with_capacity(inputs.len());
		let mut elided: Option<usize> = None;

		for (i, input) in inputs.iter().enumerate() {
			let account = match &input.account {
				Some(a) if !a.is_empty() => a.clone(),
				_ => bail!("Posting {} has no account", i + 1),
			};
			match &input.amount {
				Some(amount) => postings.push(Posting {
					account,
					amount: amount.clone(),
				}),
				None => {
					if elided.is_some() {
						bail!("Only one posting may omit its amount")
					}
					elided = Some(postings.len());
					postings.push(Posting {
						account,
						amount: Amount::zero(""),
					});
				},
			}
		}

		if let Some(index) = elided {
			let others: Vec<Posting> = postings
				.iter()
				.enumerate()
				.filter(|&(i, _)| i != index)
				.map(|(_, p)| p.clone())
				.collect();
			let imbalances = imbalances(&others)?;
			match imbalances.len() {
				0 => {},
				1 => {
					let (commodity, value) = &imbalances[0];
					postings[index].amount = Amount::new(-*value, commodity);
				},
				_ => bail!("Cannot infer an amount across several commodities"),
			}
		}

		let out = Self::new(date, desc, postings)?;
		if !imbalances(&out.postings)?.is_empty() {
			bail!("Unbalanced transaction")
		}
		Ok(out)
	}

	pub fn date(&self) -> &Date {
		&self.date
	}

	pub fn desc(&self) -> &str {
		&self.desc
	}

	pub fn postings(&self) -> &[Posting] {
		&self.postings
	}
}

/// Find all commodities that don't sum to zero, with amounts
pub fn imbalances(
	postings: &[Posting],
) -> Result<Vec<(String, Decimal)>, Error> {
	let mut balances: BTreeMap<String, Decimal> = BTreeMap::new();

	for posting in postings {
		let balance = balances
			.entry(posting.amount.commodity.clone())
			.or_insert(Decimal::ZERO);
		*balance = match balance.checked_add(posting.amount.quantity) {
			Some(sum) => sum,
			None => bail!("Amount overflow in {}", posting.amount.commodity),
		};
	}

	Ok(balances
		.into_iter()
		.filter(|(_, value)| !value.is_zero())
		.collect())
}

impl fmt::Display for Transaction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "{} {}", self.date, self.desc)?;

		let account_width = self
			.postings
			.iter()
			.map(|p| p.account.len())
			.max()
			.unwrap_or(0);

		let amounts: Vec<String> =
			self.postings.iter().map(|p| p.amount.to_string()).collect();
		let amount_width = amounts.iter().map(|a| a.len()).max().unwrap_or(0);

		for (posting, amount) in self.postings.iter().zip(amounts) {
			writeln!(
				f,
				"\t{:<account_width$}  {:>amount_width$}",
				posting.account,
				amount,
				account_width = account_width,
				amount_width = amount_width
			)?;
		}

		Ok(())
	}
}
