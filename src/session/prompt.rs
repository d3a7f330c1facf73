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
use crate::session::entry_state::Session;
use crate::util::amount::AmountParser;
use crate::util::date::Date;
use anyhow::{bail, Error};
use std::fmt::Display;
use std::io::{BufRead, Write};

/// Line-based front end for a session. Every question shows the current
/// guess in brackets, and an empty answer takes it.
pub struct Prompt<R, W> {
	input: R,
	output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
	pub fn new(input: R, output: W) -> Self {
		Self { input, output }
	}

	fn ask<T: Display>(
		&mut self,
		label: &str,
		guess: Option<T>,
	) -> Result<String, Error> {
		match guess {
			Some(g) => write!(self.output, "{} [{}]: ", label, g)?,
			None => write!(self.output, "{}: ", label)?,
		}
		self.output.flush()?;

		let mut line = String::new();
		if self.input.read_line(&mut line)? == 0 {
			bail!("Input ended unexpectedly");
		}
		Ok(line.trim().to_string())
	}

	pub fn say(&mut self, message: impl Display) -> Result<(), Error> {
		writeln!(self.output, "{}", message)?;
		Ok(())
	}

	/// Yes/no question; an empty answer means `default`.
	pub fn confirm(
		&mut self,
		question: &str,
		default: bool,
	) -> Result<bool, Error> {
		let choices = if default { "Y/n" } else { "y/N" };
		let answer = self.ask(question, Some(choices))?;
		if answer.is_empty() {
			return Ok(default);
		}
		Ok(answer.eq_ignore_ascii_case("y")
			|| answer.eq_ignore_ascii_case("yes"))
	}

	/// Walks the user through one transaction. Postings are asked for until
	/// the user gives an empty account while the postings balance.
	pub fn enter_transaction(
		&mut self,
		session: &Session,
		default_commodity: &str,
	) -> Result<Transaction, Error> {
		if let Some(hint) = session.state().hint {
			self.say(format!(
				"{} {} {} ({})",
				hint.date, hint.desc, hint.amount, hint.account
			))?;
		}

		let date = self.enter_date(session)?;

		let hint_desc = session.state().hint.map(|h| h.desc);
		let mut desc = self.ask("Description", hint_desc.as_deref())?;
		if desc.is_empty() {
			desc = hint_desc.unwrap_or_default();
		}
		session.set_description(&desc);

		let amounts = AmountParser::new();
		loop {
			let state = session.state();
			let finished = balanced(&date, &desc, &state.entered);

			let label = format!("Account {}", state.entered.len() + 1);
			let guess = match finished {
				Some(_) => None,
				None => state.account_guess.clone(),
			};
			let mut account = self.ask(&label, guess.as_deref())?;

			if account.is_empty() {
				if let Some(transaction) = finished {
					return Ok(transaction);
				}
				match guess {
					Some(g) => account = g,
					None => {
						self.say("An account is required")?;
						continue;
					},
				}
			}

			let amount = loop {
				let state = session.state();
				let text = self.ask("Amount", state.amount_guess.as_ref())?;
				if text.is_empty() {
					break state.amount_guess;
				}
				if amounts.parse(&text, default_commodity).is_none() {
					self.say(format!("Not an amount: {}", text))?;
					continue;
				}
				session.set_amount_text(&text);
				break session.state().amount_guess;
			};

			session.push_posting(PostingInput::new(Some(&account), amount));
		}
	}

	fn enter_date(&mut self, session: &Session) -> Result<Date, Error> {
		loop {
			let guess = session.state().date_guess;
			let text = self.ask("Date", guess)?;

			if text.is_empty() {
				if let Some(date) = guess {
					return Ok(date);
				}
			} else {
				session.set_date_text(&text);
				if let Some(date) = session.state().date_guess {
					return Ok(date);
				}
			}

			self.say(format!("Not a date: {}", text))?;
			session.set_date_text("");
		}
	}
}

/// The transaction the postings so far would make, if they already balance.
fn balanced(
	date: &Date,
	desc: &str,
	entered: &[PostingInput],
) -> Option<Transaction> {
	if entered.len() < 2 {
		return None;
	}
	Transaction::from_inputs(*date, desc, entered).ok()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::gl::history::TransactionHistory;
	use crate::gl::transaction::Posting;
	use crate::import::statement::StatementEntry;
	use crate::session::entry_state::GuessSettings;
	use crate::util::amount::Amount;
	use crate::util::clock::FixedClock;
	use rust_decimal_macros::dec;
	use std::io::Cursor;

	fn eur(quantity: rust_decimal::Decimal) -> Amount {
		Amount::new(quantity, "EUR")
	}

	fn session() -> Session {
		let history = TransactionHistory::new(vec![Transaction::new(
			Date::from_str("2024-11-01").unwrap(),
			"Supermarket",
			vec![
				Posting::new("Expenses:Groceries", eur(dec!(23.10))),
				Posting::new("Assets:Checking", eur(dec!(-23.10))),
			],
		)
		.unwrap()]);

		Session::new(
			history,
			None,
			Box::new(FixedClock(Date::from_str("2024-11-23").unwrap())),
			GuessSettings::default(),
		)
	}

	fn run(answers: &str) -> (Result<Transaction, Error>, String) {
		let session = session();
		let mut output = vec![];
		let result = Prompt::new(Cursor::new(answers), &mut output)
			.enter_transaction(&session, "EUR");
		(result, String::from_utf8(output).unwrap())
	}

	#[test]
	fn test_accept_all_guesses() {
		// date, description, account 1, amount 1, account 2, amount 2, done
		let (result, _) = run("\nSupermarket\n\n\n\n\n\n");
		let transaction = result.unwrap();

		assert_eq!(transaction.date(), &Date::from_str("2024-11-23").unwrap());
		assert_eq!(transaction.desc(), "Supermarket");
		assert_eq!(
			transaction.postings(),
			&[
				Posting::new("Expenses:Groceries", eur(dec!(23.10))),
				Posting::new("Assets:Checking", eur(dec!(-23.10))),
			]
		);
	}

	#[test]
	fn test_typed_values_override_guesses() {
		let (result, output) =
			run("-1\nSupermarkt\nExpenses:Food\n12.20\n\n\n\n");
		let transaction = result.unwrap();

		assert_eq!(transaction.date(), &Date::from_str("2024-11-22").unwrap());
		assert_eq!(transaction.postings()[0].account, "Expenses:Food");
		assert_eq!(
			transaction.postings()[1].amount,
			Amount::new(dec!(-12.20), "EUR")
		);
		assert!(output.contains("Account 2 [Assets:Checking]: "));
		assert!(output.contains("Amount [EUR -12.20]: "));
	}

	#[test]
	fn test_rejects_bad_date_and_amount() {
		let (result, output) =
			run("someday\n\nSupermarket\n\nlots\n5\n\n\n\n");
		let transaction = result.unwrap();

		assert!(output.contains("Not a date: someday"));
		assert!(output.contains("Not an amount: lots"));
		assert_eq!(transaction.postings()[0].amount, eur(dec!(5)));
	}

	#[test]
	fn test_input_ends_early() {
		let (result, _) = run("\nSupermarket\n");
		assert!(result.is_err());
	}

	#[test]
	fn test_confirm() {
		let mut output = vec![];
		let mut prompt =
			Prompt::new(Cursor::new("\nn\nyes\n\nY\n"), &mut output);
		assert!(prompt.confirm("Save?", true).unwrap());
		assert!(!prompt.confirm("Save?", true).unwrap());
		assert!(prompt.confirm("Save?", true).unwrap());
		assert!(!prompt.confirm("Again?", false).unwrap());
		assert!(prompt.confirm("Again?", false).unwrap());
		assert!(prompt.confirm("Again?", false).is_err());
		drop(prompt);

		let output = String::from_utf8(output).unwrap();
		assert!(output.starts_with("Save? [Y/n]: "));
		assert!(output.contains("Again? [y/N]: "));
	}

	#[test]
	fn test_shows_statement_hint() {
		let session = session();
		let hint = StatementEntry {
			account: "Assets:Checking".to_string(),
			date: Date::from_str("2024-11-20").unwrap(),
			desc: "Supermarket".to_string(),
			amount: eur(dec!(-8.40)),
		};
		session.reset(session.state().history, Some(hint));

		let mut output = vec![];
		let answers = Cursor::new("\n\n\n8.40\n\n\n\n");
		let transaction = Prompt::new(answers, &mut output)
			.enter_transaction(&session, "EUR")
			.unwrap();
		let output = String::from_utf8(output).unwrap();

		assert!(output.starts_with(
			"2024-11-20 Supermarket EUR -8.40 (Assets:Checking)\n\
			Date [2024-11-20]: "
		));
		assert!(output.contains("Description [Supermarket]: "));
		assert_eq!(transaction.date(), &Date::from_str("2024-11-20").unwrap());
		assert_eq!(transaction.desc(), "Supermarket");
	}
}
