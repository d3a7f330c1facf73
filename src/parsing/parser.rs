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
use crate::parsing::filesystem::Filesystem;
use crate::util::amount::AmountParser;
use crate::util::date::Date;
use anyhow::{anyhow, bail, Error};
use log::info;
use std::io;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Reads a plain text journal into a TransactionHistory. The format is:
///
/// ```text
/// 2024-11-15 Supermarket        # header: date, then description
///     Expenses:Groceries  EUR 12.20
///     Assets:Checking           # amount omitted; balances the rest
/// ```
///
/// Blank lines separate transactions and `include other.txt` pulls in another
/// journal, relative to the including file.
pub struct Parser {
	fs: Filesystem,
	amounts: AmountParser,
}

struct PendingTransaction {
	date: Date,
	desc: String,
	postings: Vec<PostingInput>,
}

impl Parser {
	pub fn new() -> Self {
		Self {
			fs: Filesystem::new(),
			amounts: AmountParser::new(),
		}
	}

	pub fn parse(
		&mut self,
		file_path: &str,
	) -> Result<TransactionHistory, Error> {
		let mut transactions = Vec::new();
		self.parse_file(Path::new(file_path), &mut transactions)?;

		info!(
			"read {} transactions from {}",
			transactions.len(),
			file_path
		);
		Ok(TransactionHistory::new(transactions))
	}

	fn parse_file(
		&mut self,
		path: &Path,
		transactions: &mut Vec<Transaction>,
	) -> Result<(), Error> {
		self.fs.declare_file(path)?;
		let file = self.fs.open(path)?;
		let reader = io::BufReader::new(file);

		let mut pending: Option<PendingTransaction> = None;

		for (i, line) in reader.lines().enumerate() {
			let line_no = i + 1;

			// Chop comments out
			let l = line?
				.split('#')
				.next()
				.unwrap_or_default()
				.trim()
				.to_string();

			// A blank line ends the current transaction, if any
			if l.is_empty() {
				if let Some(p) = pending.take() {
					transactions.push(Self::finish(p, line_no)?);
				}
				continue;
			}

			if let Some(include) = l.strip_prefix("include ") {
				if let Some(p) = pending.take() {
					transactions.push(Self::finish(p, line_no)?);
				}
				let target = Self::resolve(path, include.trim());
				self.parse_file(&target, transactions)?;
				continue;
			}

			// Handle header lines with a date and description
			if let Some((date_str, desc)) = l.split_once(' ') {
				if let Ok(date) = Date::from_str(date_str.trim()) {
					if let Some(p) = pending.take() {
						transactions.push(Self::finish(p, line_no)?);
					}
					pending = Some(PendingTransaction {
						date,
						desc: desc.trim().to_string(),
						postings: vec![],
					});
					continue;
				}
			}

			// Make sure the line is not a date by itself
			if Date::from_str(&l).is_ok() {
				bail!(
					"Transaction without description (line {}): {}",
					line_no,
					l
				);
			}

			let Some(p) = pending.as_mut() else {
				bail!(
					"Posting outside of a transaction (line {}): {}",
					line_no,
					l
				);
			};

			let posting = self
				.parse_posting(&l)
				.map_err(|e| anyhow!("{} (line {})", e, line_no))?;
			p.postings.push(posting);
		}

		// Make sure to finish the last transaction if the file ends without an
		// empty line
		if let Some(p) = pending.take() {
			transactions.push(Self::finish(p, 0).map_err(|e| {
				anyhow!("{} in {}", e, path.display())
			})?);
		}

		Ok(())
	}

	fn parse_posting(&self, line: &str) -> Result<PostingInput, Error> {
		let mut parts = line.splitn(2, char::is_whitespace);
		let account = parts.next().unwrap_or_default();
		let amount_text = parts.next().unwrap_or_default().replace(',', "");
		let amount_text = amount_text.trim();

		if amount_text.is_empty() {
			return Ok(PostingInput::new(Some(account), None));
		}

		match self.amounts.parse(amount_text, "") {
			Some(amount) => Ok(PostingInput::new(Some(account), Some(amount))),
			None => bail!("Invalid amount: {}", amount_text),
		}
	}

	fn finish(
		p: PendingTransaction,
		line_no: usize,
	) -> Result<Transaction, Error> {
		Transaction::from_inputs(p.date, &p.desc, &p.postings).map_err(|e| {
			if line_no == 0 {
				anyhow!("{} ({} {}, at end of file)", e, p.date, p.desc)
			} else {
				anyhow!("{} ({} {}, line {})", e, p.date, p.desc, line_no)
			}
		})
	}

	fn resolve(including: &Path, target: &str) -> PathBuf {
		let target = Path::new(target);
		if target.is_absolute() {
			return target.to_path_buf();
		}
		match including.parent() {
			Some(dir) => dir.join(target),
			None => target.to_path_buf(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::util::amount::Amount;
	use rust_decimal_macros::dec;
	use std::fs;
	use tempfile::{tempdir, TempDir};

	fn write(dir: &TempDir, name: &str, content: &str) -> String {
		let path = dir.path().join(name);
		fs::write(&path, content).unwrap();
		path.to_string_lossy().to_string()
	}

	#[test]
	fn test_parses_transactions_in_order() {
		let dir = tempdir().unwrap();
		let path = write(
			&dir,
			"journal.txt",
			"# groceries\n\
			2024-11-15 Supermarket\n\
			\tExpenses:Groceries  EUR 12.20\n\
			\tAssets:Checking  EUR -12.20\n\
			\n\
			2024-11-16 Bakery # fresh\n\
			\tExpenses:Food  EUR 1,200.50\n\
			\tAssets:Cash\n",
		);

		let history = Parser::new().parse(&path).unwrap();
		assert_eq!(history.len(), 2);

		let first = &history.transactions()[0];
		assert_eq!(first.desc(), "Supermarket");
		assert_eq!(first.date().to_string(), "2024-11-15");
		assert_eq!(first.postings()[0].account, "Expenses:Groceries");

		let second = &history.transactions()[1];
		assert_eq!(second.desc(), "Bakery");
		assert_eq!(
			second.postings()[1].amount,
			Amount::new(dec!(-1200.50), "EUR")
		);
	}

	#[test]
	fn test_header_ends_previous_transaction() {
		let dir = tempdir().unwrap();
		let path = write(
			&dir,
			"journal.txt",
			"2024-11-15 One\n\tA:B  EUR 1\n\tA:C\n\
			2024-11-16 Two\n\tA:B  EUR 2\n\tA:C\n",
		);

		let history = Parser::new().parse(&path).unwrap();
		assert_eq!(history.len(), 2);
	}

	#[test]
	fn test_includes_relative_file() {
		let dir = tempdir().unwrap();
		write(&dir, "older.txt", "2024-01-01 Old\n\tA:B  EUR 1\n\tA:C\n");
		let path = write(
			&dir,
			"journal.txt",
			"include older.txt\n\n2024-11-15 New\n\tA:B  EUR 2\n\tA:C\n",
		);

		let history = Parser::new().parse(&path).unwrap();
		let descs: Vec<&str> =
			history.transactions().iter().map(|t| t.desc()).collect();
		assert_eq!(descs, vec!["Old", "New"]);
	}

	#[test]
	fn test_circular_include_fails() {
		let dir = tempdir().unwrap();
		let path = write(&dir, "a.txt", "include b.txt\n");
		write(&dir, "b.txt", "include a.txt\n");

		let result = Parser::new().parse(&path);
		assert!(result.is_err());
	}

	#[test]
	fn test_unbalanced_transaction_fails_with_line() {
		let dir = tempdir().unwrap();
		let path = write(
			&dir,
			"journal.txt",
			"2024-11-15 Broken\n\tA:B  EUR 1\n\tA:C  EUR -2\n\n",
		);

		let err = Parser::new().parse(&path).unwrap_err();
		assert!(err.to_string().contains("line 4"), "{}", err);
	}

	#[test]
	fn test_posting_outside_transaction_fails() {
		let dir = tempdir().unwrap();
		let path = write(&dir, "journal.txt", "\tA:B  EUR 1\n");
		assert!(Parser::new().parse(&path).is_err());
	}

	#[test]
	fn test_invalid_amount_fails() {
		let dir = tempdir().unwrap();
		let path = write(
			&dir,
			"journal.txt",
			"2024-11-15 X\n\tA:B  EUR twelve\n",
		);
		assert!(Parser::new().parse(&path).is_err());
	}

	#[test]
	fn test_overflowing_sum_fails() {
		let dir = tempdir().unwrap();
		let max = "79228162514264337593543950335";
		let journal = format!(
			"2024-11-15 X\n\tA:B  EUR {max}\n\tA:C  EUR {max}\n\tA:D\n"
		);
		let path = write(&dir, "journal.txt", &journal);

		let err = Parser::new().parse(&path).unwrap_err();
		assert!(err.to_string().contains("overflow"), "{}", err);
	}
}
