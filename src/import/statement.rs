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
use crate::config::config_file::Statement;
use crate::util::amount::Amount;
use crate::util::date::Date;
use anyhow::{anyhow, bail, Error};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{info, warn};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::str::FromStr;

pub const PLACEHOLDER: &str = "Assets:Statement";

/// One line of an imported bank statement. Used only as a hint for the
/// transaction being entered; it is never written anywhere by itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatementEntry {
	pub account: String,
	pub date: Date,
	pub desc: String,
	pub amount: Amount,
}

/// Reads CSV bank exports using the column mapping from the config file.
/// Defaults describe a plain `date,description,amount` export with a header.
pub struct StatementReader {
	delimiter: u8,
	has_headers: bool,
	date_column: usize,
	description_column: usize,
	amount_column: usize,
	commodity_column: Option<usize>,
	date_format: String,
	account: String,
	invert: bool,
	default_commodity: String,
}

impl StatementReader {
	pub fn from_config(
		config: &Statement,
		default_commodity: &str,
	) -> Result<Self, Error> {
		let delimiter = config.delimiter.unwrap_or(',');
		if !delimiter.is_ascii() {
			bail!("statement delimiter must be a single ASCII character");
		}

		Ok(Self {
			delimiter: delimiter as u8,
			has_headers: config.has_headers.unwrap_or(true),
			date_column: config.date_column.unwrap_or(0),
			description_column: config.description_column.unwrap_or(1),
			amount_column: config.amount_column.unwrap_or(2),
			commodity_column: config.commodity_column,
			date_format: config
				.date_format
				.clone()
				.unwrap_or("%Y-%m-%d".to_owned()),
			account: config.account.clone().unwrap_or(PLACEHOLDER.to_owned()),
			invert: config.invert.unwrap_or(false),
			default_commodity: default_commodity.to_string(),
		})
	}

	pub fn read_path(&self, path: &str) -> Result<Vec<StatementEntry>, Error> {
		let file = File::open(path)
			.map_err(|e| anyhow!("failed to open {}: {}", path, e))?;
		let entries = self.read(file)?;
		info!("read {} statement entries from {}", entries.len(), path);
		Ok(entries)
	}

	/// Rows that cannot be understood are skipped with a warning, so that one
	/// odd line (i.e. a summary row) does not block the whole statement.
	pub fn read<R: Read>(
		&self,
		reader: R,
	) -> Result<Vec<StatementEntry>, Error> {
		let mut csv_reader = ReaderBuilder::new()
			.delimiter(self.delimiter)
			.has_headers(self.has_headers)
			.trim(Trim::All)
			.flexible(true)
			.from_reader(reader);

		let first_row = if self.has_headers { 2 } else { 1 };
		let mut entries = vec![];

		for (i, result) in csv_reader.records().enumerate() {
			let row = i + first_row;
			let record = result?;
			match self.parse_record(&record) {
				Ok(entry) => entries.push(entry),
				Err(e) => warn!("statement row {}: {}", row, e),
			}
		}

		Ok(entries)
	}

	fn parse_record(
		&self,
		record: &StringRecord,
	) -> Result<StatementEntry, Error> {
		let field = |column: usize, name: &str| {
			record
				.get(column)
				.ok_or_else(|| anyhow!("missing {} column {}", name, column))
		};

		let date_str = field(self.date_column, "date")?;
		let date = NaiveDate::parse_from_str(date_str, &self.date_format)
			.map_err(|e| anyhow!("invalid date {}: {}", date_str, e))?;

		let amount_str = field(self.amount_column, "amount")?.replace(',', "");
		let quantity = Decimal::from_str(&amount_str)
			.map_err(|e| anyhow!("invalid amount {}: {}", amount_str, e))?;

		let commodity = match self.commodity_column {
			Some(column) => field(column, "commodity")?,
			None => self.default_commodity.as_str(),
		};

		let mut amount = Amount::new(quantity, commodity);
		if self.invert {
			amount = -amount;
		}

		Ok(StatementEntry {
			account: self.account.clone(),
			date: Date::from_naive(date),
			desc: field(self.description_column, "description")?.to_string(),
			amount,
		})
	}
}
