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
use crate::config::config_file::{Config, Statement};
use crate::gl::transaction::PostingInput;
use crate::import::statement::{StatementEntry, StatementReader};
use crate::parsing::filesystem::Filesystem;
use crate::session::entry_state::{GuessSettings, Session};
use crate::session::prompt::Prompt;
use crate::util::amount::AmountParser;
use crate::util::clock::{Clock, FixedClock, SystemClock};
use crate::util::date::Date;
use anyhow::{anyhow, bail, Error};
use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use std::io;
use std::path::Path;

mod config;
mod gl;
mod guess;
mod import;
mod parsing;
mod session;
mod util;

#[derive(Parser)]
#[command(
	name = "quickentry",
	version = "0.3",
	about = "Fast entry of plain text accounting transactions"
)]
struct Cli {
	/// The command to execute
	#[command(subcommand)]
	command: Directive,

	// -----------
	// -- FLAGS --
	// -----------
	/// Specifies the journal file
	#[arg(short)]
	file: String,

	/// Custom config file location (default: ~/.config/quickentry/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Bank statement (CSV) to take hints from
	#[arg(short, long)]
	statement: Option<String>,

	/// First statement entry to use as a hint, counting from 1
	#[arg(short, long, default_value_t = 1)]
	row: usize,

	/// Pretend today is this date (YYYY-MM-DD)
	#[arg(long, hide = true)]
	today: Option<String>,
}

#[derive(Subcommand)]
enum Directive {
	/// Enter a new transaction interactively and append it to the journal
	Add,

	/// Print what would be suggested for the given input
	Guess {
		/// Date as typed
		#[arg(long, default_value = "", allow_hyphen_values = true)]
		date: String,

		/// Description as typed
		#[arg(long, default_value = "")]
		desc: String,

		/// Postings already entered, as ACCOUNT=AMOUNT (AMOUNT may be empty)
		#[arg(short, long)]
		posting: Vec<String>,

		/// Amount text of the posting being entered
		#[arg(long, default_value = "", allow_hyphen_values = true)]
		amount: String,
	},

	/// List every account used in the journal
	Accounts,
}

fn main() -> Result<(), Error> {
	env_logger::init();
	let args = Cli::parse();

	let mut parser = parsing::parser::Parser::new();
	let history = parser.parse(&args.file)?;
	if history.is_empty() {
		warn!(
			"{} has no transactions; only dates and amounts can be guessed",
			args.file
		);
	}

	let fs = Filesystem::new();

	match &args.command {
		Directive::Accounts => {
			for account in history.accounts() {
				println!("{}", account);
			}
		},
		Directive::Add => {
			let config = fs.get_config(args.config.as_ref())?;
			let settings = guess_settings(&config);
			let default_commodity = settings.default_commodity.clone();

			let hints = statement_hints(&args, &config, &default_commodity)?;
			let mut hints = hints.into_iter();
			let session = Session::new(
				history.clone(),
				hints.next(),
				clock(&args)?,
				settings,
			);

			let stdin = io::stdin();
			let mut prompt = Prompt::new(stdin.lock(), io::stdout());
			let mut history = history;

			loop {
				let transaction =
					prompt.enter_transaction(&session, &default_commodity)?;

				prompt.say(format!("\n{}", transaction))?;
				if prompt.confirm(&format!("Append to {}?", args.file), true)? {
					fs.append(Path::new(&args.file), &transaction.to_string())?;
					info!("appended to {}", args.file);
					history = history.with(transaction);
				} else {
					prompt.say("Discarded")?;
				}

				if !prompt.confirm("Enter another transaction?", false)? {
					break;
				}
				session.reset(history.clone(), hints.next());
			}
		},
		Directive::Guess {
			date,
			desc,
			posting,
			amount,
		} => {
			let config = fs.get_config(args.config.as_ref())?;
			let settings = guess_settings(&config);
			let default_commodity = settings.default_commodity.clone();

			let hint = statement_hints(&args, &config, &default_commodity)?
				.into_iter()
				.next();
			let session = Session::new(history, hint, clock(&args)?, settings);

			let amounts = AmountParser::new();
			session.set_date_text(date);
			session.set_description(desc);
			for p in posting {
				session.push_posting(parse_posting(
					p,
					&amounts,
					&default_commodity,
				)?);
			}
			session.set_amount_text(amount);
			print_guesses(&session);
		},
	}

	Ok(())
}

fn guess_settings(config: &Config) -> GuessSettings {
	config
		.guess
		.as_ref()
		.map(GuessSettings::from)
		.unwrap_or_default()
}

fn clock(args: &Cli) -> Result<Box<dyn Clock>, Error> {
	Ok(match &args.today {
		Some(today) => Box::new(FixedClock(Date::from_str(today)?)),
		None => Box::new(SystemClock),
	})
}

/// Statement entries from the requested row onwards, or nothing if no
/// statement was given.
fn statement_hints(
	args: &Cli,
	config: &Config,
	default_commodity: &str,
) -> Result<Vec<StatementEntry>, Error> {
	let Some(path) = &args.statement else {
		return Ok(vec![]);
	};

	let defaults = Statement::default();
	let reader = StatementReader::from_config(
		config.statement.as_ref().unwrap_or(&defaults),
		default_commodity,
	)?;
	let mut entries = reader.read_path(path)?;

	if args.row == 0 || args.row > entries.len() {
		bail!(
			"Statement {} has {} entries; no entry {}",
			path,
			entries.len(),
			args.row
		);
	}
	Ok(entries.split_off(args.row - 1))
}

/// Reads `ACCOUNT=AMOUNT`; an empty amount leaves it for balancing.
fn parse_posting(
	text: &str,
	amounts: &AmountParser,
	default_commodity: &str,
) -> Result<PostingInput, Error> {
	let (account, amount) = text.split_once('=').ok_or_else(|| {
		anyhow!("Posting must look like ACCOUNT=AMOUNT: {}", text)
	})?;

	let account = account.trim();
	if account.is_empty() {
		bail!("Posting without account: {}", text);
	}

	let amount = amount.trim();
	if amount.is_empty() {
		return Ok(PostingInput::new(Some(account), None));
	}

	let parsed = amounts
		.parse(amount, default_commodity)
		.ok_or_else(|| anyhow!("Invalid amount: {}", amount))?;
	Ok(PostingInput::new(Some(account), Some(parsed)))
}

fn print_guesses(session: &Session) {
	let state = session.state();
	let none = || "-".to_string();

	println!(
		"date:    {}",
		state.date_guess.map(|d| d.to_string()).unwrap_or_else(none)
	);
	println!("account: {}", state.account_guess.unwrap_or_else(none));
	println!(
		"amount:  {}",
		state.amount_guess.map(|a| a.to_string()).unwrap_or_else(none)
	);

	println!("matches: {}", state.matches.len());
	for transaction in &state.matches {
		println!("  {} {}", transaction.date(), transaction.desc());
	}

	let links = session.links();
	debug!(
		"recomputed matcher {}x, account {}x, amount {}x, date {}x",
		links.matcher.runs(),
		links.account.runs(),
		links.amount.runs(),
		links.date.runs()
	);
}
