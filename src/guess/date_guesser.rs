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
use crate::guess::Guess;
use crate::import::statement::StatementEntry;
use crate::util::clock::Clock;
use crate::util::date::Date;
use regex::Regex;

/// Turns whatever the user typed into the date field into a full date.
///
/// Accepted forms, tried in this order:
/// - nothing: the statement line's date if there is one, else today
/// - `2024-11-15`: exactly that date
/// - `15`: that day of the current month
/// - `11-15`: that day of the current year
/// - `-3`: three days ago
pub struct DateGuesser {
	full: Regex,
	day: Regex,
	month_day: Regex,
	days_ago: Regex,
}

impl DateGuesser {
	pub fn new() -> Self {
		Self {
			full: Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").unwrap(),
			day: Regex::new(r"^(\d{1,2})$").unwrap(),
			month_day: Regex::new(r"^(\d{1,2})-(\d{1,2})$").unwrap(),
			days_ago: Regex::new(r"^-(\d+)$").unwrap(),
		}
	}

	pub fn guess(
		&self,
		text: &str,
		clock: &dyn Clock,
		hint: Option<&StatementEntry>,
	) -> Guess<Date> {
		let text = text.trim();

		if text.is_empty() {
			return match hint {
				Some(entry) => Guess::found(entry.date),
				None => Guess::found(clock.today()),
			};
		}

		let today = clock.today();
		let rules: [fn(&Self, &str, Date) -> Option<Date>; 4] = [
			Self::full_date,
			Self::day_of_month,
			Self::month_and_day,
			Self::days_ago,
		];

		rules
			.iter()
			.find_map(|rule| rule(self, text, today))
			.into()
	}

	fn full_date(&self, text: &str, _: Date) -> Option<Date> {
		let caps = self.full.captures(text)?;
		Date::from_ymd(
			caps[1].parse().ok()?,
			caps[2].parse().ok()?,
			caps[3].parse().ok()?,
		)
	}

	fn day_of_month(&self, text: &str, today: Date) -> Option<Date> {
		let caps = self.day.captures(text)?;
		Date::from_ymd(today.year(), today.month(), caps[1].parse().ok()?)
	}

	fn month_and_day(&self, text: &str, today: Date) -> Option<Date> {
		let caps = self.month_day.captures(text)?;
		Date::from_ymd(
			today.year(),
			caps[1].parse().ok()?,
			caps[2].parse().ok()?,
		)
	}

	fn days_ago(&self, text: &str, today: Date) -> Option<Date> {
		let caps = self.days_ago.captures(text)?;
		Some(today.minus_days(caps[1].parse().ok()?))
	}
}
