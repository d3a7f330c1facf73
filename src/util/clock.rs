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
use crate::util::date::Date;
use chrono::Local;

/// Source of "today". Injected wherever a guess depends on the current date
/// so that guesses can be reproduced.
pub trait Clock {
	fn today(&self) -> Date;
}

/// The local calendar date of the machine.
pub struct SystemClock;

impl Clock for SystemClock {
	fn today(&self) -> Date {
		Date::from_naive(Local::now().date_naive())
	}
}

/// Always reports the same date.
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
	fn today(&self) -> Date {
		self.0
	}
}
