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
use regex::Regex;
use rust_decimal::Decimal;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// A decimal quantity with a commodity. The commodity may be empty for
/// unitless quantities.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Amount {
	pub commodity: String,
	pub quantity: Decimal,
}

impl Amount {
	pub fn new(quantity: Decimal, commodity: &str) -> Self {
		Self {
			quantity,
			commodity: commodity.to_string(),
		}
	}

	pub fn zero(commodity: &str) -> Self {
		Self {
			quantity: Decimal::ZERO,
			commodity: commodity.to_string(),
		}
	}

	/// Adds quantities, keeping this amount's commodity, so callers are
	/// expected to only add like commodities. None on overflow.
	pub fn checked_add(&self, rhs: &Amount) -> Option<Self> {
		Some(Self {
			quantity: self.quantity.checked_add(rhs.quantity)?,
			commodity: self.commodity.clone(),
		})
	}
}

/// Recognizes user-typed amounts of the form `[COMMODITY ]QUANTITY`, i.e.
/// `12.20` or `BRL 12.22`. Exactly one space separates the two parts and the
/// decimal mark is always '.'.
pub struct AmountParser {
	pattern: Regex,
}

impl AmountParser {
	pub fn new() -> Self {
		let re =
			Regex::new(r"^(?:([^\s\d.,+-][^\s]*) )?(-?\d+(?:\.\d+)?)$").unwrap();
		Self { pattern: re }
	}

	/// Returns None when the text is not an amount at all; a missing
	/// commodity is filled in with `default_commodity`.
	pub fn parse(&self, text: &str, default_commodity: &str) -> Option<Amount> {
		let caps = self.pattern.captures(text)?;
		let quantity = Decimal::from_str(&caps[2]).ok()?;
		let commodity =
			caps.get(1).map_or(default_commodity, |m| m.as_str());
		Some(Amount::new(quantity, commodity))
	}
}

impl Neg for Amount {
	type Output = Amount;
	fn neg(self) -> Self::Output {
		Self::Output {
			commodity: self.commodity,
			quantity: -self.quantity,
		}
	}
}

impl fmt::Display for Amount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.commodity.is_empty() {
			write!(f, "{}", self.quantity)
		} else {
			write!(f, "{} {}", self.commodity, self.quantity)
		}
	}
}
