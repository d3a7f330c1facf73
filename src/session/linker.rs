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
use crate::session::store::Store;
use log::debug;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Counts how often a linked guesser actually computed something.
#[derive(Clone, Debug, Default)]
pub struct LinkHandle {
	runs: Rc<Cell<usize>>,
}

impl LinkHandle {
	pub fn runs(&self) -> usize {
		self.runs.get()
	}
}

/// A guesser wired into a store: read a slice of state, compute, write the
/// result back. Writing back notifies the store again, which comes straight
/// back here; two checks keep that from looping:
///
/// - while a computation is in progress, `running` is set and any call
///   returns immediately
/// - a computation already done in the current notification pass is not
///   repeated once the nested notifications unwind
struct Link<S, I, T> {
	name: &'static str,
	read: Box<dyn Fn(&S) -> I>,
	compute: RefCell<Box<dyn FnMut(I) -> Guess<T>>>,
	write: Box<dyn Fn(&mut S, Option<T>)>,

	running: Cell<bool>,
	last_pass: Cell<Option<u64>>,
	runs: Rc<Cell<usize>>,
}

impl<S, I, T> Link<S, I, T> {
	fn run(&self, store: &Store<S>) {
		let Some(_guard) = Reentrancy::enter(&self.running) else {
			debug!("{}: already running, skipped", self.name);
			return;
		};

		if self.last_pass.get() == Some(store.pass()) {
			debug!("{}: up to date for pass {}", self.name, store.pass());
			return;
		}
		self.last_pass.set(Some(store.pass()));
		self.runs.set(self.runs.get() + 1);

		let input = store.read(|state| (self.read)(state));
		let guess = {
			let mut compute = self.compute.borrow_mut();
			(*compute)(input)
		};
		debug!("{}: success={}", self.name, guess.success());

		store.update(|state| (self.write)(state, guess.into_option()));
	}
}

/// Clears the flag on every way out of a computation, including a failed
/// guess or a panic in one of the closures.
struct Reentrancy<'a> {
	flag: &'a Cell<bool>,
}

impl<'a> Reentrancy<'a> {
	fn enter(flag: &'a Cell<bool>) -> Option<Self> {
		if flag.get() {
			return None;
		}
		flag.set(true);
		Some(Self { flag })
	}
}

impl Drop for Reentrancy<'_> {
	fn drop(&mut self) {
		self.flag.set(false);
	}
}

/// Subscribes a guesser to the store. A failed guess is written back as
/// `None` so stale suggestions disappear.
pub fn link<S, I, T>(
	store: &Store<S>,
	name: &'static str,
	read: impl Fn(&S) -> I + 'static,
	compute: impl FnMut(I) -> Guess<T> + 'static,
	write: impl Fn(&mut S, Option<T>) + 'static,
) -> LinkHandle
where
	S: 'static,
	I: 'static,
	T: 'static,
{
	let runs = Rc::new(Cell::new(0));
	let link = Link {
		name,
		read: Box::new(read),
		compute: RefCell::new(Box::new(compute)),
		write: Box::new(write),
		running: Cell::new(false),
		last_pass: Cell::new(None),
		runs: runs.clone(),
	};

	store.on_change(move |store| link.run(store));
	LinkHandle { runs }
}
