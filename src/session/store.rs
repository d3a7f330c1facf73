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
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type Hook<S> = Rc<dyn Fn(&Store<S>)>;

/// A state container that tells its subscribers whenever it changes.
///
/// Everything happens synchronously on the calling thread: `notify` runs
/// every hook in registration order and only returns once they are all
/// done. Hooks are free to read and update the store, and an update from
/// inside a hook notifies again (nested). A notification that starts while
/// none is running begins a new "pass"; nested ones belong to the same pass,
/// which is what linked subscribers use to run at most once per change.
pub struct Store<S> {
	state: RefCell<S>,
	hooks: RefCell<Vec<Hook<S>>>,

	/// Number of `notify` calls currently on the stack
	depth: Cell<usize>,
	pass: Cell<u64>,
}

impl<S> Store<S> {
	pub fn new(state: S) -> Self {
		Self {
			state: RefCell::new(state),
			hooks: RefCell::new(vec![]),
			depth: Cell::new(0),
			pass: Cell::new(0),
		}
	}

	pub fn on_change<F>(&self, hook: F)
	where
		F: Fn(&Store<S>) + 'static,
	{
		self.hooks.borrow_mut().push(Rc::new(hook));
	}

	pub fn notify(&self) {
		let _depth = PassDepth::enter(self);

		// Hooks registered while notifying are picked up next time
		let hooks: Vec<Hook<S>> = self.hooks.borrow().clone();
		for hook in hooks {
			hook(self);
		}
	}

	/// Identifies the outermost notification currently (or most recently)
	/// running.
	pub fn pass(&self) -> u64 {
		self.pass.get()
	}

	pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
		f(&self.state.borrow())
	}

	/// Mutates the state, then notifies.
	pub fn update(&self, f: impl FnOnce(&mut S)) {
		f(&mut self.state.borrow_mut());
		self.notify();
	}

	pub fn snapshot(&self) -> S
	where
		S: Clone,
	{
		self.state.borrow().clone()
	}
}

/// Keeps `depth` honest even if a hook unwinds.
struct PassDepth<'a, S> {
	store: &'a Store<S>,
}

impl<'a, S> PassDepth<'a, S> {
	fn enter(store: &'a Store<S>) -> Self {
		if store.depth.get() == 0 {
			store.pass.set(store.pass.get() + 1);
		}
		store.depth.set(store.depth.get() + 1);
		Self { store }
	}
}

impl<S> Drop for PassDepth<'_, S> {
	fn drop(&mut self) {
		self.store.depth.set(self.store.depth.get() - 1);
	}
}
