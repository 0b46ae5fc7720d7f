use std::{
    cell::{Ref, RefCell, RefMut},
    mem::ManuallyDrop,
    rc::Rc,
};

use derive_ex::derive_ex;
use serde::Serialize;

use crate::{
    core::{Runtime, SinkBindings},
    SameValue,
};


/// Similar to `Rc<RefCell<T>>`, but with added functionality to observe changes.
///
/// Reading the value inside an effect subscribes that effect.
/// Writing a different value calls every subscribed effect before the write returns.
#[derive_ex(Clone, bound())]
pub struct State<T: 'static>(Rc<StateNode<T>>);

impl<T: 'static> State<T> {
    /// Create a new `State` with the given initial value.
    pub fn new(rt: &Runtime, value: T) -> Self {
        Self(Rc::new(StateNode {
            rt: rt.clone(),
            sinks: SinkBindings::new(),
            value: RefCell::new(value),
        }))
    }

    /// Borrows the current value and adds a dependency on this `State` to the running effect.
    ///
    /// Writing to this `State` while the borrow is alive panics.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.bind();
        self.0.value.borrow()
    }

    /// Calls `f` with the current value and adds a dependency on this `State` to the running effect.
    pub fn with<U>(&self, f: impl FnOnce(&T) -> U) -> U {
        f(&self.borrow())
    }

    /// Gets the current value and adds a dependency on this `State` to the running effect.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.borrow().clone()
    }

    /// Gets the current value without adding a dependency.
    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.0.value.borrow().clone()
    }

    /// Sets the value and calls the subscribed effects.
    ///
    /// Nothing happens if `value` is the same value as the current one (see [`SameValue`]).
    pub fn set(&self, value: T)
    where
        T: SameValue,
    {
        {
            let mut current = self.0.value.borrow_mut();
            if current.same_value(&value) {
                return;
            }
            *current = value;
        }
        self.0.sinks.notify();
    }

    /// Computes the next value from the current one, then behaves like [`set`](Self::set).
    pub fn update(&self, f: impl FnOnce(&T) -> T)
    where
        T: SameValue,
    {
        let value = f(&self.0.value.borrow());
        self.set(value);
    }

    /// Mutably borrows the state.
    ///
    /// If the value was mutably dereferenced, the subscribed effects are called when the borrow ends,
    /// whether or not the value actually changed.
    pub fn borrow_mut(&self) -> StateRefMut<'_, T> {
        StateRefMut {
            value: ManuallyDrop::new(self.0.value.borrow_mut()),
            is_dirty: false,
            node: &self.0,
        }
    }

    /// Returns the read accessor and write mutator of this state.
    pub fn split(&self) -> (ReadSignal<T>, WriteSignal<T>) {
        (ReadSignal(self.clone()), WriteSignal(self.clone()))
    }

    /// Number of effects currently subscribed to this state.
    pub fn subscriber_count(&self) -> usize {
        self.0.sinks.len()
    }
}
impl<T: std::fmt::Debug> std::fmt::Debug for State<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt_debug(f)
    }
}
impl<T> Serialize for State<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        match self.0.value.try_borrow() {
            Ok(value) => T::serialize(&*value, serializer),
            Err(_) => Err(serde::ser::Error::custom("borrowed")),
        }
    }
}

/// Read accessor of a signal.
#[derive_ex(Clone, bound())]
pub struct ReadSignal<T: 'static>(State<T>);

impl<T: 'static> ReadSignal<T> {
    /// Gets the current value and adds a dependency on this signal to the running effect.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.get()
    }
    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.0.get_untracked()
    }
    pub fn with<U>(&self, f: impl FnOnce(&T) -> U) -> U {
        self.0.with(f)
    }
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }
    pub fn subscriber_count(&self) -> usize {
        self.0.subscriber_count()
    }
}
impl<T: std::fmt::Debug> std::fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
    }
}
impl<T: Serialize> Serialize for ReadSignal<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        self.0.serialize(serializer)
    }
}

/// Write mutator of a signal.
#[derive_ex(Clone, bound())]
pub struct WriteSignal<T: 'static>(State<T>);

impl<T: 'static> WriteSignal<T> {
    /// Sets the value and calls the subscribed effects unless it is the same value as the current one.
    pub fn set(&self, value: T)
    where
        T: SameValue,
    {
        self.0.set(value)
    }
    pub fn update(&self, f: impl FnOnce(&T) -> T)
    where
        T: SameValue,
    {
        self.0.update(f)
    }
    pub fn borrow_mut(&self) -> StateRefMut<'_, T> {
        self.0.borrow_mut()
    }
}
impl<T: std::fmt::Debug> std::fmt::Debug for WriteSignal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
    }
}

struct StateNode<T: 'static> {
    rt: Runtime,
    sinks: Rc<SinkBindings>,
    value: RefCell<T>,
}
impl<T: 'static> StateNode<T> {
    fn bind(&self) {
        self.sinks.bind(&self.rt);
    }
    fn fmt_debug(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result
    where
        T: std::fmt::Debug,
    {
        match self.value.try_borrow() {
            Ok(value) => std::fmt::Debug::fmt(&*value, f),
            Err(_) => write!(f, "<borrowed>"),
        }
    }
}

pub struct StateRefMut<'a, T: 'static> {
    value: ManuallyDrop<RefMut<'a, T>>,
    is_dirty: bool,
    node: &'a StateNode<T>,
}
impl<T> std::ops::Deref for StateRefMut<'_, T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.value
    }
}
impl<T> std::ops::DerefMut for StateRefMut<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.is_dirty = true;
        &mut self.value
    }
}
impl<T> Drop for StateRefMut<'_, T> {
    fn drop(&mut self) {
        // SAFETY: `value` is not used after this point.
        unsafe { ManuallyDrop::drop(&mut self.value) };
        if self.is_dirty {
            self.node.sinks.notify();
        }
    }
}
