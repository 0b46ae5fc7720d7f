//! Low-level building blocks of the dependency graph.
//!
//! A [`Runtime`] owns the execution context stack.
//! Each signal keeps a subscriber set, and each effect keeps weak references back to the subscriber sets it joined.
//! Both sides are always updated together.
use std::{
    cell::{Cell, RefCell},
    mem::take,
    ptr,
    rc::{Rc, Weak},
};

use derive_ex::derive_ex;
use parse_display::Display;
use slabmap::SlabMap;

use crate::{effect_fn::EffectNode, Effect, ReadSignal, State, WriteSignal};

#[cfg(test)]
mod tests;

/// Reactive runtime.
///
/// Each runtime is an independent dependency graph.
/// A signal read inside an effect only subscribes that effect if both were created from the same runtime.
///
/// `Runtime` is a cheap handle; clones refer to the same graph.
#[derive_ex(Clone, Default)]
#[default(Self::new())]
pub struct Runtime(Rc<RawRuntime>);

impl Runtime {
    pub fn new() -> Self {
        log::debug!("runtime created");
        Self(Rc::new(RawRuntime {
            stack: ExecutionStack::default(),
            next_effect_id: Cell::new(0),
        }))
    }

    /// Create a new [`State`] with the given initial value.
    pub fn state<T: 'static>(&self, value: T) -> State<T> {
        State::new(self, value)
    }

    /// Create a signal and return its read accessor and write mutator.
    pub fn signal<T: 'static>(&self, value: T) -> (ReadSignal<T>, WriteSignal<T>) {
        self.state(value).split()
    }

    /// Define an effect.
    ///
    /// `f` is called once immediately, and called again each time a signal it read during its last call changes.
    ///
    /// Dropping the returned [`Effect`] does not stop the effect.
    /// It stays alive as long as a signal it depends on is alive. Use [`Effect::dispose`] to stop it.
    ///
    /// # Panics
    ///
    /// A panic inside `f` is propagated to the caller.
    /// Subscriptions made before the panic are kept.
    pub fn effect(&self, f: impl Fn() + 'static) -> Effect {
        Effect::new(self, f)
    }

    /// Call a function without tracking dependencies.
    ///
    /// Signals read inside `f` do not subscribe the effect that is currently running.
    pub fn untrack<T>(&self, f: impl FnOnce() -> T) -> T {
        let _frame = self.0.stack.push(None);
        f()
    }

    /// Returns `true` if a signal read at this point would subscribe an effect.
    pub fn is_tracking(&self) -> bool {
        self.0.stack.current().is_some()
    }

    pub(crate) fn current(&self) -> Option<Rc<EffectNode>> {
        self.0.stack.current()
    }
    pub(crate) fn enter(&self, effect: Rc<EffectNode>) -> StackFrame<'_> {
        self.0.stack.push(Some(effect))
    }
    pub(crate) fn new_effect_id(&self) -> EffectId {
        let id = self.0.next_effect_id.get();
        self.0.next_effect_id.set(id + 1);
        EffectId(id)
    }
}
impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("depth", &self.0.stack.depth())
            .finish()
    }
}

struct RawRuntime {
    stack: ExecutionStack,
    next_effect_id: Cell<u64>,
}

/// Identifier of an effect, unique within its [`Runtime`].
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("effect#{0}")]
pub struct EffectId(u64);

/// Stack of running effects.
///
/// `None` frames are pushed by [`Runtime::untrack`] and hide the effects below them.
#[derive(Default)]
pub(crate) struct ExecutionStack(RefCell<Vec<Option<Rc<EffectNode>>>>);

impl ExecutionStack {
    pub fn push(&self, frame: Option<Rc<EffectNode>>) -> StackFrame<'_> {
        self.0.borrow_mut().push(frame);
        StackFrame(self)
    }
    fn pop(&self) -> Option<Option<Rc<EffectNode>>> {
        self.0.borrow_mut().pop()
    }
    pub fn current(&self) -> Option<Rc<EffectNode>> {
        self.0.borrow().last().cloned().flatten()
    }
    pub fn depth(&self) -> usize {
        self.0.borrow().len()
    }
}

/// Pops the frame it was created for when dropped, including during unwinding.
#[must_use]
pub(crate) struct StackFrame<'a>(&'a ExecutionStack);

impl Drop for StackFrame<'_> {
    fn drop(&mut self) {
        let frame = self.0.pop();
        drop(frame);
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub(crate) struct BindKey(usize);

/// Subscriber set of one signal.
#[derive(Default)]
pub(crate) struct SinkBindings(RefCell<SlabMap<Rc<EffectNode>>>);

impl SinkBindings {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Subscribes the effect on top of the execution stack, if any.
    pub fn bind(self: &Rc<Self>, rt: &Runtime) {
        if let Some(sink) = rt.current() {
            sink.bind_source(self);
        }
    }
    fn insert(&self, sink: Rc<EffectNode>) -> BindKey {
        BindKey(self.0.borrow_mut().insert(sink))
    }
    fn unbind(&self, key: BindKey) {
        let sink = self.0.borrow_mut().remove(key.0);
        drop(sink);
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Executes every subscriber.
    ///
    /// Subscribers are collected before the first one runs, so effects may subscribe and unsubscribe freely
    /// while the notification is in progress.
    pub fn notify(&self) {
        let sinks: Vec<Rc<EffectNode>> = {
            let mut sinks = self.0.borrow_mut();
            sinks.optimize();
            sinks.values().cloned().collect()
        };
        log::trace!("notify {} subscriber(s)", sinks.len());
        for sink in sinks {
            sink.execute();
        }
    }
}

struct SourceBinding {
    sinks: Weak<SinkBindings>,
    key: BindKey,
}
impl SourceBinding {
    fn is_same(&self, sinks: &Rc<SinkBindings>) -> bool {
        ptr::eq(self.sinks.as_ptr(), Rc::as_ptr(sinks))
    }
    fn unbind(self) {
        if let Some(sinks) = self.sinks.upgrade() {
            sinks.unbind(self.key);
        }
    }
}

/// Subscriber sets one effect currently belongs to.
#[derive(Default)]
pub(crate) struct SourceBindings(Vec<SourceBinding>);

impl SourceBindings {
    /// Adds `sink` to `sinks` unless it is already a member.
    ///
    /// Returns `true` if a new subscription was made.
    pub fn bind(&mut self, sinks: &Rc<SinkBindings>, sink: &Rc<EffectNode>) -> bool {
        if self.0.iter().any(|b| b.is_same(sinks)) {
            return false;
        }
        let key = sinks.insert(sink.clone());
        self.0.push(SourceBinding {
            sinks: Rc::downgrade(sinks),
            key,
        });
        true
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn unbind_all(self) {
        for b in self.0 {
            b.unbind();
        }
    }
    pub fn take(&mut self) -> Self {
        take(self)
    }
}
