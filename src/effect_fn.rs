use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use parse_display::Display;

use crate::core::{EffectId, Runtime, SinkBindings, SourceBindings};


/// Handle to a computation that is called again each time a signal it read changes.
///
/// Created by [`Runtime::effect`].
///
/// Dropping the handle does not stop the effect; signals it depends on keep it alive.
#[derive(Clone)]
pub struct Effect(Rc<EffectNode>);

impl Effect {
    pub(crate) fn new(rt: &Runtime, f: impl Fn() + 'static) -> Self {
        let node = Rc::new(EffectNode {
            id: rt.new_effect_id(),
            rt: rt.clone(),
            f: Box::new(f),
            sources: RefCell::new(SourceBindings::default()),
            is_disposed: Cell::new(false),
        });
        log::trace!("{} defined", node.id);
        node.execute();
        Self(node)
    }

    pub fn id(&self) -> EffectId {
        self.0.id
    }
    #[cfg(test)]
    pub(crate) fn node(&self) -> &Rc<EffectNode> {
        &self.0
    }

    /// Call the function again immediately, rebuilding its dependencies.
    ///
    /// Returns an error if the effect has been disposed.
    pub fn execute(&self) -> Result<(), EffectDisposedError> {
        if self.0.is_disposed.get() {
            return Err(EffectDisposedError {});
        }
        self.0.execute();
        Ok(())
    }

    /// Stop the effect.
    ///
    /// All subscriptions are released and the function is never called again.
    /// Calling this from inside the effect's own function is allowed;
    /// signals read after that point in the current call are not subscribed.
    pub fn dispose(&self) {
        if self.0.is_disposed.replace(true) {
            return;
        }
        log::debug!("{} disposed", self.0.id);
        self.0.cleanup();
    }

    pub fn is_disposed(&self) -> bool {
        self.0.is_disposed.get()
    }

    /// Number of signals the effect currently depends on.
    pub fn dependency_count(&self) -> usize {
        self.0.sources.borrow().len()
    }
}
impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("id", &self.0.id)
            .field("dependencies", &self.dependency_count())
            .field("is_disposed", &self.is_disposed())
            .finish()
    }
}

pub(crate) struct EffectNode {
    id: EffectId,
    rt: Runtime,
    f: Box<dyn Fn()>,
    sources: RefCell<SourceBindings>,
    is_disposed: Cell<bool>,
}
impl EffectNode {
    pub fn id(&self) -> EffectId {
        self.id
    }

    /// Releases the previous subscriptions and calls the function with this effect on top of the stack.
    pub fn execute(self: &Rc<Self>) {
        if self.is_disposed.get() {
            return;
        }
        log::trace!("{} execute", self.id);
        self.cleanup();
        let _frame = self.rt.enter(self.clone());
        (self.f)();
    }
    fn cleanup(&self) {
        let sources = self.sources.borrow_mut().take();
        sources.unbind_all();
    }

    pub fn bind_source(self: &Rc<Self>, sinks: &Rc<SinkBindings>) {
        if self.is_disposed.get() {
            return;
        }
        if self.sources.borrow_mut().bind(sinks, self) {
            log::trace!("{} subscribed", self.id);
        }
    }
}

/// Error returned when executing an effect that has been disposed.
#[non_exhaustive]
#[derive(Display, Debug)]
#[display("effect has been disposed")]
pub struct EffectDisposedError {}

impl std::error::Error for EffectDisposedError {}
