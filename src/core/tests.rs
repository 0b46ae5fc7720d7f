use std::{
    cell::{Cell, RefCell},
    panic::{catch_unwind, AssertUnwindSafe},
    rc::Rc,
};

use assert_call::{call, CallRecorder};

use super::*;

fn depth(rt: &Runtime) -> usize {
    rt.0.stack.depth()
}

#[test]
fn stack_is_empty_outside_effect() {
    let rt = Runtime::new();
    assert!(!rt.is_tracking());
    assert!(rt.current().is_none());
    assert_eq!(depth(&rt), 0);
}

#[test]
fn current_is_running_effect() {
    let rt = Runtime::new();
    let seen = Rc::new(Cell::new(None));
    let e = rt.effect({
        let rt = rt.clone();
        let seen = seen.clone();
        move || seen.set(rt.current().map(|e| e.id()))
    });
    assert_eq!(seen.get(), Some(e.id()));
    assert!(rt.current().is_none());
}

#[test]
fn nested_effects_push_and_pop() {
    let rt = Runtime::new();
    let depths = Rc::new(RefCell::new(Vec::new()));
    let inner_id = Rc::new(Cell::new(None));
    let outer = rt.effect({
        let rt = rt.clone();
        let depths = depths.clone();
        let inner_id = inner_id.clone();
        move || {
            depths.borrow_mut().push(depth(&rt));
            let inner = rt.effect({
                let rt = rt.clone();
                let depths = depths.clone();
                move || depths.borrow_mut().push(depth(&rt))
            });
            inner_id.set(Some(inner.id()));
            depths.borrow_mut().push(depth(&rt));
            assert_eq!(rt.current().map(|e| e.id()), Some(EffectId(0)));
        }
    });
    assert_eq!(outer.id(), EffectId(0));
    assert_eq!(inner_id.get(), Some(EffectId(1)));
    assert_eq!(*depths.borrow(), [1, 2, 1]);
    assert_eq!(depth(&rt), 0);
}

#[test]
fn untrack_hides_running_effect() {
    let rt = Runtime::new();
    let mut cr = CallRecorder::new();
    let s = rt.state(1);
    let _e = rt.effect({
        let rt = rt.clone();
        let s = s.clone();
        move || {
            assert!(rt.is_tracking());
            let value = rt.untrack(|| {
                assert!(!rt.is_tracking());
                s.get()
            });
            assert!(rt.is_tracking());
            call!("{}", value);
        }
    });
    cr.verify("1");
    assert_eq!(s.subscriber_count(), 0);

    s.set(2);
    cr.verify(());
}

#[test]
fn frame_is_popped_on_panic() {
    let rt = Runtime::new();
    let result = catch_unwind(AssertUnwindSafe(|| {
        rt.effect(|| panic!("effect failed"));
    }));
    assert!(result.is_err());
    assert_eq!(depth(&rt), 0);
    assert!(!rt.is_tracking());
}

#[test]
fn untrack_frame_is_popped_on_panic() {
    let rt = Runtime::new();
    let result = catch_unwind(AssertUnwindSafe(|| rt.untrack(|| panic!("failed"))));
    assert!(result.is_err());
    assert_eq!(depth(&rt), 0);
}

#[test]
fn runtimes_are_independent() {
    let rt0 = Runtime::new();
    let rt1 = Runtime::new();
    let mut cr = CallRecorder::new();
    let s = rt0.state(10);
    let e = rt1.effect({
        let s = s.clone();
        move || call!("{}", s.get())
    });
    cr.verify("10");
    assert_eq!(e.dependency_count(), 0);
    assert_eq!(s.subscriber_count(), 0);

    s.set(20);
    cr.verify(());
}

#[test]
fn effect_ids_are_per_runtime() {
    let rt0 = Runtime::new();
    let rt1 = Runtime::new();
    let e0 = rt0.effect(|| {});
    let e1 = rt0.effect(|| {});
    let e2 = rt1.effect(|| {});
    assert_eq!(e0.id(), EffectId(0));
    assert_eq!(e1.id(), EffectId(1));
    assert_eq!(e2.id(), EffectId(0));
}

#[test]
fn effect_id_display() {
    assert_eq!(EffectId(3).to_string(), "effect#3");
}

#[test]
fn repeated_reads_bind_once() {
    let rt = Runtime::new();
    let s = rt.state(1);
    let e = rt.effect({
        let s = s.clone();
        move || {
            s.get();
            s.get();
            s.with(|_| ());
        }
    });
    assert_eq!(s.subscriber_count(), 1);
    assert_eq!(e.dependency_count(), 1);
}

#[test]
fn unbind_after_sink_bindings_dropped() {
    let rt = Runtime::new();
    let e = rt.effect(|| {});
    let sinks = SinkBindings::new();
    let mut sources = SourceBindings::default();
    assert!(sources.bind(&sinks, e.node()));
    assert!(!sources.bind(&sinks, e.node()));
    assert_eq!(sinks.len(), 1);
    drop(sinks);
    sources.unbind_all();
}

#[test]
fn unbind_all_empties_sink_bindings() {
    let rt = Runtime::new();
    let e = rt.effect(|| {});
    let a = SinkBindings::new();
    let b = SinkBindings::new();
    let mut sources = SourceBindings::default();
    sources.bind(&a, e.node());
    sources.bind(&b, e.node());
    assert_eq!(sources.len(), 2);
    assert_eq!((a.len(), b.len()), (1, 1));

    sources.take().unbind_all();
    assert_eq!(sources.len(), 0);
    assert_eq!((a.len(), b.len()), (0, 0));
}
