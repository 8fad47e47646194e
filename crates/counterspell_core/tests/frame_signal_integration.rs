//! Integration tests for frame scheduling + signals + event dispatch
//!
//! These tests verify that:
//! - A frame task can publish into a signal once per tick
//! - Every subscriber sees the same value within one tick
//! - Tearing down listeners and tasks stops all further effects

use counterspell_core::{
    event_types, Event, EventData, EventDispatcher, FrameControl, FrameScheduler, ManualClock,
    Signal,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn scheduler() -> (ManualClock, FrameScheduler) {
    let clock = ManualClock::new();
    (clock.clone(), FrameScheduler::new(Arc::new(clock)))
}

#[test]
fn test_frame_task_publishes_once_per_tick() {
    let (clock, scheduler) = scheduler();
    let signal = Signal::new(0u64);

    let publisher = signal.clone();
    let _task = scheduler.request_frames(move |info| {
        publisher.set(info.frame);
        FrameControl::Continue
    });

    for _ in 0..10 {
        clock.advance(16.0).unwrap();
        scheduler.tick();
    }

    assert_eq!(signal.get(), 10);
    assert_eq!(signal.version(), 10);
}

#[test]
fn test_subscribers_observe_identical_values_per_tick() {
    let (clock, scheduler) = scheduler();
    let signal = Signal::new(0.0f32);
    let first = Arc::new(Mutex::new(Vec::new()));
    let second = Arc::new(Mutex::new(Vec::new()));

    let a = first.clone();
    let _sa = signal.subscribe(move |v| a.lock().unwrap().push(*v));
    let b = second.clone();
    let _sb = signal.subscribe(move |v| b.lock().unwrap().push(*v));

    let publisher = signal.clone();
    let _task = scheduler.request_frames(move |info| {
        publisher.set(info.now_ms as f32 * 0.5);
        FrameControl::Continue
    });

    for _ in 0..5 {
        clock.advance(10.0).unwrap();
        scheduler.tick();
    }

    assert_eq!(*first.lock().unwrap(), *second.lock().unwrap());
    assert_eq!(first.lock().unwrap().len(), 5);
}

#[test]
fn test_scroll_listener_restarts_frame_task() {
    let (clock, scheduler) = scheduler();
    let dispatcher = EventDispatcher::new();
    let target = Arc::new(Mutex::new(0.0f32));
    let ticks = Arc::new(AtomicUsize::new(0));
    let task_slot = Arc::new(Mutex::new(None));

    let t = target.clone();
    let sched = scheduler.clone();
    let counter = ticks.clone();
    let slot = task_slot.clone();
    dispatcher.add_listener(event_types::SCROLL, move |event| {
        if let EventData::Scroll { offset_y } = event.data {
            *t.lock().unwrap() = offset_y;
        }
        let mut slot = slot.lock().unwrap();
        let running = slot
            .as_ref()
            .is_some_and(|task: &counterspell_core::FrameTask| task.is_active());
        if !running {
            let counter = counter.clone();
            *slot = Some(sched.request_frames(move |_| {
                if counter.fetch_add(1, Ordering::SeqCst) % 3 == 2 {
                    FrameControl::Stop
                } else {
                    FrameControl::Continue
                }
            }));
        }
    });

    dispatcher.dispatch(&mut Event::scroll(100.0));
    for _ in 0..5 {
        clock.advance(16.0).unwrap();
        scheduler.tick();
    }
    assert_eq!(ticks.load(Ordering::SeqCst), 3);

    dispatcher.dispatch(&mut Event::scroll(250.0));
    clock.advance(16.0).unwrap();
    scheduler.tick();
    assert_eq!(ticks.load(Ordering::SeqCst), 4);
    assert_eq!(*target.lock().unwrap(), 250.0);
}
