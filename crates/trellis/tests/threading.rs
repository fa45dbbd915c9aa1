//! Integration tests for thread affinity and cross-thread handoff.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use trellis::data_value;
use trellis::prelude::*;

fn on_other_thread<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    thread::spawn(f).join().unwrap()
}

#[test]
fn test_foreign_thread_calls_fail_without_mutation() {
    let display = Display::new();
    let shell = Shell::new(&display, Style::NONE).unwrap();
    let bar = ToolBar::new(&shell, Style::NONE).unwrap();
    let item = ToolItem::new(&bar, Style::CHECK).unwrap();
    item.set_text("Bold").unwrap();

    let remote = item.clone();
    let remote_bar = bar.clone();
    let results = on_other_thread(move || {
        vec![
            remote.set_text("Italic"),
            remote.set_selection(true),
            remote.set_data(Some(data_value(7_u32))),
            remote.add_listener(EventKind::Selection, Listener::new(|_| Ok(()))),
            remote.dispose(),
            ToolItem::new(&remote_bar, Style::NONE).map(|_| ()),
        ]
    });

    for result in results {
        assert!(
            matches!(result, Err(KernelError::ThreadAffinityViolation { .. })),
            "unexpected result: {result:?}"
        );
    }
    assert_eq!(item.text().unwrap(), "Bold");
    assert!(!item.selection().unwrap());
    assert!(item.data().unwrap().is_none());
    assert!(!item.is_listening(EventKind::Selection).unwrap());
    assert!(!item.is_disposed());
    assert_eq!(bar.item_count().unwrap(), 1);
}

#[test]
fn test_state_queries_work_anywhere() {
    let display = Display::new();
    let shell = Shell::new(&display, Style::NONE).unwrap();
    let remote = shell.clone();

    let (disposed, id) = on_other_thread(move || (remote.is_disposed(), remote.id()));
    assert!(!disposed);
    assert_eq!(id, shell.id());
}

#[test]
fn test_async_exec_runs_on_next_pump() {
    let display = Display::new();
    let shell = Shell::new(&display, Style::NONE).unwrap();
    let ran = Arc::new(AtomicUsize::new(0));

    let remote_display = display.clone();
    let remote_shell = shell.clone();
    let remote_ran = ran.clone();
    on_other_thread(move || {
        remote_display
            .async_exec(move || {
                remote_shell.set_text("from worker").unwrap();
                remote_ran.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
    });

    assert_eq!(ran.load(Ordering::SeqCst), 0);
    assert!(display.read_and_dispatch().unwrap());
    assert_eq!(ran.load(Ordering::SeqCst), 1);
    assert_eq!(shell.text().unwrap(), "from worker");
    assert!(!display.read_and_dispatch().unwrap());
}

#[test]
fn test_sync_exec_blocks_until_pumped() {
    let display = Display::new();
    let ran = Arc::new(AtomicBool::new(false));

    let remote_display = display.clone();
    let remote_ran = ran.clone();
    let worker = thread::spawn(move || {
        remote_display.sync_exec(move || remote_ran.store(true, Ordering::SeqCst))
    });

    while !worker.is_finished() {
        display.read_and_dispatch().unwrap();
        thread::yield_now();
    }
    worker.join().unwrap().unwrap();
    assert!(ran.load(Ordering::SeqCst));
}

#[test]
fn test_handoff_after_display_dispose_fails() {
    let display = Display::new();
    display.dispose().unwrap();

    let remote = display.clone();
    let (async_result, sync_result, closed) = on_other_thread(move || {
        let sender = remote.inbound();
        (
            remote.async_exec(|| {}),
            remote.sync_exec(|| {}),
            sender.is_closed(),
        )
    });
    assert!(matches!(async_result, Err(KernelError::DisplayDisposed)));
    assert!(matches!(sync_result, Err(KernelError::DisplayDisposed)));
    assert!(closed);
}
