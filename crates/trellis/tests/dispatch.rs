//! Integration tests for listeners, the event queue and the inbound bridge.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use trellis::InboundEvent;
use trellis::prelude::*;

struct Counting {
    selected: Arc<AtomicUsize>,
    default_selected: Arc<AtomicUsize>,
}

impl SelectionListener for Counting {
    fn widget_selected(&self, _event: &mut Event) -> trellis::ListenerResult {
        self.selected.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn widget_default_selected(&self, _event: &mut Event) -> trellis::ListenerResult {
        self.default_selected.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn recorder(log: &Arc<Mutex<Vec<String>>>, name: &str) -> Listener {
    let log = log.clone();
    let name = name.to_owned();
    Listener::new(move |event| {
        log.lock().push(format!("{name}:{:?}", event.kind));
        Ok(())
    })
}

#[test]
fn test_typed_listener_fires_once_then_never() {
    let display = Display::new();
    let shell = Shell::new(&display, Style::NONE).unwrap();
    let button = Button::new(&shell, Style::PUSH).unwrap();

    let selected = Arc::new(AtomicUsize::new(0));
    let default_selected = Arc::new(AtomicUsize::new(0));
    let typed = TypedListener::selection(Counting {
        selected: selected.clone(),
        default_selected: default_selected.clone(),
    });
    button
        .add_typed_listener(
            typed.clone(),
            &[EventKind::Selection, EventKind::DefaultSelection],
        )
        .unwrap();

    button.click().unwrap();
    assert_eq!(selected.load(Ordering::SeqCst), 1);
    assert_eq!(default_selected.load(Ordering::SeqCst), 0);

    button.remove_typed_listener(&typed).unwrap();
    assert!(!button.is_listening(EventKind::Selection).unwrap());
    assert!(!button.is_listening(EventKind::DefaultSelection).unwrap());

    button.click().unwrap();
    button
        .notify_listeners(EventKind::DefaultSelection, Event::default())
        .unwrap();
    assert_eq!(selected.load(Ordering::SeqCst), 1);
    assert_eq!(default_selected.load(Ordering::SeqCst), 0);
}

#[test]
fn test_second_listener_error_surfaces_after_all_run() {
    let display = Display::new();
    let shell = Shell::new(&display, Style::NONE).unwrap();
    let link = Link::new(&shell, Style::NONE).unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));

    link.add_listener(EventKind::Selection, recorder(&log, "first"))
        .unwrap();
    link.add_listener(
        EventKind::Selection,
        Listener::new(|_| Err("second failed".into())),
    )
    .unwrap();
    link.add_listener(EventKind::Selection, recorder(&log, "third"))
        .unwrap();

    let err = link.activate().unwrap_err();
    match err {
        KernelError::Listener { kind, source } => {
            assert_eq!(kind, EventKind::Selection);
            assert_eq!(source.to_string(), "second failed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        *log.lock(),
        vec!["first:Selection".to_owned(), "third:Selection".to_owned()]
    );
}

#[test]
fn test_queued_event_for_disposed_widget_dropped() {
    let display = Display::new();
    let shell = Shell::new(&display, Style::NONE).unwrap();
    let kept = Label::new(&shell, Style::NONE).unwrap();
    let doomed = Label::new(&shell, Style::NONE).unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));

    kept.add_listener(EventKind::Show, recorder(&log, "kept"))
        .unwrap();
    kept.add_listener(EventKind::Hide, recorder(&log, "kept"))
        .unwrap();
    doomed
        .add_listener(EventKind::Show, recorder(&log, "doomed"))
        .unwrap();

    kept.post_event(EventKind::Show, Event::default()).unwrap();
    doomed.post_event(EventKind::Show, Event::default()).unwrap();
    kept.post_event(EventKind::Hide, Event::default()).unwrap();
    assert_eq!(display.pending_events(), 3);
    assert!(log.lock().is_empty());

    doomed.dispose().unwrap();
    display.run_pending().unwrap();

    assert_eq!(
        *log.lock(),
        vec!["kept:Show".to_owned(), "kept:Hide".to_owned()]
    );
    assert_eq!(display.pending_events(), 0);
}

#[test]
fn test_first_tab_queues_selection() {
    let display = Display::new();
    let shell = Shell::new(&display, Style::NONE).unwrap();
    let folder = TabFolder::new(&shell, Style::NONE).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    folder
        .add_listener(
            EventKind::Selection,
            Listener::new(move |event| {
                seen_clone.lock().push((event.item.clone(), event.index));
                Ok(())
            }),
        )
        .unwrap();

    let first = TabItem::new(&folder, Style::NONE).unwrap();
    TabItem::new(&folder, Style::NONE).unwrap();
    assert!(seen.lock().is_empty());

    display.run_pending().unwrap();
    assert_eq!(*seen.lock(), vec![(Some(first.widget().clone()), 0)]);
}

#[test]
fn test_filter_sees_and_vetoes() {
    let display = Display::new();
    let shell = Shell::new(&display, Style::NONE).unwrap();
    let button = Button::new(&shell, Style::CHECK).unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    button
        .add_listener(EventKind::Selection, recorder(&log, "button"))
        .unwrap();

    let filter_log = log.clone();
    let filter = Listener::new(move |event| {
        filter_log.lock().push("filter".to_owned());
        if event.widget.as_ref().is_some_and(|w| w.kind() == WidgetKind::Button) {
            event.kind = EventKind::None;
        }
        Ok(())
    });
    display.add_filter(EventKind::Selection, filter.clone()).unwrap();

    button.click().unwrap();
    assert_eq!(*log.lock(), vec!["filter".to_owned()]);
    assert!(button.selection().unwrap());

    display.remove_filter(EventKind::Selection, &filter).unwrap();
    button.click().unwrap();
    assert_eq!(log.lock().last().map(String::as_str), Some("button:Selection"));
}

#[test]
fn test_inbound_event_routed_by_id() {
    let display = Display::new();
    let shell = Shell::new(&display, Style::NONE).unwrap();
    let live = Button::new(&shell, Style::PUSH).unwrap();
    let gone = Button::new(&shell, Style::PUSH).unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    for (name, button) in [("live", &live), ("gone", &gone)] {
        let log = log.clone();
        button
            .add_listener(
                EventKind::MouseDown,
                Listener::new(move |event| {
                    log.lock().push((name, event.detail, event.text.clone()));
                    Ok(())
                }),
            )
            .unwrap();
    }

    let sender = display.inbound();
    let gone_id = gone.id();
    gone.dispose().unwrap();

    let live_id = live.id();
    std::thread::spawn(move || {
        sender
            .deliver(
                InboundEvent::new(live_id, EventKind::MouseDown)
                    .with_detail(1)
                    .with_text("press"),
            )
            .unwrap();
        sender
            .deliver(InboundEvent::new(gone_id, EventKind::MouseDown))
            .unwrap();
    })
    .join()
    .unwrap();

    display.run_pending().unwrap();
    assert_eq!(*log.lock(), vec![("live", 1, Some("press".to_owned()))]);
}
