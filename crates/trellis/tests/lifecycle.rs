//! Integration tests for construction and disposal through the widget API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use trellis::prelude::*;
use trellis::{
    BoxError, ContainmentOwner, InMemoryBackend, PeerBackend, PeerHandle, WidgetBehavior,
    WidgetCensus, WidgetId,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn counter() -> (Arc<AtomicUsize>, Listener) {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();
    let listener = Listener::new(move |_| {
        hits_clone.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    (hits, listener)
}

#[test]
fn test_dispose_event_fires_once() {
    let display = Display::new();
    let shell = Shell::new(&display, Style::NONE).unwrap();
    let label = Label::new(&shell, Style::NONE).unwrap();

    let (hits, listener) = counter();
    label.add_listener(EventKind::Dispose, listener).unwrap();
    let reentrant = label.widget().clone();
    label
        .add_listener(
            EventKind::Dispose,
            Listener::new(move |_| {
                reentrant.dispose()?;
                Ok(())
            }),
        )
        .unwrap();

    label.dispose().unwrap();
    label.dispose().unwrap();
    shell.dispose().unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_dispose_is_idempotent() {
    let display = Display::new();
    let shell = Shell::new(&display, Style::NONE).unwrap();
    let button = Button::new(&shell, Style::PUSH).unwrap();

    button.dispose().unwrap();
    assert!(button.is_disposed());
    assert!(button.dispose().is_ok());
    assert!(matches!(
        button.set_text("late"),
        Err(KernelError::WidgetDisposed)
    ));
    assert!(shell.children().unwrap().is_empty());
}

/// Records destroy calls and, when the watched container is freed, whether
/// its children were already disposed.
#[derive(Default)]
struct RecordingBackend {
    inner: InMemoryBackend,
    destroyed: Mutex<Vec<WidgetId>>,
    watched: Mutex<Option<(WidgetId, Vec<Widget>)>>,
    children_disposed_first: Mutex<Option<bool>>,
}

impl PeerBackend for RecordingBackend {
    fn create_peer(
        &self,
        id: WidgetId,
        kind: WidgetKind,
        style: Style,
    ) -> std::result::Result<PeerHandle, BoxError> {
        self.inner.create_peer(id, kind, style)
    }

    fn destroy_peer(&self, id: WidgetId, handle: PeerHandle) -> std::result::Result<(), BoxError> {
        if let Some((container, children)) = self.watched.lock().as_ref() {
            if *container == id {
                let all = children.iter().all(Widget::is_disposed);
                *self.children_disposed_first.lock() = Some(all);
            }
        }
        self.destroyed.lock().push(id);
        self.inner.destroy_peer(id, handle)
    }
}

#[test]
fn test_children_released_before_container_peer() {
    let backend = Arc::new(RecordingBackend::default());
    let display = Display::with_config(DisplayConfig::default().with_backend(backend.clone()));
    let shell = Shell::new(&display, Style::NONE).unwrap();
    let container = Composite::new(&shell, Style::V_SCROLL).unwrap();

    let mut children: Vec<Widget> = (0..3)
        .map(|_| Label::new(&container, Style::NONE).unwrap().widget().clone())
        .collect();
    let nested = Composite::new(&container, Style::NONE).unwrap();
    children.push(Button::new(&nested, Style::NONE).unwrap().widget().clone());
    children.push(nested.widget().clone());
    children.push(container.vertical_bar().unwrap().unwrap().widget().clone());
    *backend.watched.lock() = Some((container.id(), children.clone()));

    container.dispose().unwrap();

    assert_eq!(*backend.children_disposed_first.lock(), Some(true));
    let destroyed = backend.destroyed.lock().clone();
    let container_at = destroyed.iter().position(|id| *id == container.id()).unwrap();
    assert_eq!(container_at, destroyed.len() - 1);
    for child in &children {
        assert!(destroyed[..container_at].contains(&child.id()));
    }
    assert_eq!(backend.inner.live_count(), 1);
}

#[test]
fn test_listener_failure_does_not_stop_disposal() {
    init_tracing();
    let backend = Arc::new(InMemoryBackend::new());
    let display = Display::with_config(DisplayConfig::default().with_backend(backend.clone()));
    let shell = Shell::new(&display, Style::NONE).unwrap();
    let composite = Composite::new(&shell, Style::NONE).unwrap();
    let child = Label::new(&composite, Style::NONE).unwrap();
    assert_eq!(backend.live_count(), 3);

    composite
        .add_listener(
            EventKind::Dispose,
            Listener::new(|_| Err("listener failed".into())),
        )
        .unwrap();

    let err = composite.dispose().unwrap_err();
    assert!(matches!(
        err,
        KernelError::Listener {
            kind: EventKind::Dispose,
            ..
        }
    ));
    assert!(composite.is_disposed());
    assert!(child.is_disposed());
    assert_eq!(backend.live_count(), 1);
}

#[test]
fn test_canvas_secondaries_released() {
    let display = Display::new();
    let census = Arc::new(WidgetCensus::new());
    display.set_tracker(Some(census.clone())).unwrap();

    let shell = Shell::new(&display, Style::NONE).unwrap();
    let canvas = Canvas::new(&shell, Style::H_SCROLL | Style::V_SCROLL).unwrap();
    let caret = Caret::new(&canvas, Style::NONE).unwrap();
    let ime = Ime::new(&canvas, Style::NONE).unwrap();
    let bars = [
        canvas.horizontal_bar().unwrap().unwrap(),
        canvas.vertical_bar().unwrap().unwrap(),
    ];
    assert_eq!(canvas.owned().unwrap().len(), 4);
    assert_eq!(census.live(), 6);

    canvas.dispose().unwrap();

    assert!(caret.is_disposed());
    assert!(ime.is_disposed());
    assert!(bars.iter().all(|bar| bar.is_disposed()));
    assert_eq!(census.live(), 1);
    assert!(census.is_live(shell.id()));
    assert_eq!(display.widget_count(), 1);
}

#[test]
fn test_toolbar_removal_shifts_indices() {
    let display = Display::new();
    let shell = Shell::new(&display, Style::NONE).unwrap();
    let bar = ToolBar::new(&shell, Style::NONE).unwrap();
    let items: Vec<ToolItem> = (0..5)
        .map(|_| ToolItem::new(&bar, Style::PUSH).unwrap())
        .collect();
    for (i, item) in items.iter().enumerate() {
        assert_eq!(bar.index_of(item).unwrap(), Some(i));
    }

    items[2].dispose().unwrap();

    assert_eq!(bar.item_count().unwrap(), 4);
    assert_eq!(bar.index_of(&items[0]).unwrap(), Some(0));
    assert_eq!(bar.index_of(&items[1]).unwrap(), Some(1));
    assert_eq!(bar.index_of(&items[3]).unwrap(), Some(2));
    assert_eq!(bar.index_of(&items[4]).unwrap(), Some(3));
    assert_eq!(bar.index_of(&items[2]).unwrap(), None);
}

struct Plugin;

impl ContainmentOwner for Plugin {}

impl WidgetBehavior for Plugin {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Custom("plugin")
    }
}

#[test]
fn test_unregistered_custom_kind_rejected() {
    let display = Display::new();
    let shell = Shell::new(&display, Style::NONE).unwrap();
    let before = display.widget_count();

    let err = Widget::new(&shell, Plugin, Style::NONE).unwrap_err();
    assert!(matches!(err, KernelError::InvalidSubclass("plugin")));
    assert_eq!(display.widget_count(), before);
    assert!(shell.children().unwrap().is_empty());
    assert!(!shell.take_dirty().unwrap());

    display.allow_extension("plugin").unwrap();
    let plugin = Widget::new(&shell, Plugin, Style::NONE).unwrap();
    assert_eq!(shell.children().unwrap(), vec![plugin]);
}

#[test]
fn test_display_dispose_tears_down_roots() {
    let display = Display::new();
    let first = Shell::new(&display, Style::NONE).unwrap();
    let second = Shell::new(&display, Style::NONE).unwrap();
    let folder = TabFolder::new(&second, Style::NONE).unwrap();
    let tab = TabItem::new(&folder, Style::NONE).unwrap();

    display.dispose().unwrap();

    assert!(first.is_disposed());
    assert!(tab.is_disposed());
    assert_eq!(display.widget_count(), 0);
    assert!(matches!(
        Shell::new(&display, Style::NONE),
        Err(KernelError::DisplayDisposed)
    ));
}
