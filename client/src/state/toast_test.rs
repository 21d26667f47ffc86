use super::*;
use std::sync::Mutex;

#[test]
fn show_appends_in_fifo_order_with_incrementing_ids() {
    let queue = ToastQueue::new();
    let a = queue.show("first", ToastKind::Info);
    let b = queue.show("second", ToastKind::Error);
    assert_eq!(a, "toast-1");
    assert_eq!(b, "toast-2");

    let toasts = queue.toasts();
    assert_eq!(toasts.len(), 2);
    assert_eq!(toasts[0].message, "first");
    assert_eq!(toasts[1].kind, ToastKind::Error);
}

#[test]
fn show_uses_default_duration() {
    let queue = ToastQueue::new();
    queue.show("hi", ToastKind::Info);
    assert_eq!(queue.toasts()[0].duration, Some(DEFAULT_TOAST_DURATION));
}

#[test]
fn show_with_duration_allows_sticky_toasts() {
    let queue = ToastQueue::new();
    queue.show_with_duration("stay", ToastKind::Warning, None);
    queue.show_with_duration("quick", ToastKind::Info, Some(Duration::from_secs(1)));
    let toasts = queue.toasts();
    assert_eq!(toasts[0].duration, None);
    assert_eq!(toasts[1].duration, Some(Duration::from_secs(1)));
}

#[test]
fn convenience_wrappers_set_kind() {
    let queue = ToastQueue::new();
    queue.success("s");
    queue.error("e");
    queue.warning("w");
    queue.info("i");
    let kinds: Vec<ToastKind> = queue.toasts().iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![ToastKind::Success, ToastKind::Error, ToastKind::Warning, ToastKind::Info]);
}

#[test]
fn dismiss_removes_only_matching_id() {
    let queue = ToastQueue::new();
    let a = queue.info("a");
    let b = queue.info("b");
    queue.dismiss(&a);
    let ids: Vec<String> = queue.toasts().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![b]);
}

#[test]
fn dismiss_unknown_id_is_noop() {
    let queue = ToastQueue::new();
    queue.info("a");
    queue.dismiss("toast-99");
    assert_eq!(queue.toasts().len(), 1);
}

#[test]
fn dismiss_all_clears_but_counter_keeps_counting() {
    let queue = ToastQueue::new();
    queue.info("a");
    queue.info("b");
    queue.dismiss_all();
    assert!(queue.toasts().is_empty());
    assert_eq!(queue.info("c"), "toast-3");
}

#[test]
fn clones_share_queue_and_counter() {
    let queue = ToastQueue::new();
    let other = queue.clone();
    queue.info("a");
    assert_eq!(other.info("b"), "toast-2");
    assert_eq!(queue.toasts().len(), 2);
}

#[test]
fn subscribers_see_each_change() {
    let queue = ToastQueue::new();
    let lens = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lens);
    queue.subscribe(move |toasts: &Vec<Toast>| sink.lock().unwrap().push(toasts.len()));
    let id = queue.success("saved");
    queue.dismiss(&id);
    assert_eq!(*lens.lock().unwrap(), vec![0, 1, 0]);
}

#[test]
fn toast_kind_names() {
    assert_eq!(ToastKind::Success.as_str(), "success");
    assert_eq!(ToastKind::default(), ToastKind::Info);
}
