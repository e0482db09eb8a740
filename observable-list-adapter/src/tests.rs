use crate::*;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use observable_list::{ChangeKind, CollectionChange, Error, ObservableList, ObservableListOptions};

#[test]
fn queue_defers_delivery_until_pumped() {
    let queue = DispatchQueue::new();
    let mut list = ObservableList::<u32>::with_options(
        ObservableListOptions::new()
            .with_property_changed_dispatcher(queue.dispatcher())
            .with_collection_changed_dispatcher(queue.dispatcher()),
    );

    let kinds = Arc::new(Mutex::new(Vec::new()));
    let k = Arc::clone(&kinds);
    list.subscribe_collection_changed(move |change| k.lock().unwrap().push(change.kind()));
    let names = Arc::new(Mutex::new(Vec::new()));
    let n = Arc::clone(&names);
    list.subscribe_property_changed(move |name| n.lock().unwrap().push(name.to_owned()));

    list.push(1).unwrap();
    list.add_range([2, 3]).unwrap();

    assert!(kinds.lock().unwrap().is_empty());
    // Add, Count, Item[] + Count, Item[], Reset.
    assert_eq!(queue.len(), 6);

    assert_eq!(queue.run_pending(), 6);
    assert!(queue.is_empty());
    assert_eq!(*kinds.lock().unwrap(), vec![ChangeKind::Add, ChangeKind::Reset]);
    assert_eq!(
        *names.lock().unwrap(),
        vec!["Count", "Item[]", "Count", "Item[]"]
    );
}

#[test]
fn queue_runs_in_fifo_order_one_at_a_time() {
    let queue = DispatchQueue::new();
    let mut list = ObservableList::<u32>::new();
    list.set_collection_changed_dispatcher(queue.dispatcher());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    list.subscribe_collection_changed(move |change| {
        s.lock().unwrap().push(change.new_items().to_vec());
    });

    list.push(10).unwrap();
    list.push(20).unwrap();

    assert!(queue.run_one());
    assert_eq!(*seen.lock().unwrap(), vec![vec![10]]);
    assert!(queue.run_one());
    assert!(!queue.run_one());
    assert_eq!(*seen.lock().unwrap(), vec![vec![10], vec![20]]);
}

#[test]
fn queue_clear_discards_pending() {
    let queue = DispatchQueue::new();
    let mut list = ObservableList::<u32>::new();
    list.set_collection_changed_dispatcher(queue.dispatcher());

    let delivered = Arc::new(AtomicUsize::new(0));
    let d = Arc::clone(&delivered);
    list.subscribe_collection_changed(move |_| {
        d.fetch_add(1, Ordering::SeqCst);
    });

    list.push(1).unwrap();
    list.clear().unwrap();
    assert_eq!(queue.clear(), 2);
    assert_eq!(queue.run_pending(), 0);
    assert_eq!(delivered.load(Ordering::SeqCst), 0);
}

#[test]
fn handler_mutating_the_list_from_the_queue_is_rejected() {
    let queue = DispatchQueue::new();
    let mut list = ObservableList::<u32>::new();
    list.set_collection_changed_dispatcher(queue.dispatcher());
    let list = Arc::new(Mutex::new(list));

    let outcome = Arc::new(Mutex::new(None));
    {
        let weak = Arc::downgrade(&list);
        let o = Arc::clone(&outcome);
        list.lock().unwrap().subscribe_collection_changed(move |change| {
            if change.kind() != ChangeKind::Add {
                return;
            }
            if let Some(list) = weak.upgrade() {
                *o.lock().unwrap() = Some(list.lock().unwrap().push(100));
            }
        });
    }

    list.lock().unwrap().push(1).unwrap();
    queue.run_pending();

    assert_eq!(*outcome.lock().unwrap(), Some(Err(Error::ReentrantMutation)));
    assert_eq!(list.lock().unwrap().as_slice(), &[1]);
}

#[test]
fn handlers_can_re_dispatch_while_the_queue_runs() {
    let queue = DispatchQueue::new();
    let inner = queue.clone();
    let dispatch = queue.dispatcher();
    let ran = Arc::new(AtomicUsize::new(0));
    let r = Arc::clone(&ran);

    dispatch(Box::new(move || {
        r.fetch_add(1, Ordering::SeqCst);
        let r = Arc::clone(&r);
        (inner.dispatcher())(Box::new(move || {
            r.fetch_add(1, Ordering::SeqCst);
        }));
    }));

    assert_eq!(queue.run_pending(), 1);
    assert_eq!(ran.load(Ordering::SeqCst), 1);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.run_pending(), 1);
    assert_eq!(ran.load(Ordering::SeqCst), 2);
}

#[test]
fn channel_delivers_on_the_receiving_thread() {
    let (dispatcher, receiver) = channel_dispatcher();
    let (tx, rx) = std::sync::mpsc::channel();

    let ui = thread::spawn(move || {
        let ran = receiver.run_blocking();
        (ran, rx.try_iter().collect::<Vec<_>>())
    });

    let mut list = ObservableList::<String>::new();
    list.set_collection_changed_dispatcher(dispatcher);
    let ui_thread = ui.thread().id();
    list.subscribe_collection_changed(move |change: &CollectionChange<String>| {
        assert_eq!(thread::current().id(), ui_thread);
        tx.send(change.clone()).unwrap();
    });

    list.push("a".to_owned()).unwrap();
    list.set(0, "b".to_owned()).unwrap();
    list.add_range(["c".to_owned(), "d".to_owned()]).unwrap();

    // Dropping the list drops the only dispatcher, which ends `run_blocking`.
    drop(list);
    let (ran, changes) = ui.join().unwrap();

    assert_eq!(ran, 3);
    assert_eq!(
        changes,
        vec![
            CollectionChange::Add {
                index: 0,
                item: "a".to_owned(),
            },
            CollectionChange::Replace {
                index: 0,
                old_item: "a".to_owned(),
                new_item: "b".to_owned(),
            },
            CollectionChange::Reset,
        ]
    );
}

#[test]
fn channel_receiver_can_poll() {
    let (dispatcher, receiver) = channel_dispatcher();
    let mut list = ObservableList::<u32>::new();
    list.set_property_changed_dispatcher(dispatcher);

    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);
    list.subscribe_property_changed(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(receiver.run_pending(), 0);
    assert!(!receiver.run_one_timeout(Duration::from_millis(1)));

    list.refresh();
    assert!(receiver.run_one_timeout(Duration::from_secs(5)));
    assert_eq!(receiver.run_pending(), 1);
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn channel_discards_after_receiver_is_dropped() {
    let (dispatcher, receiver) = channel_dispatcher();
    drop(receiver);

    let ran = Arc::new(AtomicUsize::new(0));
    let r = Arc::clone(&ran);
    dispatcher(Box::new(move || {
        r.fetch_add(1, Ordering::SeqCst);
    }));
    assert_eq!(ran.load(Ordering::SeqCst), 0);
}

#[test]
fn writer_keeps_mutating_while_another_thread_delivers() {
    let (dispatcher, receiver) = channel_dispatcher();
    let (started_tx, started_rx) = std::sync::mpsc::channel::<()>();
    let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
    let started_tx = Mutex::new(started_tx);
    let release_rx = Mutex::new(release_rx);

    let ui = thread::spawn(move || receiver.run_blocking());

    let mut list = ObservableList::<u32>::new();
    list.set_collection_changed_dispatcher(dispatcher);
    list.subscribe_collection_changed(move |_| {
        started_tx.lock().unwrap().send(()).unwrap();
        // Hold delivery open until the writer has mutated.
        release_rx.lock().unwrap().recv().unwrap();
    });

    list.push(1).unwrap();
    started_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("delivery of the first push started");

    // The handler for the first push is still running on the other thread.
    assert_eq!(list.push(2), Ok(()));
    assert_eq!(list.set(0, 10), Ok(1));
    assert_eq!(list.remove_at(1), Ok(2));
    assert_eq!(list.as_slice(), &[10]);

    for _ in 0..4 {
        release_tx.send(()).unwrap();
    }
    drop(list);
    assert_eq!(ui.join().unwrap(), 4);
}
