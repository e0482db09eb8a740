use std::thread;

use observable_list::{CollectionChange, ObservableList, ObservableListOptions};
use observable_list_adapter::channel_dispatcher;

fn main() {
    // Both streams are delivered on a dedicated "UI" thread.
    let (collection_dispatcher, collection_rx) = channel_dispatcher();
    let (property_dispatcher, property_rx) = channel_dispatcher();

    let ui = thread::spawn(move || {
        let collection = thread::spawn(move || collection_rx.run_blocking());
        let properties = property_rx.run_blocking();
        let collection = collection.join().unwrap_or(0);
        println!("ui: ran {collection} collection and {properties} property notifications");
    });

    let mut list = ObservableList::<String>::with_options(
        ObservableListOptions::new()
            .with_collection_changed_dispatcher(collection_dispatcher)
            .with_property_changed_dispatcher(property_dispatcher),
    );
    list.subscribe_collection_changed(|change: &CollectionChange<String>| {
        println!("ui: {:?} {:?}", change.kind(), change.new_items());
    });
    list.subscribe_property_changed(|name| println!("ui: {name} changed"));

    list.push("inbox".to_owned()).expect("push");
    list.add_range(["drafts".to_owned(), "sent".to_owned(), "spam".to_owned()])
        .expect("add_range");
    list.remove_range(["spam".to_owned(), "trash".to_owned()])
        .expect("remove_range");
    list.move_item(2, 0).expect("move_item");

    println!("worker: final list {:?}", list.as_slice());
    drop(list);
    ui.join().expect("ui thread");
}
