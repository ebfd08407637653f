#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tape_typeahead::{
    Committed, Completion, Component, DataSource, InputEvent, Typeahead, TypeaheadOptions,
};

pub const QUIET: Duration = Duration::from_millis(300);

pub type Commits = Rc<RefCell<Vec<Committed<String>>>>;

/// Terms seen by a data source, in call order.
pub type Calls = Arc<Mutex<Vec<String>>>;

pub fn fruit_source(calls: Calls) -> DataSource<String> {
    DataSource::sync(move |term| {
        calls.lock().expect("calls lock").push(term.to_string());
        let items = ["apple", "apricot", "avocado", "banana", "blueberry"]
            .iter()
            .filter(|fruit| fruit.starts_with(term))
            .map(|fruit| fruit.to_string())
            .collect();
        (term.to_string(), items)
    })
}

/// Callback source that parks every completion until the test answers it.
#[derive(Clone, Default)]
pub struct ParkedSearches {
    parked: Arc<Mutex<Vec<(String, Completion<String>)>>>,
}

impl ParkedSearches {
    pub fn source(&self) -> DataSource<String> {
        let parked = Arc::clone(&self.parked);
        DataSource::callback(move |term, completion| {
            parked.lock().expect("parked lock").push((term, completion));
        })
    }

    pub fn len(&self) -> usize {
        self.parked.lock().expect("parked lock").len()
    }

    pub fn take(&self, term: &str) -> Completion<String> {
        let mut parked = self.parked.lock().expect("parked lock");
        let index = parked
            .iter()
            .position(|(parked_term, _)| parked_term == term)
            .unwrap_or_else(|| panic!("no parked search for {term:?}"));
        parked.remove(index).1
    }
}

pub fn build(source: DataSource<String>, rigid: bool) -> (Typeahead<String>, Commits) {
    let commits: Commits = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&commits);
    let options = TypeaheadOptions::builder()
        .on_change(move |value| sink.borrow_mut().push(value))
        .data_source(source)
        .rigid(rigid)
        .debounce(QUIET)
        .build()
        .expect("complete options");
    let typeahead = Typeahead::new(options).expect("typeahead inside runtime");
    (typeahead, commits)
}

/// Sends `text` one character at a time, like a user typing.
pub fn type_text(typeahead: &mut Typeahead<String>, text: &str) {
    for ch in text.chars() {
        typeahead.handle_event(&InputEvent::text(ch.to_string()));
    }
}

pub fn press(typeahead: &mut Typeahead<String>, key: &str) -> tape_typeahead::EventDisposition {
    typeahead.handle_event(&InputEvent::key(key))
}

/// Lets the debounce window pass and applies whatever the searches produced.
pub async fn settle(typeahead: &mut Typeahead<String>) {
    tokio::time::sleep(QUIET * 2).await;
    typeahead.flush_search_events();
}
