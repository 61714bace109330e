use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Metadata, Subscriber};
use webindex_core::{Document, IndexBuilder, IndexConfig, NonPositionalBuilder};

/// Counts WARN events.
struct WarnCounter(Arc<AtomicUsize>);

impl Subscriber for WarnCounter {
    fn enabled(&self, _: &Metadata<'_>) -> bool { true }
    fn new_span(&self, _: &Attributes<'_>) -> Id { Id::from_u64(1) }
    fn record(&self, _: &Id, _: &Record<'_>) {}
    fn record_follows_from(&self, _: &Id, _: &Id) {}
    fn event(&self, event: &Event<'_>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
    fn enter(&self, _: &Id) {}
    fn exit(&self, _: &Id) {}
}

#[test]
fn missing_field_is_warned_once_per_run() {
    let docs = vec![
        Document::new().with_field("title", "Le chat").with_field("url", "u1"),
        Document::new().with_field("url", "u2"),
    ];
    let warnings = Arc::new(AtomicUsize::new(0));
    let stats = tracing::subscriber::with_default(WarnCounter(warnings.clone()), || {
        let builder = NonPositionalBuilder::new(IndexConfig::default()).unwrap();
        builder.build_index(&docs);
        builder.calculate_statistics(&docs).unwrap()
    });
    assert_eq!(stats.skipped_documents, 1);
    assert_eq!(warnings.load(Ordering::SeqCst), 1);
}
