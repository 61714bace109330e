use tempfile::tempdir;
use webindex_core::persist::{
    load_non_positional, load_positional, load_statistics, load_stemmed_index, save_non_positional,
    save_positional, save_statistics, save_stemmed_index, to_pretty_json, IndexPaths,
};
use webindex_core::{load_documents, FieldKind, IndexBuilder, IndexConfig, NonPositionalBuilder, PositionalBuilder};

const CRAWL: &str = r#"[
    {"title": "Le chat noir", "url": "https://a.fr/1"},
    {"title": "Un chat blanc et un chien", "url": "https://a.fr/2", "lang": "fr"},
    {"title": "Les chats dorment", "url": "https://a.fr/3"}
]"#;

#[test]
fn indexes_round_trip_through_json() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("crawled_urls.json");
    std::fs::write(&input, CRAWL).unwrap();
    let docs = load_documents(&input).unwrap();
    let paths = IndexPaths::new(dir.path().join("out"), FieldKind::Title);

    let builder = NonPositionalBuilder::new(IndexConfig::default()).unwrap();
    let index = builder.build_index(&docs);
    save_non_positional(&paths, &index).unwrap();
    assert_eq!(load_non_positional(&paths).unwrap(), index);

    let stemmed = builder.stem_index(&index);
    save_stemmed_index(&paths, &stemmed).unwrap();
    assert_eq!(load_stemmed_index(&paths).unwrap(), stemmed);

    let stats = builder.calculate_statistics(&docs).unwrap();
    save_statistics(&paths, &stats).unwrap();
    assert_eq!(load_statistics(&paths).unwrap(), stats);

    let positional = PositionalBuilder::new(IndexConfig::default()).unwrap().build_index(&docs);
    save_positional(&paths, &positional).unwrap();
    assert_eq!(load_positional(&paths).unwrap(), positional);
}

#[test]
fn rebuilding_is_byte_identical() {
    let docs: Vec<_> = serde_json::from_str(CRAWL).unwrap();
    let builder = NonPositionalBuilder::new(IndexConfig::default()).unwrap();
    let first = to_pretty_json(&builder.build_index(&docs)).unwrap();
    let second = to_pretty_json(&builder.build_index(&docs)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn metadata_lists_fields_in_source_order() {
    let docs: Vec<_> = serde_json::from_str(CRAWL).unwrap();
    let stats = NonPositionalBuilder::new(IndexConfig::default()).unwrap().calculate_statistics(&docs).unwrap();
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["num_documents"], 3);
    assert_eq!(json["total_tokens"], 12);
    assert_eq!(json["tokens_per_field"], serde_json::json!({"title": 12, "lang": 1}));
}
