use anyhow::{anyhow, Result};
use scraper::{Html, Selector};
use webindex_core::FieldKind;

/// Pulls the text of one [`FieldKind`] out of an HTML page.
pub struct FieldExtractor {
    field: FieldKind,
    selector: Selector,
}

impl FieldExtractor {
    pub fn new(field: FieldKind) -> Result<Self> {
        let selector = Selector::parse(field.selector())
            .map_err(|e| anyhow!("invalid selector `{}`: {e:?}", field.selector()))?;
        Ok(Self { field, selector })
    }

    pub fn field(&self) -> FieldKind { self.field }

    /// Text of every matching element in document order, each preceded by a space.
    pub fn extract(&self, html: &str) -> String {
        let doc = Html::parse_document(html);
        let mut raw = String::new();
        for el in doc.select(&self.selector) {
            raw.push(' ');
            raw.extend(el.text());
        }
        raw
    }
}
