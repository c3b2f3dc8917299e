mod schema;
pub mod schemas;
mod text;

pub use schema::{
    ExtractionMode, ExtractionRule, ExtractionSchema, FieldSource, DEFAULT_JOIN, DEFAULT_VALUE,
};

pub(crate) use schema::parse_selector;

use crate::model::RawRecord;
use crate::render::Document;
use log::debug;
use reqwest::Url;

/// Extract one record per fragment matching the schema's record selector.
///
/// Every record carries every schema field; fields that cannot be read get
/// the rule's default. A document with no matching fragments yields an
/// empty vector. The document is only read.
pub fn extract(document: &Document, schema: &ExtractionSchema) -> Vec<RawRecord> {
    let base = Url::parse(document.url()).ok();

    let records: Vec<RawRecord> = document
        .html()
        .select(schema.record_selector())
        .map(|fragment| {
            schema
                .rules()
                .iter()
                .map(|rule| (rule.name().to_string(), rule.resolve(fragment, base.as_ref())))
                .collect()
        })
        .collect();

    debug!(
        "Extracted {} record(s) from {} using {}",
        records.len(),
        document.url(),
        schema.name()
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_page(items: &str) -> Document {
        Document::parse(
            "https://tickets.example.com/talent/1234",
            &format!(
                r#"<html><body><div id="feed_ticket_info2">{}</div></body></html>"#,
                items
            ),
        )
    }

    #[test]
    fn test_missing_member_element_defaults() {
        let doc = feed_page(
            r#"<div class="feed-item-container">
                <div class="feed-ticket-title">Fan Meeting</div>
                <div class="opt-feed-ft-dateside"><p>2024/05/01</p><p>18:30</p></div>
            </div>"#,
        );
        let records = extract(&doc, &schemas::ticket_feed().unwrap());

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.get("title"), Some("Fan Meeting"));
        assert_eq!(record.get("date"), Some("2024/05/01"));
        assert_eq!(record.get("time"), Some("18:30"));
        assert_eq!(record.get("members"), Some("-"));
        assert_eq!(record.get("venue"), Some("-"));
        assert_eq!(record.get("link"), Some("-"));
        assert_eq!(record.len(), 7);
    }

    #[test]
    fn test_members_line_breaks_are_joined() {
        let doc = feed_page(
            r#"<div class="feed-item-container">
                <div class="opt-feed-ft-element-member">Alice
Bob</div>
            </div>
            <div class="feed-item-container">
                <div class="opt-feed-ft-element-member">Carol<br>Dave</div>
            </div>"#,
        );
        let records = extract(&doc, &schemas::ticket_feed().unwrap());

        assert_eq!(records[0].get("members"), Some("Alice|Bob"));
        assert_eq!(records[1].get("members"), Some("Carol|Dave"));
    }

    #[test]
    fn test_relative_link_resolved_against_page() {
        let doc = feed_page(
            r#"<div class="feed-item-container">
                <a class="feed-item-link" href="/ticket/99">more</a>
                <img class="feed-item-img" src="https://cdn.example.com/a.jpg">
            </div>"#,
        );
        let records = extract(&doc, &schemas::ticket_feed().unwrap());

        assert_eq!(
            records[0].get("link"),
            Some("https://tickets.example.com/ticket/99")
        );
        assert_eq!(records[0].get("image"), Some("https://cdn.example.com/a.jpg"));
    }

    #[test]
    fn test_empty_text_uses_default() {
        let doc = feed_page(
            r#"<div class="feed-item-container">
                <div class="feed-ticket-title">   </div>
            </div>"#,
        );
        let records = extract(&doc, &schemas::ticket_feed().unwrap());
        assert_eq!(records[0].get("title"), Some("-"));
    }

    #[test]
    fn test_no_fragments_yields_nothing() {
        let doc = Document::parse("https://example.com", "<html><body></body></html>");
        assert!(extract(&doc, &schemas::ticket_feed().unwrap()).is_empty());
        assert!(extract(&doc, &schemas::theater_schedule().unwrap()).is_empty());
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let doc = feed_page(
            r#"<div class="feed-item-container"><div class="feed-ticket-title">A</div></div>
               <div class="feed-item-container"><div class="feed-ticket-title">A</div></div>"#,
        );
        let schema = schemas::ticket_feed().unwrap();
        let first = extract(&doc, &schema);
        let second = extract(&doc, &schema);

        assert_eq!(first, second);
        // duplicate fragments stay duplicated
        assert_eq!(first.len(), 2);
        assert_eq!(first[0], first[1]);
    }

    #[test]
    fn test_custom_default_and_attribute_mode() {
        let schema = ExtractionSchema::new(
            "custom",
            "li",
            vec![
                ExtractionRule::attribute("slug", "a", "data-slug")
                    .unwrap()
                    .with_default("n/a"),
                ExtractionRule::text("label", "a").unwrap(),
            ],
        )
        .unwrap();
        let doc = Document::parse(
            "https://example.com",
            r#"<ul><li><a data-slug="one">One</a></li><li><a>Two</a></li></ul>"#,
        );
        let records = extract(&doc, &schema);

        assert_eq!(records[0].get("slug"), Some("one"));
        assert_eq!(records[1].get("slug"), Some("n/a"));
        assert_eq!(records[1].get("label"), Some("Two"));
    }
}
