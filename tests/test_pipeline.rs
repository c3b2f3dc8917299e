use async_trait::async_trait;
use event_scrape::{
    Document, FailurePolicy, PipelineBuilder, Renderer, RenderingSession, ScrapeError,
    TargetDescriptor, TargetOutcome,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Serves canned pages; any URL it does not know fails to load
#[derive(Default)]
struct StaticRenderer {
    pages: HashMap<String, String>,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl StaticRenderer {
    fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

impl Renderer for StaticRenderer {
    fn backend_name(&self) -> &str {
        "static"
    }

    fn session(&self) -> Result<Box<dyn RenderingSession>, ScrapeError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(StaticSession {
            pages: self.pages.clone(),
            closed: self.closed.clone(),
            open: true,
        }))
    }
}

struct StaticSession {
    pages: HashMap<String, String>,
    closed: Arc<AtomicUsize>,
    open: bool,
}

#[async_trait]
impl RenderingSession for StaticSession {
    async fn open(&mut self, url: &str) -> Result<Document, ScrapeError> {
        match self.pages.get(url) {
            Some(html) => Ok(Document::parse(url, html)),
            None => Err(ScrapeError::Navigation {
                url: url.to_string(),
                reason: "unreachable".to_string(),
            }),
        }
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn feed(titles: &[&str]) -> String {
    let items: String = titles
        .iter()
        .map(|t| {
            format!(
                r#"<div class="feed-item-container"><div class="feed-ticket-title">{}</div></div>"#,
                t
            )
        })
        .collect();
    format!(r#"<div id="feed_ticket_info2">{}</div>"#, items)
}

const BASE: &str = "https://talent.example.com/";

#[tokio::test]
async fn test_empty_targets_yield_empty_collection() {
    let renderer = Arc::new(StaticRenderer::default());
    let pipeline = PipelineBuilder::talent_tickets()
        .unwrap()
        .renderer(renderer.clone())
        .build()
        .unwrap();

    let results = pipeline.run(&[]).await.unwrap();
    assert!(results.is_empty());
    assert_eq!(serde_json::to_string(&results).unwrap(), "[]");
    assert_eq!(renderer.opened.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_results_follow_target_order() {
    let renderer = Arc::new(
        StaticRenderer::default()
            .with_page("https://talent.example.com/a", &feed(&["A1", "A2"]))
            .with_page("https://talent.example.com/b", &feed(&["B1"])),
    );
    let pipeline = PipelineBuilder::talent_tickets()
        .unwrap()
        .renderer(renderer.clone())
        .build()
        .unwrap();
    let targets = vec![
        TargetDescriptor::performer(BASE, "a", "Alice"),
        TargetDescriptor::performer(BASE, "b", "Bob"),
    ];

    let results = pipeline.run(&targets).await.unwrap();

    let rows: Vec<_> = results
        .iter()
        .map(|r| (r.get("TalentName").unwrap(), r.get("title").unwrap()))
        .collect();
    assert_eq!(
        rows,
        vec![("Alice", "A1"), ("Alice", "A2"), ("Bob", "B1")]
    );
    assert_eq!(renderer.opened.load(Ordering::SeqCst), 2);
    assert_eq!(renderer.closed.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_skip_policy_keeps_other_targets() {
    let renderer = Arc::new(
        StaticRenderer::default()
            .with_page("https://talent.example.com/a", &feed(&["A1"]))
            .with_page("https://talent.example.com/c", &feed(&["C1"])),
    );
    let pipeline = PipelineBuilder::talent_tickets()
        .unwrap()
        .renderer(renderer.clone())
        .build()
        .unwrap();
    let targets = vec![
        TargetDescriptor::performer(BASE, "a", "Alice"),
        TargetDescriptor::performer(BASE, "missing", "Nobody"),
        TargetDescriptor::performer(BASE, "c", "Carol"),
    ];

    let results = pipeline.run(&targets).await.unwrap();

    let names: Vec<_> = results.iter().map(|r| r.tag()).collect();
    assert_eq!(names, vec!["Alice", "Carol"]);
    // the failed session is closed as well
    assert_eq!(renderer.closed.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_abort_policy_stops_at_first_failure() {
    let renderer = Arc::new(
        StaticRenderer::default()
            .with_page("https://talent.example.com/c", &feed(&["C1"])),
    );
    let pipeline = PipelineBuilder::talent_tickets()
        .unwrap()
        .renderer(renderer.clone())
        .failure_policy(FailurePolicy::Abort)
        .build()
        .unwrap();
    let targets = vec![
        TargetDescriptor::performer(BASE, "missing", "Nobody"),
        TargetDescriptor::performer(BASE, "c", "Carol"),
    ];

    let result = pipeline.run(&targets).await;

    match result {
        Err(ScrapeError::Navigation { url, .. }) => {
            assert_eq!(url, "https://talent.example.com/missing")
        }
        other => panic!("expected navigation error, got {:?}", other),
    }
    assert_eq!(renderer.opened.load(Ordering::SeqCst), 1);
    assert_eq!(renderer.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_scrape_target_reports_failure() {
    let pipeline = PipelineBuilder::talent_tickets()
        .unwrap()
        .renderer(Arc::new(StaticRenderer::default()))
        .build()
        .unwrap();

    let outcome = pipeline
        .scrape_target(&TargetDescriptor::performer(BASE, "x", "X"))
        .await;
    assert!(matches!(outcome, TargetOutcome::Failure(ScrapeError::Navigation { .. })));
}

#[tokio::test]
async fn test_schedule_banner_hidden_and_titles_excluded() {
    let page = r#"
        <div class="cookie-consent"><span>cookies</span><strong>Accept</strong></div>
        <div class="schedule-block" id="schedule20240501">
            <strong>Comedy Night</strong><span>18:00｜18:30｜20:00</span>
        </div>
        <div class="schedule-block" id="schedule20240502">
            <strong>休館日</strong>
        </div>
    "#;
    let renderer = Arc::new(
        StaticRenderer::default().with_page("https://theater.example.com/hall", page),
    );
    let pipeline = PipelineBuilder::theater_schedules()
        .unwrap()
        .renderer(renderer)
        .exclude_titles(["休館日", "貸切"])
        .build()
        .unwrap();

    let results = pipeline
        .run(&[TargetDescriptor::venue("https://theater.example.com/hall", "Hall")])
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    let record = &results.records()[0];
    assert_eq!(record.get("Venue"), Some("Hall"));
    assert_eq!(record.get("date"), Some("20240501"));
    assert_eq!(record.get("title"), Some("Comedy Night"));

    let json = serde_json::to_value(&results).unwrap();
    assert_eq!(json[0]["startTime"], "18:30");
}
