//! Built-in layouts: the performer ticket feed and the theater schedule page.

use super::schema::{ExtractionRule, ExtractionSchema, DEFAULT_JOIN};
use crate::error::ScrapeError;

/// Tag field for ticket feed records
pub const TALENT_TAG: &str = "TalentName";

/// Tag field for theater schedule records
pub const VENUE_TAG: &str = "Venue";

/// Cookie consent overlay on theater schedule pages
pub const CONSENT_BANNER: &str = ".cookie-consent";

/// Separator between open, start and end times on schedule pages
pub const TIMES_DELIMITER: &str = "｜";

/// Separator used for schedule performer lists
pub const MEMBERS_DELIMITER: &str = "／";

/// One record per ticket card in a performer's feed
pub fn ticket_feed() -> Result<ExtractionSchema, ScrapeError> {
    ExtractionSchema::new(
        "ticket_feed",
        "#feed_ticket_info2 .feed-item-container",
        vec![
            ExtractionRule::text("title", ".feed-ticket-title")?,
            ExtractionRule::text("date", ".opt-feed-ft-dateside p:first-child")?,
            ExtractionRule::text("time", ".opt-feed-ft-dateside p:last-child")?,
            ExtractionRule::text("members", ".opt-feed-ft-element-member")?.joined(DEFAULT_JOIN),
            ExtractionRule::text("venue", ".opt-feed-ft-element-venue")?,
            ExtractionRule::link("link", ".feed-item-link", "href")?,
            ExtractionRule::link("image", ".feed-item-img", "src")?,
        ],
    )
}

/// One record per day block on a theater's schedule page
pub fn theater_schedule() -> Result<ExtractionSchema, ScrapeError> {
    ExtractionSchema::new(
        "theater_schedule",
        ".schedule-block",
        vec![
            ExtractionRule::identifier("date", "id", "schedule"),
            ExtractionRule::text("title", "strong")?,
            ExtractionRule::split("openTime", "span", TIMES_DELIMITER, 0)?.strip("開場"),
            ExtractionRule::split("startTime", "span", TIMES_DELIMITER, 1)?.strip("開演"),
            ExtractionRule::split("endTime", "span", TIMES_DELIMITER, 2)?.strip("終演"),
            ExtractionRule::text("members", "dd.schedule-detail-member")?
                .joined(MEMBERS_DELIMITER),
            ExtractionRule::text("detail", "dl:nth-of-type(3) dd")?.joined(DEFAULT_JOIN),
            ExtractionRule::link("link", ".btns a:not(.is-pink)", "href")?,
        ],
    )
}
