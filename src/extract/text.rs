use scraper::ElementRef;

// Elements that start a new line when rendered
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "tr", "ul",
];

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "template", "noscript"];

/// Visible lines of an element, roughly the way a browser's `innerText`
/// lays them out: `<br>` and block elements break lines, runs of ASCII
/// layout whitespace collapse to one space and blank lines are dropped.
pub(crate) fn inner_text_lines(element: ElementRef<'_>) -> Vec<String> {
    let mut raw = String::new();
    collect(element, &mut raw);

    raw.split('\n')
        .map(|line| {
            line.split(is_collapsible)
                .filter(|piece| !piece.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect()
}

// Only ASCII layout whitespace collapses; U+3000 and NBSP are content
fn is_collapsible(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\x0c')
}

fn collect(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            let name = child.value().name();
            if name == "br" {
                out.push('\n');
                continue;
            }
            if SKIPPED_ELEMENTS.contains(&name) {
                continue;
            }

            let block = BLOCK_ELEMENTS.contains(&name);
            if block {
                out.push('\n');
            }
            collect(child, out);
            if block {
                out.push('\n');
            }
        }
    }
}
