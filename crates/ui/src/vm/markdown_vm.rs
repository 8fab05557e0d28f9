use std::collections::{HashMap, HashSet};

/// Objectives listed when a lesson arrives without a body.
pub const PLACEHOLDER_OBJECTIVES: [&str; 4] = [
    "Understand the fundamental principles",
    "Apply concepts to real-world scenarios",
    "Analyze case studies and examples",
    "Practice problem-solving techniques",
];

/// Sanitized HTML for a lesson body.
///
/// HTML bodies are cleaned, anything else is rendered as markdown. A missing
/// body yields a generic outline that names the module.
#[must_use]
pub fn lesson_body_html(content: Option<&str>, module_title: &str) -> String {
    match content.map(str::trim).filter(|c| !c.is_empty()) {
        Some(body) if looks_like_html(body) => sanitize_html(body),
        Some(body) => markdown_to_html(body),
        None => placeholder_html(module_title),
    }
}

fn placeholder_html(module_title: &str) -> String {
    let mut html = format!(
        "<p>This lesson covers important concepts in {module_title}.</p><h3>Key Learning Objectives:</h3><ul>"
    );
    for objective in PLACEHOLDER_OBJECTIVES {
        html.push_str("<li>");
        html.push_str(objective);
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    sanitize_html(&html)
}

#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let mut options = pulldown_cmark::Options::empty();
    options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);
    options.insert(pulldown_cmark::Options::ENABLE_TABLES);

    let parser = pulldown_cmark::Parser::new_ext(input, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    sanitize_html(&html)
}

#[must_use]
pub fn html_to_markdown(input: &str) -> String {
    let markdown = html2md::parse_html(input);
    normalize_markdown(&markdown)
}

/// Clean backend-authored HTML down to the tags a lesson needs.
#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "div", "span", "br", "hr", "em", "strong", "b", "i", "u", "code", "pre",
        "blockquote", "ul", "ol", "li", "a", "h1", "h2", "h3", "h4", "table", "thead", "tbody",
        "tr", "th", "td",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .clean(html)
        .to_string()
}

/// Plain text with block-level tags turned into line breaks.
#[must_use]
pub fn strip_html_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    let mut tag_buf = String::new();

    for ch in input.chars() {
        if in_tag {
            if ch == '>' {
                in_tag = false;
                let tag = tag_buf.trim().trim_start_matches('/').to_ascii_lowercase();
                let name = tag.split_whitespace().next().unwrap_or("");
                if matches!(
                    name,
                    "br" | "p" | "div" | "li" | "blockquote" | "pre" | "h1" | "h2" | "h3" | "h4"
                ) {
                    out.push('\n');
                }
                tag_buf.clear();
            } else {
                tag_buf.push(ch);
            }
            continue;
        }

        if ch == '<' {
            in_tag = true;
            tag_buf.clear();
            continue;
        }

        out.push(ch);
    }

    out.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[must_use]
pub fn looks_like_html(input: &str) -> bool {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return false;
    }

    let lower = trimmed.to_ascii_lowercase();
    let Some(start) = lower.find('<') else {
        return false;
    };
    if !lower[start + 1..].contains('>') {
        return false;
    }

    let tags = [
        "<!doctype",
        "<html",
        "<body",
        "<p",
        "<div",
        "<span",
        "<br",
        "<a ",
        "<h1",
        "<h2",
        "<h3",
        "<h4",
        "<ul",
        "<ol",
        "<strong",
        "<em",
    ];
    tags.iter().any(|tag| lower.contains(tag))
}

#[must_use]
pub fn normalize_markdown(input: &str) -> String {
    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = Vec::new();
    let mut blank_streak = 0usize;

    for line in normalized.split('\n') {
        let trimmed = line.trim_end_matches([' ', '\t']).to_string();
        if trimmed.is_empty() {
            blank_streak += 1;
            if blank_streak > 1 {
                continue;
            }
        } else {
            blank_streak = 0;
        }
        lines.push(trimmed);
    }

    let mut output = lines.join("\n").trim_start_matches('\n').to_owned();
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    output
}
