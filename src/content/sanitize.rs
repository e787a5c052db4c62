//! Allowlist HTML sanitizer for post bodies, plus the plain-text excerpt helper.
//!
//! Input is parsed with `scraper` (html5ever) and re-serialized from the parsed tree, so entity
//! references are decoded before any check and malformed tags never reach the output verbatim.

use scraper::{ElementRef, Html, node::Node};

/// Elements removed together with everything inside them.
const STRIPPED_ELEMENTS: [&str; 7] = [
    "script", "style", "iframe", "object", "embed", "noscript", "template",
];

/// Attributes accepted on every allowed element.
const GLOBAL_ATTRIBUTES: [&str; 5] = ["class", "id", "title", "lang", "dir"];

/// Allowed elements without a closing tag.
const VOID_ELEMENTS: [&str; 3] = ["br", "hr", "img"];

/// Allowed elements and their element-specific attributes, in output order.
const ALLOWED_ELEMENTS: &[(&str, &[&str])] = &[
    ("a", &["href", "rel", "target", "name"]),
    ("abbr", &[]),
    ("b", &[]),
    ("blockquote", &["cite"]),
    ("br", &[]),
    ("caption", &[]),
    ("cite", &[]),
    ("code", &[]),
    ("del", &["datetime"]),
    ("div", &["align"]),
    ("em", &[]),
    ("figcaption", &[]),
    ("figure", &[]),
    ("h1", &[]),
    ("h2", &[]),
    ("h3", &[]),
    ("h4", &[]),
    ("h5", &[]),
    ("h6", &[]),
    ("hr", &[]),
    ("i", &[]),
    ("img", &["src", "alt", "width", "height", "loading", "srcset", "sizes"]),
    ("ins", &["datetime"]),
    ("li", &[]),
    ("ol", &["start", "reversed"]),
    ("p", &["align"]),
    ("pre", &[]),
    ("q", &["cite"]),
    ("s", &[]),
    ("small", &[]),
    ("span", &[]),
    ("strong", &[]),
    ("sub", &[]),
    ("sup", &[]),
    ("table", &[]),
    ("tbody", &[]),
    ("td", &["colspan", "rowspan"]),
    ("tfoot", &[]),
    ("th", &["colspan", "rowspan", "scope"]),
    ("thead", &[]),
    ("tr", &[]),
    ("u", &[]),
    ("ul", &[]),
];

const URL_ATTRIBUTES: [&str; 4] = ["href", "src", "cite", "srcset"];
const BLOCKED_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// Reduce arbitrary HTML to the allowed content subset.
pub fn sanitize_html(input: &str) -> String {
    let fragment = Html::parse_fragment(input);
    let mut out = String::with_capacity(input.len());
    render_children(fragment.root_element(), &mut out);
    out
}

fn render_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&escape_text(&text.text)),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    render_element(child_element, out);
                }
            }
            _ => {}
        }
    }
}

fn render_element(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if STRIPPED_ELEMENTS.contains(&name) {
        return;
    }
    let Some((_, element_attributes)) = ALLOWED_ELEMENTS.iter().find(|(tag, _)| *tag == name)
    else {
        render_children(element, out);
        return;
    };

    out.push('<');
    out.push_str(name);
    for attribute in element_attributes.iter().chain(GLOBAL_ATTRIBUTES.iter()) {
        let Some(value) = element.value().attr(attribute) else {
            continue;
        };
        if URL_ATTRIBUTES.contains(attribute) && has_blocked_scheme(value) {
            continue;
        }
        out.push_str(&format!(r#" {attribute}="{}""#, escape_attribute(value)));
    }

    if VOID_ELEMENTS.contains(&name) {
        out.push_str(" />");
        return;
    }
    out.push('>');
    render_children(element, out);
    out.push_str(&format!("</{name}>"));
}

/// `value` is already entity-decoded by the parser.
fn has_blocked_scheme(value: &str) -> bool {
    let normalized = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCKED_SCHEMES
        .iter()
        .any(|scheme| normalized.contains(scheme))
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape text for use inside a double-quoted HTML attribute.
pub fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Strip markup and keep at most `max_words` words, appending `...` when truncated.
pub fn excerpt_words(html: &str, max_words: usize) -> String {
    let fragment = Html::parse_fragment(html);
    let mut text = String::new();
    collect_text(fragment.root_element(), &mut text);

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > max_words {
        format!("{}...", words[..max_words].join(" "))
    } else {
        words.join(" ")
    }
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(&text.text);
                out.push(' ');
            }
            Node::Element(element) if STRIPPED_ELEMENTS.contains(&element.name()) => {}
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}
