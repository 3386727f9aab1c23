//! HTML pages, compiled in from `templates/` and filled by placeholder
//! substitution. Every substituted value is attribute-escaped.

use crate::models::RoomPage;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const ROOM_TEMPLATE: &str = include_str!("../templates/room.html");

/// Escape a value for use inside a double-quoted HTML attribute or text node.
pub fn escape_html_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Room chooser with sign-in for `room_id`.
pub fn index_page(room_id: &str) -> String {
    INDEX_TEMPLATE.replace("{{ROOM_ID}}", &escape_html_attribute(room_id))
}

/// Room page carrying everything the client video SDK needs to connect.
pub fn room_page(page: &RoomPage) -> String {
    ROOM_TEMPLATE
        .replace("{{API_KEY}}", &escape_html_attribute(&page.api_key))
        .replace("{{SESSION_ID}}", &escape_html_attribute(&page.session_id))
        .replace("{{TOKEN}}", &escape_html_attribute(&page.token))
        .replace("{{ROOM_ID}}", &escape_html_attribute(&page.room_id))
        .replace("{{USERNAME}}", &escape_html_attribute(&page.username))
}
