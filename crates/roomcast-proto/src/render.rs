//! HTML rendering of confirmed messages.
//!
//! Bubbles are aligned by authorship: the viewer's own messages sit on the
//! right with the primary palette, everyone else's on the left.

use crate::frame::MessageRecord;

const SELF_AVATAR: &str =
    "border-[rgba(230,57,70,0.35)] bg-[rgba(230,57,70,0.12)] text-[var(--color-primary)]";
const FRIEND_AVATAR: &str =
    "border-[rgba(42,157,143,0.35)] bg-[rgba(42,157,143,0.12)] text-[var(--color-text-muted)]";
const SELF_BUBBLE: &str = "rounded-br-sm bg-[rgba(230,57,70,0.2)]";
const FRIEND_BUBBLE: &str = "rounded-bl-sm bg-[rgba(42,157,143,0.18)]";

/// Escape the five HTML-significant characters.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a message body and turn line breaks into `<br />`.
pub fn format_body(body: &str) -> String {
    escape_html(body)
        .replace("\r\n", "<br />")
        .replace('\n', "<br />")
}

/// Render one message as a chat bubble for `viewer_id`.
pub fn render_message_bubble(message: &MessageRecord, viewer_id: &str) -> String {
    let is_self = message.author_id == viewer_id;
    let (alignment, ordering, avatar, bubble, from) = if is_self {
        ("flex justify-end", "flex-row-reverse", SELF_AVATAR, SELF_BUBBLE, "me")
    } else {
        ("flex justify-start", "", FRIEND_AVATAR, FRIEND_BUBBLE, "friend")
    };

    format!(
        r#"<div class="{alignment}" data-message-id="{id}" data-from="{from}">
	<div class="flex items-end gap-3 {ordering}">
		<span class="flex h-8 w-8 items-center justify-center rounded-full border {avatar} text-xs font-semibold uppercase">
			{initials}
		</span>
		<p class="max-w-xs rounded-2xl px-4 py-2 text-sm text-[var(--color-text)] {bubble}">
			{body}
		</p>
	</div>
</div>"#,
        id = escape_html(&message.id),
        initials = escape_html(&message.initials),
        body = format_body(&message.body),
    )
}

/// Render a sequence of messages in order.
pub fn render_message_list(messages: &[MessageRecord], viewer_id: &str) -> String {
    messages
        .iter()
        .map(|message| render_message_bubble(message, viewer_id))
        .collect()
}
