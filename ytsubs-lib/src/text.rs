//! Caption text cleanup
//!
//! Only the five entities the timed-text endpoint emits are decoded. Any other
//! entity (`&nbsp;`, `&#233;`, ...) is passed through verbatim.

use std::borrow::Cow;

/// Entities decoded by [`clean_text`], applied in this order.
const ENTITIES: [(&str, &str); 5] = [
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
];

/// Decode entities, strip tags, collapse whitespace, trim.
pub fn clean_text(raw: &str) -> String {
    let decoded = decode_entities(raw);
    let stripped = regex!(r"<[^>]+>").replace_all(&decoded, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }
    let mut out = raw.to_string();
    for (entity, replacement) in ENTITIES {
        if out.contains(entity) {
            out = out.replace(entity, replacement);
        }
    }
    Cow::Owned(out)
}
