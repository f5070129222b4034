//! Small HTML helpers for hover annotations and exported documents.

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// `<ul>` of escaped items, empty list included.
pub(crate) fn unordered_list<'a, I>(items: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let body: String = items
        .into_iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();
    format!("<ul>{body}</ul>")
}

/// Makes serialized JSON safe to inline inside a `<script>` element.
pub(crate) fn script_safe_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html("R&D <Lab> \"Ops\" 'Eng'"),
            "R&amp;D &lt;Lab&gt; &quot;Ops&quot; &#39;Eng&#39;"
        );
    }

    #[test]
    fn list_items_are_escaped() {
        assert_eq!(
            unordered_list(["Eng", "<b>Lead</b>"]),
            "<ul><li>Eng</li><li>&lt;b&gt;Lead&lt;/b&gt;</li></ul>"
        );
    }

    #[test]
    fn closing_tags_cannot_end_the_script_block() {
        assert_eq!(
            script_safe_json(r#"{"label":"</script>"}"#),
            r#"{"label":"<\/script>"}"#
        );
    }
}
