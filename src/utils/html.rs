// src/utils/html.rs

/// Sanitizes user-supplied blog HTML.
///
/// Safe formatting tags (`<p>`, `<b>`, `<a href>`, ...) are kept while
/// `<script>`, `<iframe>` and event-handler attributes are stripped, so stored
/// posts can be rendered by the frontend as HTML.
pub fn sanitize_content(input: &str) -> String {
    ammonia::clean(input)
}
