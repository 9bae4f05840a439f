//! Escaping helpers for rendering links

/// Escape HTML special characters
///
/// # Examples
///
/// ```
/// use reinhardt_link::html::escape_html;
///
/// assert_eq!(escape_html("<b>\"Tom\" & 'Jerry'</b>"), "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;");
/// ```
pub fn escape_html(input: &str) -> String {
	input
		.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}

/// Escape HTML attribute values
pub fn escape_html_attr(input: &str) -> String {
	escape_html(input)
		.replace('\n', "&#10;")
		.replace('\r', "&#13;")
}

/// Check that an href cannot run script when rendered
///
/// # Examples
///
/// ```
/// use reinhardt_link::html::is_safe_url;
///
/// assert!(is_safe_url("https://example.com"));
/// assert!(is_safe_url("/path/to/page"));
/// assert!(is_safe_url("mailto:user@example.com"));
/// assert!(is_safe_url("tel:+4930123456"));
/// assert!(!is_safe_url("javascript:alert(1)"));
/// assert!(!is_safe_url("../parent/path"));
/// ```
pub fn is_safe_url(url: &str) -> bool {
	let url_lower = url.trim().to_lowercase();

	// Relative URLs and anchors, but not parent traversal
	if url_lower.starts_with('/')
		|| url_lower.starts_with("./")
		|| url_lower.starts_with('#')
		|| url_lower.starts_with('?')
	{
		return true;
	}

	let safe_protocols = ["http://", "https://", "mailto:", "tel:", "ftp://", "ftps://"];

	safe_protocols
		.iter()
		.any(|protocol| url_lower.starts_with(protocol))
}
