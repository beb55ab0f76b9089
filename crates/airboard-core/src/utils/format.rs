use reqwest::Url;

/// Search page used for the "Get tickets" link on each card.
const TICKET_SEARCH_URL: &str = "https://www.google.com/search";

/// Format an optional field, returning "N/A" if missing or blank
pub fn or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "N/A",
    }
}

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Web search link for buying tickets on an airline.
pub fn ticket_search_url(airline_name: &str) -> String {
    match Url::parse_with_params(TICKET_SEARCH_URL, &[("q", airline_name)]) {
        Ok(url) => url.to_string(),
        Err(_) => TICKET_SEARCH_URL.to_string(),
    }
}
