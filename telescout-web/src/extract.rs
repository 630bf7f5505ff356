//! Channel-name extraction passes over harvested links.
//!
//! Three independent, stateless passes, one per source-site URL shape.
//! A link that does not match a pass's pattern is silently skipped; a pass
//! with no matches yields an empty set.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static TGSTAT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([^/]+)").expect("tgstat pattern"));

static TELEGRAM_PREVIEW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(t\.me|telegram\.me)/s/([^/?]+)(?:\?[^/]+)?$").expect("telegram pattern")
});

static TELEMETR_CHANNEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"telemetr\.io/\w+/channels/\d+-(\w+)").expect("telemetr pattern"));

/// tgstat listing URLs carry the channel name after an `@` marker.
pub fn extract_tgstat_channel_names(links: &[String]) -> HashSet<String> {
    links
        .iter()
        .filter(|url| url.contains("tgstat.com"))
        .filter_map(|url| TGSTAT_NAME.captures(url))
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Telegram web-preview URLs: `https://t.me/s/{name}` or
/// `https://telegram.me/s/{name}`, optionally with a trailing query string.
pub fn extract_telegram_channel_names(links: &[String]) -> HashSet<String> {
    links
        .iter()
        .filter_map(|url| TELEGRAM_PREVIEW.captures(url))
        .map(|caps| caps[2].to_string())
        .collect()
}

/// telemetr channel pages put the name after a numeric channel id:
/// `telemetr.io/{lang}/channels/{id}-{name}`.
pub fn extract_telemetr_channel_names(links: &[String]) -> HashSet<String> {
    links
        .iter()
        .filter(|url| url.contains("telemetr.io"))
        .filter_map(|url| TELEMETR_CHANNEL.captures(url))
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Union of all three passes. Duplicates across passes collapse.
pub fn extract_channel_names(links: &[String]) -> HashSet<String> {
    let mut names = extract_tgstat_channel_names(links);
    names.extend(extract_telegram_channel_names(links));
    names.extend(extract_telemetr_channel_names(links));
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn passes_return_empty_sets_on_no_matches() {
        let input = links(&[
            "https://example.com/page",
            "https://news.example.org/a/b?x=1",
        ]);
        assert!(extract_tgstat_channel_names(&input).is_empty());
        assert!(extract_telegram_channel_names(&input).is_empty());
        assert!(extract_telemetr_channel_names(&input).is_empty());
    }

    #[test]
    fn tgstat_extracts_name_after_at_marker() {
        let input = links(&[
            "https://tgstat.com/channel/@leakhub/stat",
            "https://tgstat.com/en/search?q=x",
        ]);
        let names = extract_tgstat_channel_names(&input);
        assert_eq!(names, HashSet::from(["leakhub".to_string()]));
    }

    #[test]
    fn telegram_matches_both_hosts_and_optional_query() {
        let input = links(&[
            "https://t.me/s/leakhub",
            "http://telegram.me/s/darkfeed?before=120",
            "https://t.me/leakhub",        // no /s/ segment
            "https://t.me/s/",             // empty name
        ]);
        let names = extract_telegram_channel_names(&input);
        let expected: HashSet<String> =
            ["leakhub", "darkfeed"].iter().map(|s| s.to_string()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn telemetr_extracts_trailing_token_after_numeric_id() {
        let input = links(&[
            "https://telemetr.io/en/channels/1005000001-breachwatch",
            "https://telemetr.io/en/channels/breachwatch", // missing id segment
        ]);
        let names = extract_telemetr_channel_names(&input);
        let expected: HashSet<String> = HashSet::from(["breachwatch".to_string()]);
        assert_eq!(names, expected);
    }

    #[test]
    fn malformed_links_are_skipped_without_panicking() {
        let input = links(&[
            "tgstat.com",
            "telemetr.io/channels/",
            "https://t.me/s",
            "",
            "javascript:void(0)",
        ]);
        assert!(extract_channel_names(&input).is_empty());
    }

    #[test]
    fn union_collapses_duplicates_across_passes() {
        let input = links(&[
            "https://tgstat.com/channel/@leakhub",
            "https://t.me/s/leakhub",
            "https://telemetr.io/en/channels/42-leakhub",
            "https://t.me/s/darkfeed",
        ]);
        let names = extract_channel_names(&input);
        let expected: HashSet<String> =
            ["leakhub", "darkfeed"].iter().map(|s| s.to_string()).collect();
        assert_eq!(names, expected);
    }
}
