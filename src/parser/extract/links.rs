use std::sync::LazyLock;

use regex::Regex;

use crate::parser::text::{content_lines, region_after};
use crate::record::VideoLink;

static START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)Video Links.*?Module.*?No\..*?Link ID").unwrap());
static END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)SEMESTER").unwrap());

/// `<module> <url>` rows of the video links table.
pub fn extract(section: &str) -> Vec<VideoLink> {
    region_after(section, &START_RE, &END_RE, true)
        .map(|region| content_lines(region).filter_map(parse_link_line).collect())
        .unwrap_or_default()
}

/// A row is a link only when its first token is a module number and its
/// second looks like a URL. Angle brackets around the URL are dropped.
pub fn parse_link_line(line: &str) -> Option<VideoLink> {
    let mut tokens = line.split_whitespace();
    let module = tokens.next()?.parse::<u32>().ok()?;
    let url = tokens.next()?;
    if !url.trim_start_matches('<').starts_with("http") {
        return None;
    }
    Some(VideoLink {
        module,
        url: url.trim_matches(|c: char| c == '<' || c == '>').to_string(),
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracketed_url() {
        assert_eq!(
            parse_link_line("2 <http://example.com/video>"),
            Some(VideoLink { module: 2, url: "http://example.com/video".into() })
        );
    }

    #[test]
    fn non_numeric_module_rejected() {
        assert_eq!(parse_link_line("abc http://x"), None);
        assert_eq!(parse_link_line("3 see notes"), None);
        assert_eq!(parse_link_line("4"), None);
    }

    #[test]
    fn region_lines_in_order() {
        let text = "Video Links (NPTEL)\nModule\nNo. Link ID\n\
            1 https://nptel.ac.in/a\n\
            junk line\n\
            2 <https://nptel.ac.in/b>\n\
            SEMESTER S4\n3 https://late.example";
        let links = extract(text);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url, "https://nptel.ac.in/a");
        assert_eq!(links[1].module, 2);
    }

    #[test]
    fn no_table_no_links() {
        assert!(extract("1 https://nptel.ac.in/a").is_empty());
    }
}
