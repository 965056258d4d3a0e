// src/extract/html.rs
// =============================================================================
// This module finds third-party domains in an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Is built on html5ever (Mozilla's HTML parser), which never gives up on
//   broken markup - it always produces some tree
//
// The document is built with scripting turned off, the way a non-browser
// parser sees it: tags inside <noscript> (tracking pixels, tag-manager
// iframes) are real elements instead of one opaque text node.
//
// We also use the `url` crate to:
// - Parse attribute values as URLs
// - Pull the hostname out of absolute URLs
//
// Only resource-loading tags count: <script>, <img>, <link> and <iframe>.
// Plain <a> links are ignored because they don't make the browser contact
// another server when the page loads.
//
// Rust concepts:
// - Traits with generic associated types (TagTree::Tag<'a>)
// - Option chaining with ? inside functions returning Option
// - BTreeSet: a set that keeps its items sorted
// =============================================================================

use html5ever::driver::{parse_document, ParseOpts};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use scraper::{ElementRef, Html};
use std::collections::BTreeSet;
use url::Url;

/// Tags whose `src`/`href` make the browser fetch something.
pub const RESOURCE_TAGS: [&str; 4] = ["script", "img", "link", "iframe"];

/// Attributes inspected on every resource tag.
pub const RESOURCE_ATTRIBUTES: [&str; 2] = ["src", "href"];

// A parsed document that can be searched by tag name.
//
// The extractor only needs these two capabilities, so any HTML parser can
// sit behind it. Implementations must not fail on malformed tags; they just
// return whatever tags they managed to recognise.
pub trait TagTree {
    type Tag<'a>: TagNode
    where
        Self: 'a;

    /// All tags whose name is one of `kinds`, in document order.
    fn find_tags<'a>(&'a self, kinds: &[&str]) -> Vec<Self::Tag<'a>>;
}

/// A single tag found in a `TagTree`.
pub trait TagNode {
    fn attr(&self, name: &str) -> Option<&str>;
}

// The scraper-backed tag tree used for real pages
pub struct HtmlTree {
    document: Html,
}

impl HtmlTree {
    pub fn parse(html: &str) -> Self {
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                scripting_enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };

        Self {
            document: parse_document(Html::new_document(), opts).one(html),
        }
    }
}

impl TagTree for HtmlTree {
    type Tag<'a> = ElementRef<'a>;

    fn find_tags<'a>(&'a self, kinds: &[&str]) -> Vec<ElementRef<'a>> {
        self.document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| kinds.contains(&element.value().name()))
            .collect()
    }
}

impl TagNode for ElementRef<'_> {
    fn attr(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }
}

// Extracts the distinct third-party hostnames referenced by an HTML page
//
// Parameters:
//   html: the page markup (borrowed as &str)
//   base_domain: the seed's hostname
//
// Returns: the hostnames, sorted, with duplicates removed
//
// Example:
//   html = "<script src='https://cdn.example.com/a.js'></script>"
//   base_domain = "foo.com"
//   result = {"cdn.example.com"}
pub fn extract_third_party_domains(html: &str, base_domain: &str) -> BTreeSet<String> {
    let tree = HtmlTree::parse(html);
    third_party_domains(&tree, base_domain)
}

/// Same as [`extract_third_party_domains`], over any already-parsed tree.
pub fn third_party_domains<T: TagTree>(tree: &T, base_domain: &str) -> BTreeSet<String> {
    let mut domains = BTreeSet::new();

    for tag in tree.find_tags(&RESOURCE_TAGS) {
        for attr in RESOURCE_ATTRIBUTES {
            let Some(value) = tag.attr(attr) else {
                continue;
            };

            let Some(host) = network_location(value) else {
                continue;
            };

            // Plain substring test, not a suffix match: "cdn.foo.com" and
            // "foo.com.mirror.net" are both treated as the base domain.
            if !host.contains(base_domain) {
                domains.insert(host);
            }
        }
    }

    domains
}

// Returns the hostname of an attribute value, if it has one
//
// Accepted:
//   "https://cdn.example.com/a.js" -> Some("cdn.example.com")
//   "//cdn.example.com/a.js"       -> Some("cdn.example.com") (protocol-relative)
//   "https://CDN.Example.com/a.js" -> Some("CDN.Example.com") (case kept)
// Skipped:
//   "/local/logo.png", "logo.png", "#top", "data:...", "mailto:...", ""
fn network_location(value: &str) -> Option<String> {
    let value = value.trim();

    let url = if value.starts_with("//") {
        Url::parse(&format!("http:{}", value)).ok()?
    } else if value.contains("://") {
        Url::parse(value).ok()?
    } else {
        return None;
    };

    // The url crate only decides whether there is a host; the text itself
    // comes from the attribute so its case survives.
    url.host_str().filter(|host| !host.is_empty())?;
    authority_host(value).map(str::to_string)
}

/// The host exactly as written in `scheme://host:port/...` or `//host/...`,
/// with userinfo and port removed.
pub fn authority_host(value: &str) -> Option<&str> {
    let (_, rest) = value.split_once("//")?;
    let authority = rest.split(['/', '\\', '?', '#']).next().unwrap_or("");
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);

    let host = match host_port.find(']') {
        Some(end) if host_port.starts_with('[') => &host_port[..=end],
        _ => host_port.split(':').next().unwrap_or(""),
    };

    (!host.is_empty()).then_some(host)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a TagTree trait instead of using scraper directly?
//    - The extraction rules (which tags, which attributes, which hosts)
//      don't care how the HTML was parsed
//    - Tests can hand the rules a tiny fake tree
//
// 2. What is `type Tag<'a> ... where Self: 'a`?
//    - A generic associated type: each tree picks its own tag type
//    - The lifetime ties the tags to the tree they were found in, so a tag
//      can never outlive its document
//
// 3. What is let-else?
//    - `let Some(x) = expr else { continue; };`
//    - Binds x when the pattern matches, otherwise runs the else block
//    - Keeps the happy path un-indented
//
// 4. Why BTreeSet and not HashSet?
//    - Both remove duplicates
//    - BTreeSet also keeps items sorted, so the same page always gives the
//      same report order
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn domains(html: &str, base: &str) -> Vec<String> {
        extract_third_party_domains(html, base).into_iter().collect()
    }

    #[test]
    fn test_script_on_other_domain() {
        let html = r#"<script src="https://cdn.example.com/a.js"></script>"#;
        assert_eq!(domains(html, "foo.com"), vec!["cdn.example.com"]);
    }

    #[test]
    fn test_skip_relative_link() {
        let html = r#"<img src="/local/logo.png">"#;
        assert!(domains(html, "foo.com").is_empty());
    }

    #[test]
    fn test_skip_base_domain() {
        let html = r#"<link href="https://foo.com/style.css">"#;
        assert!(domains(html, "foo.com").is_empty());
    }

    #[test]
    fn test_base_domain_is_substring_match() {
        let html = r#"
            <script src="https://static.foo.com/a.js"></script>
            <script src="https://foo.com.mirror.net/b.js"></script>
            <script src="https://notfoo.com/c.js"></script>
            <script src="https://foo.org/d.js"></script>
        "#;
        assert_eq!(domains(html, "foo.com"), vec!["foo.org"]);
    }

    #[test]
    fn test_only_resource_tags_count() {
        let html = r#"
            <a href="https://anchor.example.net/">link</a>
            <video src="https://video.example.net/v.mp4"></video>
            <embed src="https://embed.example.net/e.swf">
            <img src="https://img.example.net/i.png">
            <iframe src="https://player.example.net/embed/1"></iframe>
            <link rel="stylesheet" href="https://fonts.example.net/css">
            <script src="https://js.example.net/app.js"></script>
        "#;
        assert_eq!(
            domains(html, "foo.com"),
            vec![
                "fonts.example.net",
                "img.example.net",
                "js.example.net",
                "player.example.net",
            ]
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let html = r#"
            <script src="https://cdn.example.com/a.js"></script>
            <script src="https://cdn.example.com/b.js"></script>
            <img src="https://cdn.example.com/logo.png">
        "#;
        assert_eq!(domains(html, "foo.com"), vec!["cdn.example.com"]);
    }

    #[test]
    fn test_both_src_and_href_are_read() {
        let html = r#"<link href="https://one.example.net/x.css" src="https://two.example.net/y">"#;
        assert_eq!(
            domains(html, "foo.com"),
            vec!["one.example.net", "two.example.net"]
        );
    }

    #[test]
    fn test_skip_schemeless_and_special_values() {
        let html = r##"
            <img src="cdn.example.com/logo.png">
            <img src="#top">
            <img src="">
            <img src="data:image/png;base64,AAAA">
            <link href="mailto:someone@example.com">
            <script src="javascript:void(0)"></script>
        "##;
        assert!(domains(html, "foo.com").is_empty());
    }

    #[test]
    fn test_protocol_relative_link_has_host() {
        let html = r#"<script src="//ajax.example.org/jquery.js"></script>"#;
        assert_eq!(domains(html, "foo.com"), vec!["ajax.example.org"]);
    }

    #[test]
    fn test_port_is_not_part_of_host() {
        let html = r#"<script src="https://cdn.example.com:8443/a.js"></script>"#;
        assert_eq!(domains(html, "foo.com"), vec!["cdn.example.com"]);
    }

    #[test]
    fn test_host_case_is_kept() {
        let html = r#"
            <script src="https://CDN.FOO.COM/a.js"></script>
            <img src="https://Img.Example.NET/b.png">
        "#;
        assert_eq!(domains(html, "foo.com"), vec!["CDN.FOO.COM", "Img.Example.NET"]);
    }

    #[test]
    fn test_authority_host() {
        assert_eq!(authority_host("https://cdn.example.com/a.js"), Some("cdn.example.com"));
        assert_eq!(authority_host("//Ajax.Example.org"), Some("Ajax.Example.org"));
        assert_eq!(authority_host("https://user:pw@cdn.example.com:8443/x"), Some("cdn.example.com"));
        assert_eq!(authority_host("http://[::1]:8080/"), Some("[::1]"));
        assert_eq!(authority_host("https://cdn.example.com?q=1"), Some("cdn.example.com"));
        assert_eq!(authority_host("/local/logo.png"), None);
        assert_eq!(authority_host("https:///nohost"), None);
    }

    #[test]
    fn test_noscript_content_is_parsed() {
        let html = r#"
            <html><head>
              <script src="https://js.example.net/app.js"></script>
              <noscript><img src="https://www.facebook.com/tr?id=1"></noscript>
            </head><body>
              <noscript><iframe src="https://www.googletagmanager.com/ns.html"></iframe></noscript>
            </body></html>
        "#;
        assert_eq!(
            domains(html, "foo.com"),
            vec!["js.example.net", "www.facebook.com", "www.googletagmanager.com"]
        );
    }

    #[test]
    fn test_malformed_markup_is_tolerated() {
        let html = r#"
            <div><p>unclosed <img src="https://img.example.net/a.png">
            <script src="https://bad host/x.js"></script>
            <iframe src="https://player.example.net/1"></div></span>
        "#;
        assert_eq!(
            domains(html, "foo.com"),
            vec!["img.example.net", "player.example.net"]
        );
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let html = r#"
            <script src="https://b.example.net/x.js"></script>
            <img src="https://a.example.net/y.png">
        "#;
        assert_eq!(
            extract_third_party_domains(html, "foo.com"),
            extract_third_party_domains(html, "foo.com")
        );
    }

    // A hand-built tree shows the rules work with any TagTree
    struct FakeTree(Vec<(&'static str, Vec<(&'static str, &'static str)>)>);
    struct FakeTag<'a>(&'a [(&'static str, &'static str)]);

    impl TagNode for FakeTag<'_> {
        fn attr(&self, name: &str) -> Option<&str> {
            self.0.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
        }
    }

    impl TagTree for FakeTree {
        type Tag<'a> = FakeTag<'a>;

        fn find_tags<'a>(&'a self, kinds: &[&str]) -> Vec<FakeTag<'a>> {
            self.0
                .iter()
                .filter(|(name, _)| kinds.contains(name))
                .map(|(_, attrs)| FakeTag(attrs))
                .collect()
        }
    }

    #[test]
    fn test_rules_over_custom_tree() {
        let tree = FakeTree(vec![
            ("script", vec![("src", "https://cdn.example.com/a.js")]),
            ("a", vec![("href", "https://ignored.example.com/")]),
            ("iframe", vec![("src", "https://www.foo.com/embed")]),
        ]);
        let found: Vec<_> = third_party_domains(&tree, "foo.com").into_iter().collect();
        assert_eq!(found, vec!["cdn.example.com"]);
    }
}
