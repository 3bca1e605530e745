//! URL canonicalization.
//!
//! Every comparison in the toolset happens on the canonical form produced
//! here: host prefixes stripped, a fixed entity set decoded. The merger's
//! fragment-name to candidate-URL derivation also lives here so the
//! rewrite constants stay in one place.

use crate::config::MigrationConfig;

/// Ordered entity decode table. `&amp;` is deliberately absent: it is
/// decoded last, guarded, so already-resolved entities are not eaten twice.
const ENTITY_PASSES: [(&str, &str); 4] = [
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
];

/// Entity names that block a trailing `&amp;` decode when they immediately
/// follow it (`&amp;quot;` stays literal rather than becoming `&quot;`).
const AMP_GUARD: [&str; 5] = ["quot;", "#39;", "lt;", "gt;", "amp;"];

/// Canonicalize a raw URL-like string for comparison. Total; never fails.
///
/// Host prefixes (scheme, protocol-relative, bare domain) are stripped to
/// a fixpoint, an empty result defaults to `/`, then the fixed entity set
/// is decoded in order.
pub fn normalize(raw: &str) -> String {
    let mut s = raw.to_string();
    loop {
        let before = s.len();
        s = strip_scheme_host(s);
        s = strip_protocol_relative(s);
        s = strip_bare_domain(s);
        if s.len() == before {
            break;
        }
    }
    if s.is_empty() {
        s = "/".to_string();
    }
    decode_entities(&s)
}

/// Strip a leading `scheme://host` prefix: everything up to the first `/`
/// after the authority. No `/` after the authority means no path at all.
fn strip_scheme_host(s: String) -> String {
    if let Some(sep) = s.find("://") {
        if !s[..sep].contains('/') {
            let after_host = &s[sep + 3..];
            return match after_host.find('/') {
                Some(slash) => after_host[slash..].to_string(),
                None => String::new(),
            };
        }
    }
    s
}

/// Strip a leading protocol-relative `//host` prefix.
fn strip_protocol_relative(s: String) -> String {
    if let Some(rest) = s.strip_prefix("//") {
        return match rest.find('/') {
            Some(slash) => rest[slash..].to_string(),
            None => String::new(),
        };
    }
    s
}

/// Bare-domain heuristic: a non-slash prefix containing a dot, followed by
/// a slash, is a host written without a scheme. The host and its trailing
/// slash are both discarded.
fn strip_bare_domain(s: String) -> String {
    if !s.starts_with('/') {
        if let Some(slash) = s.find('/') {
            if slash > 0 && s[..slash].contains('.') {
                return s[slash + 1..].to_string();
            }
        }
    }
    s
}

/// Decode the fixed entity set. Ordering is correctness-critical: all
/// unambiguous entities first, `&amp;` last and only when not immediately
/// followed by another entity name.
fn decode_entities(s: &str) -> String {
    let mut out = s.to_string();
    for (pattern, replacement) in ENTITY_PASSES {
        out = out.replace(pattern, replacement);
    }
    decode_guarded_amp(&out)
}

fn decode_guarded_amp(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(at) = rest.find("&amp;") {
        out.push_str(&rest[..at]);
        let tail = &rest[at + 5..];
        if AMP_GUARD.iter().any(|guard| tail.starts_with(guard)) {
            out.push_str("&amp;");
        } else {
            out.push('&');
        }
        rest = tail;
    }
    out.push_str(rest);
    out
}

/// Derive the two candidate canonical URLs a fragment directory name can
/// match in the parent tree: the base-prefixed page path, and the same
/// path with the page suffix appended.
pub fn fragment_candidates(fragment_name: &str, config: &MigrationConfig) -> [String; 2] {
    let page_path = fragment_name.replace(&config.fragment_delimiter, "/");
    let plain = format!("{}{}", config.base_path, page_path);
    let suffixed = format!("{}{}", plain, config.page_suffix);
    [plain, suffixed]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_scheme_and_host() {
        assert_eq!(normalize("https://x.com/p?q#h"), "/p?q#h");
        assert_eq!(normalize("http://example.org/a/b"), "/a/b");
        assert_eq!(normalize("https://x.com"), "/");
    }

    #[test]
    fn strips_protocol_relative_host() {
        assert_eq!(normalize("//x.com/p"), "/p");
        assert_eq!(normalize("//x.com"), "/");
    }

    #[test]
    fn bare_domain_strip_discards_host_and_its_slash() {
        assert_eq!(normalize("x.com/p"), "p");
        assert_eq!(normalize("example.org/a/b.html"), "a/b.html");
        assert_eq!(normalize("x.com/"), "/");
    }

    #[test]
    fn dotted_leading_segments_strip_until_stable() {
        // Each pass re-matches the heuristic while a dotted prefix remains.
        assert_eq!(normalize("x.com/a.b/c"), "c");
        assert_eq!(normalize(&normalize("x.com/a.b/c")), "c");
    }

    #[test]
    fn empty_defaults_to_root() {
        assert_eq!(normalize(""), "/");
    }

    #[test]
    fn plain_paths_pass_through() {
        assert_eq!(normalize("/already/canonical"), "/already/canonical");
        assert_eq!(normalize("relative-no-dot"), "relative-no-dot");
    }

    #[test]
    fn decodes_entity_set() {
        assert_eq!(normalize("/p?a=&quot;x&quot;"), "/p?a=\"x\"");
        assert_eq!(normalize("/p?a=&#39;x&#39;"), "/p?a='x'");
        assert_eq!(normalize("/p&lt;x&gt;"), "/p<x>");
        assert_eq!(normalize("/p?a=1&amp;b=2"), "/p?a=1&b=2");
    }

    #[test]
    fn guarded_amp_does_not_double_decode() {
        // &amp;amp; must not collapse twice.
        assert_eq!(normalize("/p?a=&amp;amp;b"), "/p?a=&amp;amp;b");
        assert_eq!(normalize("/p?a=&amp;quot;"), "/p?a=&amp;quot;");
        // Unguarded trailing amp decodes once.
        assert_eq!(normalize("/p?a=&amp;"), "/p?a=&");
    }

    #[test]
    fn degenerate_slash_runs_are_stable() {
        let once = normalize("////");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn fragment_candidates_follow_base_path() {
        let config = MigrationConfig::default();
        let [plain, suffixed] = fragment_candidates("all-content-stores__foo", &config);
        assert_eq!(plain, "/content/share/us/en/all-content-stores/foo");
        assert_eq!(suffixed, "/content/share/us/en/all-content-stores/foo.html");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in "\\PC{0,64}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }
    }
}
