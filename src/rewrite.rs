//! Charset-aware body patching and internal link rewriting.

use std::cmp::Reverse;
use std::path::Path;

use anyhow::{bail, Result};
use encoding_rs::Encoding;
use tracing::warn;

use crate::paths::map_resource_path;
use crate::resource::{raw_url_netloc, split_url_parts};
use crate::store::ResourceStore;

/// Decode a resource body using its declared charset.
///
/// Failures are local and recoverable: an unknown charset name or a byte
/// sequence the charset cannot decode produces a warning and `None`, and the
/// caller leaves the body unmodified.
pub(crate) fn decode_body(data: &[u8], charset: &str) -> Option<String> {
    let Some(encoding) = Encoding::for_label(charset.as_bytes()) else {
        warn!(charset, "unknown charset, leaving resource body unmodified");
        return None;
    };

    match encoding.decode_without_bom_handling_and_without_replacement(data) {
        Some(text) => Some(text.into_owned()),
        None => {
            warn!(
                charset,
                "failed to decode resource body, leaving it unmodified"
            );
            None
        }
    }
}

/// Re-encode a patched body with the charset it was decoded from.
///
/// `Encoding::encode` only produces output encodings, which for the UTF-16
/// variants means UTF-8; those are encoded by hand so a patched body keeps
/// the byte layout its charset declaration promises.
pub(crate) fn encode_body(text: &str, charset: &str) -> Vec<u8> {
    let encoding = Encoding::for_label(charset.as_bytes()).unwrap_or(encoding_rs::UTF_8);
    if encoding == encoding_rs::UTF_16LE {
        return text.encode_utf16().flat_map(u16::to_le_bytes).collect();
    }
    if encoding == encoding_rs::UTF_16BE {
        return text.encode_utf16().flat_map(u16::to_be_bytes).collect();
    }
    encoding.encode(text).0.into_owned()
}

/// Literal substring replacement inside one resource body.
///
/// The body is decoded with the declared charset, replaced, and re-encoded;
/// when decoding is impossible the original bytes are returned untouched.
pub fn patch_body(data: &[u8], needle: &str, replacement: &str, charset: &str) -> Vec<u8> {
    match decode_body(data, charset) {
        Some(text) => encode_body(&text.replace(needle, replacement), charset),
        None => data.to_vec(),
    }
}

/// Apply one literal substitution across every resource body in the store.
pub(crate) fn patch_all_bodies(store: &mut ResourceStore, needle: &str, replacement: &str) {
    store.update(|resource| {
        Some(resource.with_data(patch_body(
            resource.data(),
            needle,
            replacement,
            resource.charset(),
        )))
    });
}

/// Remove every literal absolute reference to the target host.
///
/// Both the `http` and `https` forms of the host (with its explicit port,
/// when present) are stripped from every body. This must run before the path
/// substitution pass: the locate strings are host-relative and would not
/// match absolute links.
pub fn strip_host_links(store: &mut ResourceStore, original_url: &str) -> Result<()> {
    // Sliced from the URL text, not re-serialized: the stripped prefix must
    // match the host exactly as captured links spell it, case included.
    let netloc = raw_url_netloc(original_url);
    if netloc.is_empty() {
        bail!("target URL {original_url} has no host component");
    }

    for scheme in ["http", "https"] {
        patch_all_bodies(store, &format!("{scheme}://{netloc}"), "");
    }
    Ok(())
}

/// Rewrite every resource onto its mapped path and fix the links pointing at
/// it.
///
/// The pass is two-phase. First every record whose mapped path differs from
/// its locate string (the raw URL path, plus the `&amp;`-escaped query as it
/// appears inside an HTML attribute) has its `resource_url` replaced and the
/// `(locate, replacement)` pair recorded. Only then are the collected pairs
/// applied across every body in the store, longest locate first, so a path
/// that is a strict prefix of another cannot corrupt the longer occurrence.
pub fn rewrite_resource_paths(store: &mut ResourceStore, output_dir: &Path, max_path_len: usize) {
    let mut substitutions: Vec<(String, String)> = Vec::new();

    store.update(|resource| {
        let (path, query) = split_url_parts(resource.resource_url());
        let mapped = map_resource_path(resource, output_dir, max_path_len);

        let locate = if query.is_empty() {
            path
        } else {
            format!("{path}?{}", query.replace('&', "&amp;"))
        };

        if locate == mapped {
            return None;
        }
        substitutions.push((locate, mapped.clone()));
        Some(resource.with_resource_url(mapped))
    });

    substitutions.sort_by_key(|(locate, _)| Reverse(locate.len()));

    for (locate, replacement) in &substitutions {
        patch_all_bodies(store, locate, replacement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use md5::{Digest, Md5};

    use crate::resource::CapturedResource;

    fn html_resource(url: &str, body: &str) -> CapturedResource {
        let (_, query) = split_url_parts(url);
        CapturedResource::new(url, "text/html", body.as_bytes().to_vec(), url, "utf-8", query)
    }

    #[test]
    fn patch_body_replaces_literal_substrings() {
        let patched = patch_body(b"<a href=\"/old\">/old</a>", "/old", "/new", "utf-8");
        assert_eq!(patched, b"<a href=\"/new\">/new</a>");
    }

    #[test]
    fn unknown_charset_leaves_the_body_unmodified() {
        let data = b"<a href=\"/old\">".to_vec();
        assert_eq!(patch_body(&data, "/old", "/new", "no-such-charset"), data);
    }

    #[test]
    fn undecodable_bytes_leave_the_body_unmodified() {
        let data = vec![0xff, 0xfe, b'/', b'o', b'l', b'd'];
        assert_eq!(patch_body(&data, "/old", "/new", "utf-8"), data);
    }

    #[test]
    fn patches_non_utf8_charsets() {
        // "caf\xe9 /old" in windows-1252
        let data = b"caf\xe9 /old".to_vec();
        let patched = patch_body(&data, "/old", "/new", "windows-1252");
        assert_eq!(patched, b"caf\xe9 /new".to_vec());
    }

    #[test]
    fn patches_utf16_bodies_in_their_declared_charset() {
        let utf16le = |s: &str| -> Vec<u8> { s.encode_utf16().flat_map(u16::to_le_bytes).collect() };
        let utf16be = |s: &str| -> Vec<u8> { s.encode_utf16().flat_map(u16::to_be_bytes).collect() };

        let patched = patch_body(&utf16le("<a href=\"/old\">"), "/old", "/new", "utf-16le");
        assert_eq!(patched, utf16le("<a href=\"/new\">"));

        let patched = patch_body(&utf16be("<a href=\"/old\">"), "/old", "/new", "utf-16be");
        assert_eq!(patched, utf16be("<a href=\"/new\">"));
    }

    #[test]
    fn strips_both_schemes_of_the_target_host() {
        let mut store = ResourceStore::new();
        store.insert(html_resource(
            "http://site.example/index.html",
            "<a href=\"http://site.example/a\"></a><img src=\"https://site.example/b.png\">",
        ));

        strip_host_links(&mut store, "http://site.example/index.html").unwrap();

        let body = store.get("http://site.example/index.html").unwrap().data().to_vec();
        let body = String::from_utf8(body).unwrap();
        assert_eq!(body, "<a href=\"/a\"></a><img src=\"/b.png\">");
    }

    #[test]
    fn keeps_explicit_ports_in_the_host_prefix() {
        let mut store = ResourceStore::new();
        store.insert(html_resource(
            "http://site.example:8080/index.html",
            "<a href=\"http://site.example:8080/a\"></a>",
        ));

        strip_host_links(&mut store, "http://site.example:8080/index.html").unwrap();

        let body = store
            .get("http://site.example:8080/index.html")
            .unwrap()
            .data()
            .to_vec();
        assert_eq!(String::from_utf8(body).unwrap(), "<a href=\"/a\"></a>");
    }

    #[test]
    fn preserves_host_case_when_stripping() {
        let mut store = ResourceStore::new();
        store.insert(html_resource(
            "http://Site.Example/index.html",
            "<a href=\"http://Site.Example/a\"></a>",
        ));

        strip_host_links(&mut store, "http://Site.Example/index.html").unwrap();

        let body = store
            .get("http://Site.Example/index.html")
            .unwrap()
            .data()
            .to_vec();
        assert_eq!(String::from_utf8(body).unwrap(), "<a href=\"/a\"></a>");
    }

    #[test]
    fn hostless_target_urls_are_rejected() {
        let mut store = ResourceStore::new();
        assert!(strip_host_links(&mut store, "/index.html").is_err());
    }

    #[test]
    fn rewrites_links_and_resource_urls_in_one_batch() {
        let mut store = ResourceStore::new();
        store.insert(html_resource(
            "http://s/index.html",
            "<script src=\"/app?v=1\"></script>",
        ));
        store.insert(CapturedResource::new(
            "http://s/app?v=1",
            "text/javascript",
            b"console.log(1)".to_vec(),
            "http://s/app?v=1",
            "utf-8",
            "v=1",
        ));

        rewrite_resource_paths(&mut store, Path::new("/out"), 255);

        let digest = hex::encode(Md5::digest(b"v=1"));
        let expected = format!("/app_{digest}.js");
        assert_eq!(store.get("http://s/app?v=1").unwrap().resource_url(), expected);

        let body = store.get("http://s/index.html").unwrap().data().to_vec();
        let body = String::from_utf8(body).unwrap();
        assert_eq!(body, format!("<script src=\"{expected}\"></script>"));
    }

    #[test]
    fn locate_strings_match_attribute_escaped_queries() {
        let mut store = ResourceStore::new();
        store.insert(html_resource(
            "http://s/index.html",
            "<script src=\"/app?x=1&amp;y=2\"></script>",
        ));
        store.insert(CapturedResource::new(
            "http://s/app?x=1&y=2",
            "text/javascript",
            Vec::new(),
            "http://s/app?x=1&y=2",
            "utf-8",
            "x=1&y=2",
        ));

        rewrite_resource_paths(&mut store, Path::new("/out"), 255);

        let digest = hex::encode(Md5::digest(b"x=1&y=2"));
        let body = store.get("http://s/index.html").unwrap().data().to_vec();
        let body = String::from_utf8(body).unwrap();
        assert_eq!(body, format!("<script src=\"/app_{digest}.js\"></script>"));
    }

    #[test]
    fn longer_locate_strings_are_applied_first() {
        // "/a" is a strict prefix of "/a/b?x=1"; applying it first would
        // break the longer link before its own substitution could match.
        // Longest-first guarantees the query-hashed filename is fully formed.
        let mut store = ResourceStore::new();
        store.insert(html_resource(
            "http://s/index.html",
            "<a href=\"/a/b?x=1\"></a>",
        ));
        store.insert(CapturedResource::new(
            "http://s/a",
            "text/css",
            Vec::new(),
            "http://s/a",
            "utf-8",
            "",
        ));
        store.insert(CapturedResource::new(
            "http://s/a/b?x=1",
            "text/javascript",
            Vec::new(),
            "http://s/a/b?x=1",
            "utf-8",
            "x=1",
        ));

        rewrite_resource_paths(&mut store, Path::new("/out"), 255);

        let digest = hex::encode(Md5::digest(b"x=1"));
        let expected = format!("/a/b_{digest}.js");
        assert_eq!(
            store.get("http://s/a/b?x=1").unwrap().resource_url(),
            expected
        );

        let body = store.get("http://s/index.html").unwrap().data().to_vec();
        let body = String::from_utf8(body).unwrap();
        assert!(!body.contains("?x=1"), "stale query link left behind: {body}");
        assert!(
            body.contains(&format!("b_{digest}.js")),
            "hashed filename corrupted: {body}"
        );
    }

    #[test]
    fn unchanged_paths_produce_no_substitution() {
        let mut store = ResourceStore::new();
        store.insert(html_resource(
            "http://s/page.html",
            "<a href=\"/page.html\"></a>",
        ));

        rewrite_resource_paths(&mut store, Path::new("/out"), 255);

        let resource = store.get("http://s/page.html").unwrap();
        assert_eq!(resource.resource_url(), "http://s/page.html");
        assert_eq!(resource.data(), b"<a href=\"/page.html\"></a>");
    }
}
