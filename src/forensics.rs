//! Client-side forensics instrumentation for the root document.

use anyhow::{Context, Result};

use crate::rewrite::{decode_body, encode_body};
use crate::store::ResourceStore;

const CLOSE_HEAD_TAG: &str = "</head>";

/// Script block inserted into the root document.
///
/// The referenced script and the reporting endpoint are served by the
/// downstream trap server; the snippet posts the collected session object as
/// JSON to a sibling path of whatever URL the document was browsed under.
const CLIENT_FORENSICS_SNIPPET: &str = r#"<script src="/session.js"></script>
<script>
	var xhr = new XMLHttpRequest();
	xhr.open("POST", window.location.href + "additional_data", true);
	xhr.setRequestHeader('Content-Type', 'application/json');
	xhr.send(JSON.stringify(session, null, '\t'));
</script>"#;

/// Insert the forensics script block into the root document.
///
/// The snippet lands immediately before the first literal, case-sensitive
/// `</head>`. A document without that marker is left untouched; only the
/// record keyed by `original_url` is considered at all.
pub fn inject_forensics_script(store: &mut ResourceStore, original_url: &str) -> Result<()> {
    let updated = {
        let root = store
            .get(original_url)
            .with_context(|| format!("root resource {original_url} missing from store"))?;
        root.with_data(insert_before_close_head(root.data(), root.charset()))
    };
    store.insert(updated);
    Ok(())
}

fn insert_before_close_head(data: &[u8], charset: &str) -> Vec<u8> {
    let Some(text) = decode_body(data, charset) else {
        return data.to_vec();
    };

    match text.find(CLOSE_HEAD_TAG) {
        Some(at) => {
            let mut patched =
                String::with_capacity(text.len() + CLIENT_FORENSICS_SNIPPET.len());
            patched.push_str(&text[..at]);
            patched.push_str(CLIENT_FORENSICS_SNIPPET);
            patched.push_str(&text[at..]);
            encode_body(&patched, charset)
        }
        None => data.to_vec(),
    }
}
