//! Sitemap rendering.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url><loc>https://example.com/content/65a1b2c3d4e5f60718293a4b</loc></url>
//! </urlset>
//! ```

use std::borrow::Cow;
use url::Url;

use crate::proto;

/// Standard sitemap namespace.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Canonical URLs of a content list.
#[derive(Debug, Default)]
pub struct Sitemap {
    /// One location per content record, in upstream order.
    locations: Vec<String>,
}

impl Sitemap {
    /// One `<base>/content/<id>` location per content record.
    #[must_use]
    pub fn build(base_url: &Url, contents: &[proto::Content]) -> Self {
        let locations = contents
            .iter()
            .map(|content| content_url(base_url, &content.id))
            .collect();
        Self { locations }
    }

    /// Number of `<url>` entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the sitemap lists nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Render the XML document.
    #[must_use]
    pub fn into_xml(self) -> String {
        let mut xml = String::with_capacity(128 + self.locations.len() * 96);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for loc in self.locations {
            xml.push_str("  <url><loc>");
            xml.push_str(&escape_xml(&loc));
            xml.push_str("</loc></url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// `<base>/content/<id>`, with `id` encoded as a single path segment.
#[must_use]
pub fn content_url(base_url: &Url, id: &str) -> String {
    let mut url = base_url.clone();
    let pushed = url
        .path_segments_mut()
        .map(|mut segments| {
            segments.pop_if_empty().push("content").push(id);
        })
        .is_ok();
    if pushed {
        return url.into();
    }
    // Only reachable for cannot-be-a-base URLs, which the CLI rejects.
    format!("{}/content/{id}", base_url.as_str().trim_end_matches('/'))
}

/// Escape special XML characters.
fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    Cow::Owned(
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
