//! Content negotiation from the `Accept` header.

use http::HeaderMap;
use http::header::ACCEPT;
use minstore_codec::Encoding;

/// Pick the response encoding a request prefers.
///
/// Each media range in `Accept` is weighed by its `q` parameter. JSON is
/// chosen only when a JSON range (`application/json`, `text/json` or a
/// `+json` suffix) strictly outranks every XML or wildcard range; ties go to
/// the range listed first. A missing or unparsable header yields XML.
#[must_use]
pub fn negotiate(headers: &HeaderMap) -> Encoding {
    let Some(accept) = headers.get(ACCEPT).and_then(|v| v.to_str().ok()) else {
        return Encoding::Xml;
    };

    let mut best: Option<(f32, Encoding)> = None;
    for range in accept.split(',') {
        let Ok(media) = range.trim().parse::<mime::Mime>() else {
            continue;
        };
        let Some(encoding) = classify(&media) else {
            continue;
        };
        let quality = media
            .get_param("q")
            .and_then(|q| q.as_str().parse::<f32>().ok())
            .unwrap_or(1.0);
        if quality <= 0.0 {
            continue;
        }
        if best.is_none_or(|(top, _)| quality > top) {
            best = Some((quality, encoding));
        }
    }

    best.map_or(Encoding::Xml, |(_, encoding)| encoding)
}

fn classify(media: &mime::Mime) -> Option<Encoding> {
    let is_json = media.subtype() == mime::JSON || media.suffix() == Some(mime::JSON);
    let is_xml = media.subtype() == mime::XML || media.suffix() == Some(mime::XML);
    match media.type_() {
        t if (t == mime::APPLICATION || t == mime::TEXT) && is_json => Some(Encoding::Json),
        t if (t == mime::APPLICATION || t == mime::TEXT) && is_xml => Some(Encoding::Xml),
        t if t == mime::STAR || media.subtype() == mime::STAR => Some(Encoding::Xml),
        _ => None,
    }
}
