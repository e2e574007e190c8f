//! Coerce provider replies into domain records

use crate::config::AggregatorConfig;
use crate::error::AggregatorError;
use crate::parser::{parse_payload, PhoneCandidate};
use mobilezone_domain::phone::synthesize_id;
use mobilezone_domain::traits::ProviderReply;
use mobilezone_domain::{Citation, PhoneRecord, PhoneSpecs, SearchReport, NOT_AVAILABLE};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::debug;

/// Characters a URI component keeps as-is; everything else is escaped
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Turn a raw provider reply into a settled report
pub fn normalize_reply(
    reply: ProviderReply,
    config: &AggregatorConfig,
) -> Result<SearchReport, AggregatorError> {
    let payload = parse_payload(reply.text.as_deref())?;

    let phones: Vec<PhoneRecord> = payload
        .candidates
        .into_iter()
        .enumerate()
        .map(|(idx, candidate)| normalize_candidate(idx, candidate, config))
        .collect();

    let citations: Vec<Citation> = reply
        .sources
        .into_iter()
        .map(|source| Citation::new(source.title, source.uri))
        .collect();

    debug!(
        "Normalized {} phones and {} citations",
        phones.len(),
        citations.len()
    );

    let summary = payload
        .summary
        .unwrap_or_else(|| config.default_summary.clone());

    Ok(SearchReport::found(summary, citations, phones))
}

/// Build a full record from a candidate at position `idx`
pub fn normalize_candidate(
    idx: usize,
    candidate: PhoneCandidate,
    config: &AggregatorConfig,
) -> PhoneRecord {
    let image = placeholder_image(&candidate.name, config);
    let or_unknown = |field: Option<String>| field.unwrap_or_else(|| NOT_AVAILABLE.to_string());

    PhoneRecord {
        id: synthesize_id(idx),
        image,
        specs: PhoneSpecs {
            processor: or_unknown(candidate.processor),
            ram: or_unknown(candidate.ram),
            storage: or_unknown(candidate.storage),
            display: or_unknown(candidate.display),
            camera: or_unknown(candidate.camera),
            battery: or_unknown(candidate.battery),
            os: or_unknown(candidate.os),
        },
        name: candidate.name,
        brand: candidate.brand,
        price: candidate.price,
        currency: config.currency.clone(),
        release_date: config.release_label.clone(),
        rating: config.default_rating,
        is_trending: None,
    }
}

/// Deterministic placeholder image for a phone name
///
/// The name is escaped as a whole URI component, so `/`, `&` or `+` stay
/// inside one path segment: `<image_base><name>/<width>/<height>`.
pub fn placeholder_image(name: &str, config: &AggregatorConfig) -> String {
    format!(
        "{}/{}/{}/{}",
        config.image_base.trim_end_matches('/'),
        utf8_percent_encode(name, URI_COMPONENT),
        config.image_width,
        config.image_height
    )
}
