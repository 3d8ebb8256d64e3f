//! Pure transform from a technical record to its patient-facing message.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::models::{TechnicalRecord, VisibleMessage};

pub const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

/// Fixed label on the referral link button.
pub const MAP_LABEL: &str = "Ver centros cercanos";

// Escaped in the maps query value: everything the query syntax could
// misread, with space as %20.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'&')
    .add(b'=')
    .add(b'+')
    .add(b'%');

/// Build the maps-search link for a referral query.
pub fn maps_search_url(query: &str) -> String {
    format!("{MAPS_SEARCH_URL}{}", utf8_percent_encode(query, QUERY_VALUE))
}

/// Turn a parsed record into the assistant chat entry.
///
/// Deterministic and side-effect free. A referral link appears only when the
/// model both asked for a referral and supplied a usable query; the
/// emergency banner additionally requires High or Vital Emergency severity.
/// Severity alone never triggers the banner.
pub fn interpret(record: &TechnicalRecord) -> VisibleMessage {
    let query = record
        .referral_query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());

    match query {
        Some(query) if record.referral_needed => VisibleMessage {
            map_url: Some(maps_search_url(query)),
            map_label: Some(MAP_LABEL.to_string()),
            is_emergency: record.severity.is_urgent(),
            ..VisibleMessage::assistant(&record.patient_reply)
        },
        _ => VisibleMessage::assistant(&record.patient_reply),
    }
}
