use serde_json::Value;
use tracing::{debug, info, warn};

use crate::types::{
    datetime::parse_local_datetime, suggestion::SuggestionRecord, PlanType, SuggestedItem,
};

/// Parse a raw completion into suggestions.
///
/// Never fails: a payload that is not a JSON array yields an empty list, and
/// elements that do not decode are skipped individually.
pub fn parse_suggestions(raw: &str) -> Vec<SuggestedItem> {
    let Some(array_text) = extract_json_array(raw) else {
        warn!(
            target: "itinerary::parser",
            chars = raw.len(),
            "no JSON array found in completion"
        );
        return Vec::new();
    };

    let elements: Vec<Value> = match serde_json::from_str(array_text) {
        Ok(elements) => elements,
        Err(err) => {
            warn!(target: "itinerary::parser", error = %err, "completion array is not valid JSON");
            debug!(target: "itinerary::parser", payload = %array_text);
            return Vec::new();
        }
    };

    let run_stamp = chrono::Utc::now().timestamp_millis();
    let total = elements.len();
    let items: Vec<SuggestedItem> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| match decode_item(element, index, run_stamp) {
            Ok(item) => Some(item),
            Err(reason) => {
                warn!(target: "itinerary::parser", index, %reason, "skipping suggestion");
                None
            }
        })
        .collect();

    info!(
        target: "itinerary::parser",
        parsed = items.len(),
        skipped = total - items.len(),
        "parsed suggestions"
    );
    items
}

fn decode_item(element: Value, index: usize, run_stamp: i64) -> Result<SuggestedItem, String> {
    let raw_type = element
        .get("type")
        .and_then(|value| value.as_str())
        .map(|s| s.to_string());

    let record: SuggestionRecord = serde_path_to_error::deserialize(element).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        format!("invalid field at {}: {}", location, err.inner())
    })?;

    if record.plan_type == PlanType::Unmapped {
        warn!(
            target: "itinerary::parser",
            index,
            raw_type = raw_type.as_deref().unwrap_or_default(),
            "unknown plan type, treating as activity"
        );
    }

    let start_time = parse_local_datetime(&record.start_time)
        .ok_or_else(|| format!("unparsable startTime `{}`", record.start_time))?;
    if start_time
        .checked_add_signed(record.plan_type.default_duration())
        .is_none()
    {
        return Err(format!("startTime `{}` is out of range", record.start_time));
    }

    Ok(SuggestedItem {
        id: format!("ai-{}-{}", run_stamp, index),
        plan_type: record.plan_type,
        title: record.title,
        address: record.address,
        lat: record.lat,
        lng: record.lng,
        start_time,
        cost: record.expense.filter(|cost| cost.is_finite() && *cost >= 0.0),
        description: record.description,
        notes: record.notes,
        image_ref: None,
    })
}

/// Strip code fences and slice from the first `[` to the last `]`.
pub(crate) fn extract_json_array(raw: &str) -> Option<&str> {
    let unfenced = strip_code_fence(raw.trim());
    let start = unfenced.find('[')?;
    let end = unfenced.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&unfenced[start..=end])
}

/// Return the body of the first fenced block, with or without a language tag.
fn strip_code_fence(text: &str) -> &str {
    let Some(open) = text.find("```") else {
        return text;
    };

    let after_marker = &text[open + 3..];
    // The language tag, if any, runs to the end of the opening line.
    let body = match after_marker.find('\n') {
        Some(newline) => &after_marker[newline + 1..],
        None => after_marker.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };

    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_lodging() {
        let raw = r#"[{"type":"LODGING","title":"Hotel A","address":"X","lat":10.1,"lng":106.1,"startTime":"2026-01-16T14:00:00","expense":1200000}]"#;
        let items = parse_suggestions(raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].plan_type, PlanType::Lodging);
        assert_eq!(items[0].cost, Some(1_200_000.0));
        assert_eq!(items[0].lat, 10.1);
        assert!(items[0].description.is_none());
        assert!(items[0].notes.is_none());
        assert!(items[0].image_ref.is_none());
    }

    #[test]
    fn test_fenced_with_one_malformed_element() {
        let raw = "```json\n[\n  {\"type\":\"RESTAURANT\",\"title\":\"Pho\",\"address\":\"A\",\"lat\":21.0,\"lng\":105.8,\"startTime\":\"2026-01-10T12:00:00\"},\n  {\"type\":\"TOUR\",\"title\":\"Walk\",\"address\":\"B\",\"lng\":105.8,\"startTime\":\"2026-01-10T08:00:00\"}\n]\n```";
        let items = parse_suggestions(raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Pho");
    }

    #[test]
    fn test_fenced_without_language_tag_and_with_prose() {
        let raw = "Here is your plan:\n```\n[{\"type\":\"BOAT\",\"title\":\"Bay cruise\",\"address\":\"Ha Long\",\"lat\":20.9,\"lng\":107.1,\"startTime\":\"2026-01-11T09:00:00\",\"expense\":500000}]\n```\nEnjoy!";
        let items = parse_suggestions(raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].plan_type, PlanType::Boat);
    }

    #[test]
    fn test_prose_around_bare_array() {
        let raw = "Sure! [{\"type\":\"SHOPPING\",\"title\":\"Market\",\"address\":\"C\",\"lat\":1,\"lng\":2,\"startTime\":\"2026-01-10T15:00:00\"}] Have fun.";
        assert_eq!(parse_suggestions(raw).len(), 1);
    }

    #[test]
    fn test_no_array_is_empty() {
        assert!(parse_suggestions("no array here").is_empty());
        assert!(parse_suggestions("").is_empty());
        assert!(parse_suggestions("] backwards [").is_empty());
    }

    #[test]
    fn test_empty_array_is_empty_list() {
        assert!(parse_suggestions("[]").is_empty());
        assert!(parse_suggestions("```json\n[]\n```").is_empty());
    }

    #[test]
    fn test_broken_array_is_all_or_nothing() {
        let raw = r#"[{"type":"TOUR","title":"A","address":"B","lat":1,"lng":2,"startTime":"2026-01-10T08:00:00"}, {"type": ]"#;
        assert!(parse_suggestions(raw).is_empty());
    }

    #[test]
    fn test_unknown_type_survives_as_unmapped() {
        let raw = r#"[{"type":"SPA","title":"Massage","address":"D","lat":1,"lng":2,"startTime":"2026-01-10T16:00:00"},
                      {"type":7,"title":"Bad","address":"E","lat":1,"lng":2,"startTime":"2026-01-10T16:00:00"}]"#;
        let items = parse_suggestions(raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].plan_type, PlanType::Unmapped);
    }

    #[test]
    fn test_bad_start_time_skips_item() {
        let raw = r#"[{"type":"TOUR","title":"A","address":"B","lat":1,"lng":2,"startTime":"morning"},
                      {"type":"TOUR","title":"C","address":"D","lat":1,"lng":2,"startTime":"2026-01-10T08:00"}]"#;
        let items = parse_suggestions(raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "C");
    }

    #[test]
    fn test_start_time_at_calendar_edge_skips_item() {
        let raw = r#"[{"type":"LODGING","title":"Far future","address":"B","lat":1,"lng":2,"startTime":"+262142-12-31T23:00:00"},
                      {"type":"LODGING","title":"Hotel","address":"D","lat":1,"lng":2,"startTime":"2026-01-10T14:00:00"}]"#;
        let items = parse_suggestions(raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Hotel");
    }

    #[test]
    fn test_negative_or_missing_cost_is_absent() {
        let raw = r#"[{"type":"TOUR","title":"A","address":"B","lat":1,"lng":2,"startTime":"2026-01-10T08:00:00","expense":-5},
                      {"type":"TOUR","title":"C","address":"D","lat":1,"lng":2,"startTime":"2026-01-10T10:00:00","expense":0}]"#;
        let items = parse_suggestions(raw);
        assert_eq!(items[0].cost, None);
        assert_eq!(items[1].cost, Some(0.0));
    }

    #[test]
    fn test_ids_unique_within_run() {
        let raw = r#"[{"type":"TOUR","title":"A","address":"B","lat":1,"lng":2,"startTime":"2026-01-10T08:00:00"},
                      {"type":"TOUR","title":"C","address":"D","lat":1,"lng":2,"startTime":"2026-01-10T10:00:00"}]"#;
        let items = parse_suggestions(raw);
        assert_ne!(items[0].id, items[1].id);
        assert!(items[0].id.ends_with("-0"));
        assert!(items[1].id.ends_with("-1"));
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```[1]```"), "[1]");
        assert_eq!(strip_code_fence("[1]"), "[1]");
    }
}
