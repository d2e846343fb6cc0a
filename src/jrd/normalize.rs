//! JRD normalization.
//!
//! Turns a JRD document into a [`WebFingerResult`]: the raw document plus an
//! index of links grouped by relation category and the display name property.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use strum::IntoEnumIterator;

use crate::config::DISPLAY_NAME_PROPERTY;
use crate::error_handling::WebFingerError;
use crate::jrd::types::{IndexProperties, Jrd, JrdIndex, LinkObject, LinkRelation, WebFingerResult};

/// Parses and indexes a JRD document.
///
/// # Errors
///
/// - `invalid json` if the text is not JSON
/// - the document's own `error` member, or `unknown response from server`,
///   when the top level is not an object with a `links` array
///
/// Other members are never a reason to fail: a `properties` member that is
/// not an object is simply not indexed.
pub fn process(jrd_text: &str) -> Result<WebFingerResult, WebFingerError> {
    let value: Value =
        serde_json::from_str(jrd_text).map_err(|_| WebFingerError::protocol("invalid json"))?;

    let has_links = value.get("links").is_some_and(Value::is_array);
    let object = match value {
        Value::Object(object) if has_links => object,
        other => {
            return Err(match other.get("error").and_then(Value::as_str) {
                Some(message) => WebFingerError::protocol(message),
                None => WebFingerError::protocol("unknown response from server"),
            });
        }
    };
    let raw = Jrd::from(object);

    let mut links: BTreeMap<LinkRelation, Vec<LinkObject>> =
        LinkRelation::iter().map(|relation| (relation, Vec::new())).collect();

    for link in raw.links.iter().filter_map(Value::as_object) {
        let rel = link.get("rel").map(coerce).unwrap_or_default();
        let Some(relation) = LinkRelation::from_rel(&rel) else {
            continue;
        };
        links.entry(relation).or_default().push(to_link_object(link));
    }

    let name = raw
        .properties
        .as_ref()
        .and_then(|properties| properties.get(DISPLAY_NAME_PROPERTY))
        .and_then(|value| match value {
            Value::Null => None,
            other => Some(coerce(other)),
        });

    Ok(WebFingerResult {
        index: JrdIndex {
            links,
            properties: IndexProperties { name },
        },
        raw,
    })
}

fn to_link_object(link: &Map<String, Value>) -> LinkObject {
    let mut extra: BTreeMap<String, String> = link
        .iter()
        .map(|(key, value)| (key.clone(), coerce(value)))
        .collect();
    LinkObject {
        href: extra.remove("href").unwrap_or_default(),
        rel: extra.remove("rel").unwrap_or_default(),
        media_type: extra.remove("type"),
        extra,
    }
}

/// String form of a JSON member: strings verbatim, everything else as compact JSON.
fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> String {
        process(text).unwrap_err().to_string()
    }

    #[test]
    fn test_avatar_link_is_indexed() {
        let result = process(
            r#"{"links":[{"rel":"http://webfinger.net/rel/avatar","href":"https://x/a"}]}"#,
        )
        .unwrap();
        let avatars = result.index.links(LinkRelation::Avatar);
        assert_eq!(avatars.len(), 1);
        assert_eq!(avatars[0].href, "https://x/a");
        assert_eq!(avatars[0].rel, "http://webfinger.net/rel/avatar");
        assert!(avatars[0].media_type.is_none());
        assert!(avatars[0].extra.is_empty());
    }

    #[test]
    fn test_index_has_every_category() {
        let result = process(r#"{"links":[]}"#).unwrap();
        assert_eq!(result.index.links.len(), LinkRelation::iter().count());
        assert!(result.index.links.values().all(Vec::is_empty));
        assert_eq!(result.index.properties.name, None);
    }

    #[test]
    fn test_unknown_rels_are_dropped() {
        let result = process(
            r#"{"links":[
                {"rel":"http://example.com/rel/unknown","href":"https://x/u"},
                {"rel":"self","href":"https://x/self"},
                {"href":"https://x/no-rel"},
                "not-an-object"
            ]}"#,
        )
        .unwrap();
        assert!(result.index.links.values().all(Vec::is_empty));
        assert_eq!(result.raw.links.len(), 4);
    }

    #[test]
    fn test_several_rels_share_a_category() {
        let result = process(
            r#"{"links":[
                {"rel":"http://webfinger.net/rel/profile-page","href":"https://x/p"},
                {"rel":"me","href":"https://x/me"},
                {"rel":"blog","href":"https://x/b"},
                {"rel":"http://packetizer.com/rel/blog","href":"https://x/b2"}
            ]}"#,
        )
        .unwrap();
        let profiles: Vec<&str> = result
            .index
            .links(LinkRelation::Profile)
            .iter()
            .map(|l| l.href.as_str())
            .collect();
        assert_eq!(profiles, vec!["https://x/p", "https://x/me"]);
        assert_eq!(result.index.links(LinkRelation::Blog).len(), 2);
    }

    #[test]
    fn test_link_members_are_coerced_to_strings() {
        let result = process(
            r#"{"links":[{
                "rel":"http://webfinger.net/rel/avatar",
                "href":"https://x/a.png",
                "type":"image/png",
                "width":64,
                "titles":{"en":"Avatar"}
            }]}"#,
        )
        .unwrap();
        let link = &result.index.links(LinkRelation::Avatar)[0];
        assert_eq!(link.media_type.as_deref(), Some("image/png"));
        assert_eq!(link.extra["width"], "64");
        assert_eq!(link.extra["titles"], r#"{"en":"Avatar"}"#);
    }

    #[test]
    fn test_missing_href_becomes_empty_string() {
        let result = process(r#"{"links":[{"rel":"vcard"}]}"#).unwrap();
        assert_eq!(result.index.links(LinkRelation::Vcard)[0].href, "");
    }

    #[test]
    fn test_display_name_property() {
        let result = process(
            r#"{"links":[],"properties":{
                "http://packetizer.com/ns/name":"Nick Jennings",
                "http://example.com/ns/other":"ignored"
            }}"#,
        )
        .unwrap();
        assert_eq!(result.index.properties.name.as_deref(), Some("Nick Jennings"));
        let raw_properties = result.raw.properties.unwrap();
        assert_eq!(raw_properties.len(), 2);
    }

    #[test]
    fn test_null_display_name() {
        let result =
            process(r#"{"links":[],"properties":{"http://packetizer.com/ns/name":null}}"#).unwrap();
        assert_eq!(result.index.properties.name, None);
    }

    #[test]
    fn test_raw_document_is_retained() {
        let result = process(
            r#"{"subject":"acct:nick@example.com","aliases":["https://example.com/nick"],"links":[]}"#,
        )
        .unwrap();
        assert_eq!(result.raw.subject.as_deref(), Some("acct:nick@example.com"));
        assert!(result.raw.extra.contains_key("aliases"));
    }

    #[test]
    fn test_error_member_is_surfaced() {
        assert_eq!(message(r#"{"error":"user not found"}"#), "user not found");
    }

    #[test]
    fn test_unknown_response_shapes() {
        assert_eq!(message(r#"{"subject":"acct:x@y"}"#), "unknown response from server");
        assert_eq!(message(r#"{"links":{}}"#), "unknown response from server");
        assert_eq!(message(r#"[1,2,3]"#), "unknown response from server");
        assert_eq!(message(r#""links""#), "unknown response from server");
    }

    #[test]
    fn test_mistyped_top_level_members_are_tolerated() {
        let result = process(r#"{"links":[],"subject":42}"#).unwrap();
        assert_eq!(result.raw.subject, None);
        assert_eq!(result.raw.extra["subject"], 42);

        let result =
            process(r#"{"subject":42,"links":[{"rel":"blog","href":"https://x/b"}]}"#).unwrap();
        let blogs = result.index.links(LinkRelation::Blog);
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0].href, "https://x/b");

        let result = process(
            r#"{"links":[{"rel":"blog","href":"https://x/b"}],"properties":[],"error":false}"#,
        )
        .unwrap();
        assert_eq!(result.index.properties.name, None);
        assert_eq!(result.index.links(LinkRelation::Blog).len(), 1);
        assert!(result.raw.properties.is_none());
    }

    #[test]
    fn test_invalid_json() {
        assert_eq!(message("{not json"), "invalid json");
    }
}
