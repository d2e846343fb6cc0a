//! JRD and lookup result types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// JSON Resource Descriptor (RFC 7033 §4.4), as received from the server.
///
/// Unknown members are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jrd {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default)]
    pub links: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for Jrd {
    /// Splits a JSON object into the typed members and `extra`.
    ///
    /// A member whose value does not have the expected JSON type is kept
    /// verbatim in `extra` instead of being dropped.
    fn from(mut object: Map<String, Value>) -> Self {
        let mut jrd = Jrd {
            subject: None,
            links: Vec::new(),
            properties: None,
            error: None,
            extra: Map::new(),
        };
        match object.remove("subject") {
            Some(Value::String(subject)) => jrd.subject = Some(subject),
            Some(Value::Null) | None => {}
            Some(other) => {
                jrd.extra.insert("subject".to_string(), other);
            }
        }
        match object.remove("links") {
            Some(Value::Array(links)) => jrd.links = links,
            Some(Value::Null) | None => {}
            Some(other) => {
                jrd.extra.insert("links".to_string(), other);
            }
        }
        match object.remove("properties") {
            Some(Value::Object(properties)) => jrd.properties = Some(properties),
            Some(Value::Null) | None => {}
            Some(other) => {
                jrd.extra.insert("properties".to_string(), other);
            }
        }
        match object.remove("error") {
            Some(Value::String(error)) => jrd.error = Some(error),
            Some(Value::Null) | None => {}
            Some(other) => {
                jrd.extra.insert("error".to_string(), other);
            }
        }
        jrd.extra.extend(object);
        jrd
    }
}

/// Canonical bucket that raw `rel` URIs are grouped under.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
    Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LinkRelation {
    Avatar,
    Profile,
    Blog,
    Vcard,
    Updates,
    Share,
    Remotestorage,
    /// Deprecated WebFist legacy relay link
    #[strum(to_string = "webfist", serialize = "legacy-relay")]
    Webfist,
    Camlistore,
}

/// Raw `rel` value to relation category.
pub const RELATION_MAP: &[(&str, LinkRelation)] = &[
    ("http://webfist.org/spec/rel", LinkRelation::Webfist),
    ("http://webfinger.net/rel/avatar", LinkRelation::Avatar),
    ("remotestorage", LinkRelation::Remotestorage),
    (
        "http://tools.ietf.org/id/draft-dejong-remotestorage",
        LinkRelation::Remotestorage,
    ),
    ("remoteStorage", LinkRelation::Remotestorage),
    ("http://www.packetizer.com/rel/share", LinkRelation::Share),
    ("http://webfinger.net/rel/profile-page", LinkRelation::Profile),
    ("me", LinkRelation::Profile),
    ("vcard", LinkRelation::Vcard),
    ("blog", LinkRelation::Blog),
    ("http://packetizer.com/rel/blog", LinkRelation::Blog),
    (
        "http://schemas.google.com/g/2010#updates-from",
        LinkRelation::Updates,
    ),
    ("https://camlistore.org/rel/server", LinkRelation::Camlistore),
];

impl LinkRelation {
    /// Maps a raw `rel` value to its category, if it is a known one.
    pub fn from_rel(rel: &str) -> Option<LinkRelation> {
        RELATION_MAP
            .iter()
            .find(|(raw, _)| *raw == rel)
            .map(|(_, relation)| *relation)
    }
}

/// Copy of a JRD link entry with every member coerced to a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkObject {
    pub href: String,
    pub rel: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Remaining members (`titles`, `properties`, extensions, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Properties extracted into the index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct IndexProperties {
    /// Display name (`http://packetizer.com/ns/name`)
    pub name: Option<String>,
}

/// Links grouped by relation category plus selected properties.
///
/// `links` always holds one entry per [`LinkRelation`], possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JrdIndex {
    pub links: BTreeMap<LinkRelation, Vec<LinkObject>>,
    pub properties: IndexProperties,
}

impl JrdIndex {
    /// Links of one category, in document order.
    pub fn links(&self, relation: LinkRelation) -> &[LinkObject] {
        self.links
            .get(&relation)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebFingerResult {
    pub raw: Jrd,
    pub index: JrdIndex,
}
