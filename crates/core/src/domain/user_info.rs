use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const FALLBACK_GREETING_NAME: &str = "friend";

const PROJECT_TYPE_KEY: &str = "projectType";
const NAME_KEY: &str = "name";
const EMAIL_KEY: &str = "email";
const REASON_KEY: &str = "reason";

/// Lead details collected by the guided dialogue.
///
/// Values are never mutated in place: each capture step produces a new record
/// that copies every prior field and overlays the one it collected. Keys the
/// dialogue does not know about are carried in `extra` so they survive a round
/// trip through the caller.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl UserInfo {
    pub fn with_project_type(&self, project_type: impl Into<String>) -> Self {
        let mut next = self.without_extra(PROJECT_TYPE_KEY);
        next.project_type = Some(project_type.into());
        next
    }

    pub fn with_name(&self, name: impl Into<String>) -> Self {
        let mut next = self.without_extra(NAME_KEY);
        next.name = Some(name.into());
        next
    }

    pub fn with_email(&self, email: impl Into<String>) -> Self {
        let mut next = self.without_extra(EMAIL_KEY);
        next.email = Some(email.into());
        next
    }

    pub fn with_reason(&self, reason: impl Into<String>) -> Self {
        let mut next = self.without_extra(REASON_KEY);
        next.reason = Some(reason.into());
        next
    }

    /// Shallow overlay: every field present in `update` replaces the one here.
    pub fn overlay(&self, update: &UserInfo) -> Self {
        let mut next = self.clone();
        for (key, value) in &update.extra {
            if let Some(slot) = next.known_field_mut(key) {
                *slot = None;
            }
            next.extra.insert(key.clone(), value.clone());
        }
        if let Some(project_type) = &update.project_type {
            next = next.with_project_type(project_type.clone());
        }
        if let Some(name) = &update.name {
            next = next.with_name(name.clone());
        }
        if let Some(email) = &update.email {
            next = next.with_email(email.clone());
        }
        if let Some(reason) = &update.reason {
            next = next.with_reason(reason.clone());
        }
        next
    }

    pub fn greeting_name(&self) -> &str {
        self.name.as_deref().unwrap_or(FALLBACK_GREETING_NAME)
    }

    pub fn is_empty(&self) -> bool {
        self.project_type.is_none()
            && self.name.is_none()
            && self.email.is_none()
            && self.reason.is_none()
            && self.extra.is_empty()
    }

    /// Builds a record from an arbitrary JSON value. Anything that is not an
    /// object yields an empty record; `null` fields count as absent and
    /// non-string values for known keys are kept verbatim in `extra`.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Self::default(),
        }
    }

    fn from_map(map: Map<String, Value>) -> Self {
        let mut info = Self::default();
        for (key, value) in map {
            if value.is_null() {
                continue;
            }
            if let Value::String(text) = &value {
                if let Some(slot) = info.known_field_mut(&key) {
                    *slot = Some(text.clone());
                    continue;
                }
            }
            info.extra.insert(key, value);
        }
        info
    }

    fn known_field_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            PROJECT_TYPE_KEY => Some(&mut self.project_type),
            NAME_KEY => Some(&mut self.name),
            EMAIL_KEY => Some(&mut self.email),
            REASON_KEY => Some(&mut self.reason),
            _ => None,
        }
    }

    fn without_extra(&self, key: &str) -> Self {
        let mut next = self.clone();
        next.extra.remove(key);
        next
    }
}

impl<'de> Deserialize<'de> for UserInfo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_json)
    }
}
