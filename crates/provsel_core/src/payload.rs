use plist::{Date, Dictionary, Value};
use serde::Deserialize;

/// Entitlement key listing the extension points a profile may implement.
pub const EXTENSION_POINTS_KEY: &str =
    "com.apple.developer.extensionkit.extension-point-identifiers";

/// The payload embedded in a signed provisioning profile, as produced by
/// `security cms -D`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfilePayload {
    pub name: Option<String>,
    #[serde(rename = "UUID")]
    pub uuid: Option<String>,
    #[serde(default)]
    pub team_identifier: Vec<String>,
    #[serde(default)]
    pub application_identifier_prefix: Vec<String>,
    pub expiration_date: Option<Date>,
    pub provisions_all_devices: Option<bool>,
    pub provisioned_devices: Option<Vec<String>>,
    pub entitlements: Option<Dictionary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Development,
    Enterprise,
    AdHoc,
    AppStore,
}

impl ProfileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Enterprise => "Enterprise",
            Self::AdHoc => "AdHoc",
            Self::AppStore => "AppStore",
        }
    }
}

impl ProfilePayload {
    pub fn entitlement(&self, key: &str) -> Option<&Value> {
        self.entitlements.as_ref()?.get(key)
    }

    // Profiles in the wild carry booleans both as <true/> and as "true".
    fn entitlement_bool(&self, key: &str) -> bool {
        match self.entitlement(key) {
            Some(Value::Boolean(v)) => *v,
            Some(Value::String(v)) => v == "true",
            _ => false,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn uuid(&self) -> &str {
        self.uuid.as_deref().unwrap_or("")
    }

    /// Signing team: first `TeamIdentifier` entry, falling back to the first
    /// `ApplicationIdentifierPrefix` entry when the list is absent or its
    /// first entry is empty.
    pub fn team(&self) -> &str {
        match self.team_identifier.first().map(String::as_str) {
            Some(team) if !team.is_empty() => team,
            _ => self
                .application_identifier_prefix
                .first()
                .map(String::as_str)
                .unwrap_or(""),
        }
    }

    pub fn application_identifier(&self) -> &str {
        self.entitlement("application-identifier")
            .and_then(Value::as_string)
            .unwrap_or("")
    }

    /// Bundle identifier: the application identifier with its team prefix
    /// (everything up to and including the first `.`) removed. Empty when the
    /// identifier has no `.` at all.
    pub fn bundle_id(&self) -> &str {
        self.application_identifier()
            .split_once('.')
            .map(|(_, rest)| rest)
            .unwrap_or("")
    }

    pub fn extension_points(&self) -> Vec<&str> {
        self.entitlement(EXTENSION_POINTS_KEY)
            .and_then(Value::as_array)
            .map(|points| points.iter().filter_map(Value::as_string).collect())
            .unwrap_or_default()
    }

    pub fn has_extension_point(&self, id: &str) -> bool {
        self.extension_points().contains(&id)
    }

    pub fn kind(&self) -> ProfileKind {
        if self.entitlement_bool("get-task-allow") {
            ProfileKind::Development
        } else if self.provisions_all_devices == Some(true) {
            ProfileKind::Enterprise
        } else if self.provisioned_devices.is_some() {
            ProfileKind::AdHoc
        } else {
            ProfileKind::AppStore
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_with_entitlements(entries: &[(&str, Value)]) -> ProfilePayload {
        let mut dict = Dictionary::new();
        for (key, value) in entries {
            dict.insert((*key).to_string(), value.clone());
        }
        ProfilePayload {
            entitlements: Some(dict),
            ..ProfilePayload::default()
        }
    }

    #[test]
    fn team_prefers_team_identifier() {
        let payload = ProfilePayload {
            team_identifier: vec!["TEAM123456".to_string()],
            application_identifier_prefix: vec!["PREFIX7890".to_string()],
            ..ProfilePayload::default()
        };
        assert_eq!(payload.team(), "TEAM123456");
    }

    #[test]
    fn team_falls_back_to_prefix_when_list_absent() {
        let payload = ProfilePayload {
            application_identifier_prefix: vec!["PREFIX7890".to_string()],
            ..ProfilePayload::default()
        };
        assert_eq!(payload.team(), "PREFIX7890");
    }

    #[test]
    fn team_falls_back_to_prefix_when_first_entry_empty() {
        let payload = ProfilePayload {
            team_identifier: vec![String::new()],
            application_identifier_prefix: vec!["PREFIX7890".to_string()],
            ..ProfilePayload::default()
        };
        assert_eq!(payload.team(), "PREFIX7890");
    }

    #[test]
    fn team_empty_when_both_missing() {
        assert_eq!(ProfilePayload::default().team(), "");
    }

    #[test]
    fn bundle_id_strips_team_prefix() {
        let payload = payload_with_entitlements(&[(
            "application-identifier",
            Value::String("ABCDE12345.com.example.myapp".to_string()),
        )]);
        assert_eq!(payload.bundle_id(), "com.example.myapp");
    }

    #[test]
    fn bundle_id_empty_without_delimiter() {
        let payload = payload_with_entitlements(&[(
            "application-identifier",
            Value::String("ABCDE12345".to_string()),
        )]);
        assert_eq!(payload.bundle_id(), "");
    }

    #[test]
    fn bundle_id_empty_without_entitlements() {
        assert_eq!(ProfilePayload::default().bundle_id(), "");
    }

    #[test]
    fn extension_points_read_from_entitlements() {
        let payload = payload_with_entitlements(&[(
            EXTENSION_POINTS_KEY,
            Value::Array(vec![
                Value::String("com.apple.Safari.web-extension".to_string()),
                Value::String("com.apple.Safari.content-blocker".to_string()),
            ]),
        )]);
        assert!(payload.has_extension_point("com.apple.Safari.web-extension"));
        assert!(!payload.has_extension_point("com.apple.widgetkit-extension"));
    }

    #[test]
    fn extension_points_empty_when_key_missing() {
        assert!(ProfilePayload::default().extension_points().is_empty());
    }

    #[test]
    fn kind_development_when_get_task_allow() {
        let payload = payload_with_entitlements(&[("get-task-allow", Value::Boolean(true))]);
        assert_eq!(payload.kind(), ProfileKind::Development);
    }

    #[test]
    fn kind_development_when_get_task_allow_is_string() {
        let payload =
            payload_with_entitlements(&[("get-task-allow", Value::String("true".to_string()))]);
        assert_eq!(payload.kind(), ProfileKind::Development);
    }

    #[test]
    fn kind_enterprise_when_provisions_all_devices() {
        let payload = ProfilePayload {
            provisions_all_devices: Some(true),
            ..ProfilePayload::default()
        };
        assert_eq!(payload.kind(), ProfileKind::Enterprise);
    }

    #[test]
    fn kind_adhoc_when_device_list_present() {
        let payload = ProfilePayload {
            provisioned_devices: Some(vec!["00008110-000A1B2C3D4E5F60".to_string()]),
            ..ProfilePayload::default()
        };
        assert_eq!(payload.kind(), ProfileKind::AdHoc);
    }

    #[test]
    fn kind_appstore_otherwise() {
        assert_eq!(ProfilePayload::default().kind(), ProfileKind::AppStore);
    }
}
