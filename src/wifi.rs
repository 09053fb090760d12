use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

const PREFIX: &str = "WIFI:";
const TERMINATOR: &str = ";;";

#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    Hash,
    Eq,
    PartialEq,
    strum::Display,
    strum::EnumString,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
pub enum AuthType {
    #[default]
    #[strum(serialize = "WPA")]
    #[serde(rename = "WPA")]
    Wpa,

    #[strum(serialize = "WEP")]
    #[serde(rename = "WEP")]
    Wep,

    #[strum(serialize = "NONE")]
    #[serde(rename = "NONE")]
    Open,
}

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize, uniffi::Record)]
pub struct WifiConfig {
    pub ssid: String,
    pub password: String,
    pub auth_type: AuthType,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WifiParseError {
    #[error("missing WIFI: prefix")]
    MissingPrefix,

    #[error("missing ;; terminator")]
    MissingTerminator,

    #[error("missing network name")]
    MissingSsid,

    #[error("invalid field: {0}")]
    InvalidField(String),

    #[error("unknown authentication type: {0}")]
    InvalidAuthType(String),
}

impl WifiConfig {
    pub fn new(ssid: impl Into<String>, password: impl Into<String>, auth_type: AuthType) -> Self {
        Self { ssid: ssid.into(), password: password.into(), auth_type }
    }

    /// `WIFI:T:<auth>;S:<ssid>;P:<password>;;`, fields are not escaped
    pub fn provisioning_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WifiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}T:{};S:{};P:{}{TERMINATOR}", self.auth_type, self.ssid, self.password)
    }
}

impl FromStr for WifiConfig {
    type Err = WifiParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s.strip_prefix(PREFIX).ok_or(WifiParseError::MissingPrefix)?;
        let fields = fields.strip_suffix(TERMINATOR).ok_or(WifiParseError::MissingTerminator)?;

        let mut ssid = None;
        let mut password = String::new();
        let mut auth_type = AuthType::Open;

        for field in fields.split(';') {
            let Some((key, value)) = field.split_once(':') else {
                return Err(WifiParseError::InvalidField(field.to_string()));
            };

            match key {
                "S" => ssid = Some(value.to_string()),
                "P" => password = value.to_string(),
                "T" => {
                    auth_type = AuthType::from_str(value)
                        .map_err(|_| WifiParseError::InvalidAuthType(value.to_string()))?
                }

                // hidden network flag and other extensions
                _ => {}
            }
        }

        let ssid = ssid.filter(|ssid| !ssid.is_empty()).ok_or(WifiParseError::MissingSsid)?;
        Ok(Self { ssid, password, auth_type })
    }
}
