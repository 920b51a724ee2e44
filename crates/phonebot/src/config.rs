//! Process configuration
//!
//! Everything is read from the environment (after `.env` has been loaded by
//! the binary). Missing or unparsable values fall back to defaults; loading
//! never fails. The `ANDROID_*` and `AUTHORIZED_DISCORD_IDS` names from older
//! deployments are accepted as aliases.

use device_client::{Credentials, DeviceClient, LOCAL_TIMEOUT, PUBLIC_TIMEOUT};

use crate::{auth::Authorizer, brain::{DEFAULT_LLAMA_URL, LlamaClient}};

pub const DEFAULT_DEVICE_URL: &str = "http://localhost:8081";
pub const DEFAULT_DEVICE_USER: &str = "assistant";
pub const DEFAULT_DEVICE_PASS: &str = "password";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct PhonebotConfig {
    pub authorized_ids: String,
    pub llama_url: String,
    /// LAN address of the device endpoint, tried first when set
    pub device_local_url: Option<String>,
    /// Public (relay) address of the device endpoint
    pub device_url: String,
    pub device_credentials: Credentials,
    /// Answer commands locally instead of contacting the device
    pub device_simulate: bool,
    pub host: String,
    pub port: u16,
}

impl PhonebotConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| lookup(*key))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        let device_credentials = Credentials::new(
            get(&["DEVICE_AUTH_USER", "ANDROID_AUTH_USER"])
                .unwrap_or_else(|| DEFAULT_DEVICE_USER.to_string()),
            get(&["DEVICE_AUTH_PASS", "ANDROID_AUTH_PASS"])
                .unwrap_or_else(|| DEFAULT_DEVICE_PASS.to_string()),
        );

        let port = match get(&["PORT"]) {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid PORT {:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            authorized_ids: get(&["AUTHORIZED_IDS", "AUTHORIZED_DISCORD_IDS"]).unwrap_or_default(),
            llama_url: get(&["LLAMA_URL"]).unwrap_or_else(|| DEFAULT_LLAMA_URL.to_string()),
            device_local_url: get(&["DEVICE_LOCAL_URL", "ANDROID_LOCAL_URL"]),
            device_url: get(&["DEVICE_URL", "ANDROID_URL"])
                .unwrap_or_else(|| DEFAULT_DEVICE_URL.to_string()),
            device_credentials,
            device_simulate: get(&["DEVICE_SIMULATE"]).is_some_and(|v| parse_flag(&v)),
            host: get(&["HOST"]).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn authorizer(&self) -> Authorizer {
        Authorizer::from_list(&self.authorized_ids)
    }

    pub fn llama_client(&self) -> LlamaClient {
        LlamaClient::new(&self.llama_url)
    }

    /// Device client trying the LAN address (if any) before the public one
    pub fn device_client(&self) -> DeviceClient {
        let mut client = DeviceClient::new()
            .with_credentials(self.device_credentials.clone())
            .simulate(self.device_simulate);
        if let Some(local) = &self.device_local_url {
            client = client.with_candidate("local", local, LOCAL_TIMEOUT);
        }
        client.with_candidate("public", &self.device_url, PUBLIC_TIMEOUT)
    }
}

impl Default for PhonebotConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
