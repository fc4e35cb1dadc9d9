//! cli::resolve
//!
//! Turns a bound `--host` into a server profile and an HTTP client.
//!
//! # Lookup
//!
//! - an `http://` or `https://` value is used as-is, with no server type
//! - otherwise it is an alias in the profile store
//! - an alias whose `server_host` is another alias is followed one level,
//!   and the referring profile's own settings win over the target's
//!
//! # Headers
//!
//! | Setting | Keyrock | NGSI-LD broker | Others |
//! |---------|---------|----------------|--------|
//! | token | `X-Auth-Token`, `X-Subject-token` | `Authorization: Bearer` | `Authorization: Bearer` |
//! | tenant | `Fiware-Service` | `NGSILD-Tenant` | `Fiware-Service` |
//! | scope | `Fiware-ServicePath` | not sent | `Fiware-ServicePath` |

use std::sync::Arc;

use tracing::info;

use super::context::Context;
use super::flag::FlagSpec;
use crate::core::config::schema::is_url;
use crate::core::config::{Config, ServerEntry};
use crate::core::errors::{ErrorKind, NgsiError};
use crate::http::{Client, HttpTransport};

/// A server profile after alias resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerProfile {
    /// `None` for a raw URL.
    pub alias: Option<String>,
    pub base_url: String,
    pub server_type: Option<String>,
    pub ngsi_type: Option<String>,
    pub tenant: Option<String>,
    pub scope: Option<String>,
    pub token: Option<String>,
}

impl ServerProfile {
    fn from_entry(alias: &str, entry: &ServerEntry) -> Self {
        Self {
            alias: Some(alias.to_string()),
            base_url: entry.server_host.clone(),
            server_type: entry.server_type.clone(),
            ngsi_type: entry.ngsi_type.clone(),
            tenant: entry.tenant.clone(),
            scope: entry.scope.clone(),
            token: entry.token.clone(),
        }
    }

    /// Kind matched against a command's server kinds: the server type, with
    /// the NGSI flavour appended for brokers (`brokerv2`, `brokerld`).
    pub fn kind(&self) -> Option<String> {
        let server_type = self.server_type.as_deref()?;
        if server_type == "broker" {
            let flavour = self.ngsi_type.as_deref().unwrap_or("v2");
            return Some(format!("broker{}", flavour));
        }
        Some(server_type.to_string())
    }

    pub fn is_ngsi_ld(&self) -> bool {
        self.kind().as_deref() == Some("brokerld")
    }

    pub fn is_keyrock(&self) -> bool {
        self.server_type.as_deref() == Some("keyrock")
    }
}

/// Resolve `host` against the profile store.
pub fn lookup_profile(config: &Config, host: &str) -> Result<ServerProfile, NgsiError> {
    const FUNC: &str = "lookup_profile";

    if host.is_empty() {
        return Err(NgsiError::new(
            FUNC,
            1,
            "host not found",
            ErrorKind::UnknownHost,
        ));
    }
    if is_url(host) {
        return Ok(ServerProfile {
            base_url: host.to_string(),
            ..Default::default()
        });
    }

    let Some(entry) = config.server(host) else {
        return Err(NgsiError::new(
            FUNC,
            2,
            format!("error host: {}", host),
            ErrorKind::UnknownHost,
        ));
    };
    if entry.has_url() {
        return Ok(ServerProfile::from_entry(host, entry));
    }

    let target_alias = entry.server_host.as_str();
    let Some(target) = config.server(target_alias) else {
        return Err(NgsiError::new(
            FUNC,
            3,
            format!("error host: {} (referenced by {})", target_alias, host),
            ErrorKind::UnknownHost,
        ));
    };
    if !target.has_url() {
        return Err(NgsiError::new(
            FUNC,
            4,
            format!("url error: {}", target.server_host),
            ErrorKind::UnknownHost,
        ));
    }

    let mut profile = ServerProfile::from_entry(target_alias, target);
    profile.alias = Some(host.to_string());
    if entry.server_type.is_some() {
        profile.server_type = entry.server_type.clone();
    }
    if entry.ngsi_type.is_some() {
        profile.ngsi_type = entry.ngsi_type.clone();
    }
    if entry.tenant.is_some() {
        profile.tenant = entry.tenant.clone();
    }
    if entry.scope.is_some() {
        profile.scope = entry.scope.clone();
    }
    if entry.token.is_some() {
        profile.token = entry.token.clone();
    }
    Ok(profile)
}

/// The visible flag that triggers client construction.
pub fn host_flag(c: &Context<'_>) -> Option<&'static FlagSpec> {
    c.table()
        .iter()
        .map(|(_, spec)| spec)
        .find(|spec| spec.init_client)
}

/// Build the client for an invocation, if its `--host` asks for one.
///
/// Explicit `--oAuthToken`, `--service` and `--path` win over the profile.
pub fn resolve_client(
    c: &Context<'_>,
    config: &Config,
    transport: Arc<dyn HttpTransport>,
) -> Result<Option<Client>, NgsiError> {
    const FUNC: &str = "resolve_client";

    let Some(host) = host_flag(c).filter(|spec| c.is_set(spec.name)) else {
        return Ok(None);
    };
    let mut profile = lookup_profile(config, &c.string(host.name))
        .map_err(|e| NgsiError::wrap(FUNC, 1, e))?;

    if let Some(token) = c.string_if_set("oAuthToken") {
        profile.token = Some(token);
    }
    if let Some(tenant) = c.string_if_set("service") {
        profile.tenant = Some(tenant);
    }
    if let Some(scope) = c.string_if_set("path") {
        profile.scope = Some(scope);
    }

    info!("host: {}", profile.base_url);
    Ok(Some(build_client(&profile, transport)))
}

/// A client for `profile` with its default headers.
pub fn build_client(profile: &ServerProfile, transport: Arc<dyn HttpTransport>) -> Client {
    let mut client =
        Client::new(&profile.base_url, transport).with_server_type(profile.server_type.clone());

    if let Some(token) = profile.token.as_deref().filter(|t| !t.is_empty()) {
        if profile.is_keyrock() {
            client = client
                .with_header("X-Auth-Token", token)
                .with_header("X-Subject-token", token);
        } else {
            client = client.with_header("Authorization", &format!("Bearer {}", token));
        }
    }

    if let Some(tenant) = profile.tenant.as_deref().filter(|t| !t.is_empty()) {
        let name = if profile.is_ngsi_ld() {
            "NGSILD-Tenant"
        } else {
            "Fiware-Service"
        };
        client = client.with_header(name, tenant);
    }

    if let Some(scope) = profile.scope.as_deref().filter(|s| !s.is_empty()) {
        if !profile.is_ngsi_ld() {
            client = client.with_header("Fiware-ServicePath", scope);
        }
    }

    client
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::command::{Action, App, Command};
    use crate::cli::parse::{parse, ParseOutcome};
    use crate::cli::registry::Registry;
    use crate::http::MockTransport;
    use crate::ngsi::Ngsi;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl Action for Noop {
        async fn run(
            &self,
            _c: &Context<'_>,
            _ngsi: &mut Ngsi,
            _client: Option<&Client>,
        ) -> Result<(), NgsiError> {
            Ok(())
        }
    }

    static HOST: FlagSpec = FlagSpec::string("host").aliases(&["h"]).init_client();
    static TOKEN: FlagSpec = FlagSpec::string("oAuthToken").allow_empty();
    static TENANT: FlagSpec = FlagSpec::string("service").aliases(&["s"]).allow_empty();
    static SCOPE: FlagSpec = FlagSpec::string("path").aliases(&["p"]).allow_empty();
    static PLAIN_HOST: FlagSpec = FlagSpec::string("host");

    const PROFILES: &str = r#"
        [servers.keyrock]
        server_type = "keyrock"
        server_host = "http://localhost:3000"
        token = "kr-token"

        [servers.orion]
        server_type = "broker"
        server_host = "http://localhost:1026"
        tenant = "openiot"
        scope = "/"
        token = "orion-token"

        [servers.orion-ld]
        server_type = "broker"
        server_host = "http://localhost:1026"
        ngsi_type = "ld"
        tenant = "openiot"
        scope = "/"

        [servers.orion-alias]
        server_host = "orion"
        tenant = "smartcity"

        [servers.dangling]
        server_host = "nowhere"

        [servers.loop]
        server_host = "dangling"
    "#;

    fn config() -> Config {
        Config::from_toml_str(PROFILES).unwrap()
    }

    fn resolve(argv: &[&str]) -> Result<Option<Client>, NgsiError> {
        let app = App::new("ngsi", "test", "0.0.0")
            .command(
                Command::new("get", "get")
                    .flags(vec![&HOST, &TOKEN, &TENANT, &SCOPE])
                    .action(Noop),
            )
            .command(Command::new("show", "show").flags(vec![&PLAIN_HOST]).action(Noop));
        let registry = Registry::new(&app).unwrap();
        let args: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
        let ParseOutcome::Run(inv) = parse(&registry, &args).unwrap() else {
            panic!("expected a runnable invocation");
        };
        let c = Context::new(&registry, inv);
        resolve_client(&c, &config(), Arc::new(MockTransport::new()))
    }

    #[test]
    fn kinds() {
        let config = config();
        assert_eq!(
            lookup_profile(&config, "orion").unwrap().kind().as_deref(),
            Some("brokerv2")
        );
        assert_eq!(
            lookup_profile(&config, "orion-ld").unwrap().kind().as_deref(),
            Some("brokerld")
        );
        assert_eq!(
            lookup_profile(&config, "keyrock").unwrap().kind().as_deref(),
            Some("keyrock")
        );
        assert_eq!(lookup_profile(&config, "http://x").unwrap().kind(), None);
    }

    #[test]
    fn alias_reference_followed_one_level() {
        let profile = lookup_profile(&config(), "orion-alias").unwrap();
        assert_eq!(profile.base_url, "http://localhost:1026");
        assert_eq!(profile.alias.as_deref(), Some("orion-alias"));
        assert_eq!(profile.server_type.as_deref(), Some("broker"));
        assert_eq!(profile.tenant.as_deref(), Some("smartcity"));
        assert_eq!(profile.scope.as_deref(), Some("/"));
    }

    #[test]
    fn unresolvable_hosts() {
        let config = config();
        for host in ["nosuch", "dangling", "loop", ""] {
            let err = lookup_profile(&config, host).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnknownHost, "host {:?}", host);
        }
        assert_eq!(
            lookup_profile(&config, "nosuch").unwrap_err().message(),
            "error host: nosuch"
        );
    }

    #[test]
    fn keyrock_token_headers() {
        let client = resolve(&["get", "--host", "keyrock"]).unwrap().unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.header("X-Auth-Token"), Some("kr-token"));
        assert_eq!(client.header("X-Subject-token"), Some("kr-token"));
        assert_eq!(client.header("Authorization"), None);
    }

    #[test]
    fn broker_headers_and_flag_overrides() {
        let client = resolve(&["get", "-h", "orion"]).unwrap().unwrap();
        assert_eq!(client.header("Authorization"), Some("Bearer orion-token"));
        assert_eq!(client.header("Fiware-Service"), Some("openiot"));
        assert_eq!(client.header("Fiware-ServicePath"), Some("/"));

        let client = resolve(&["get", "-h", "orion", "-s", "other", "-p", "/a", "--oAuthToken", "t"])
            .unwrap()
            .unwrap();
        assert_eq!(client.header("Authorization"), Some("Bearer t"));
        assert_eq!(client.header("Fiware-Service"), Some("other"));
        assert_eq!(client.header("Fiware-ServicePath"), Some("/a"));
    }

    #[test]
    fn explicit_empty_flags_clear_profile_values() {
        let client = resolve(&["get", "-h", "orion", "-s", "", "--oAuthToken", ""])
            .unwrap()
            .unwrap();
        assert_eq!(client.header("Fiware-Service"), None);
        assert_eq!(client.header("Authorization"), None);
    }

    #[test]
    fn ngsi_ld_tenant_header() {
        let client = resolve(&["get", "-h", "orion-ld"]).unwrap().unwrap();
        assert_eq!(client.header("NGSILD-Tenant"), Some("openiot"));
        assert_eq!(client.header("Fiware-Service"), None);
        assert_eq!(client.header("Fiware-ServicePath"), None);
    }

    #[test]
    fn raw_url_host() {
        let client = resolve(&["get", "-h", "https://example.com/keyrock/"])
            .unwrap()
            .unwrap();
        assert_eq!(client.base_url(), "https://example.com/keyrock");
        assert_eq!(client.server_type(), None);
        assert!(client.headers().is_empty());
    }

    #[test]
    fn no_client_without_init_client_flag() {
        assert!(resolve(&["show", "--host", "keyrock"]).unwrap().is_none());
        assert!(resolve(&["get"]).unwrap().is_none());
    }

    #[test]
    fn unknown_alias_is_wrapped() {
        let err = resolve(&["get", "-h", "nosuch"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownHost);
        assert_eq!(err.function(), "resolve_client");
        assert_eq!(err.root().function(), "lookup_profile");
    }
}
