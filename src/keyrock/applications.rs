//! keyrock::applications
//!
//! Handlers for `applications list|get|create|update|delete`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::cli::command::Action;
use crate::cli::context::Context;
use crate::core::errors::{ErrorKind, NgsiError};
use crate::http::{Client, HttpResponse};
use crate::ngsi::Ngsi;
use crate::ui::output::{print_body, print_line, OutputMode};

const APPLICATIONS_PATH: &str = "/v1/applications";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApplicationItems {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub redirect_uri: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub redirect_sign_out_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_type: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_types: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_type: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Application {
    pub application: ApplicationItems,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Applications {
    #[serde(default)]
    applications: Vec<ApplicationItems>,
}

fn require_client<'c>(
    function: &'static str,
    errno: u32,
    client: Option<&'c Client>,
) -> Result<&'c Client, NgsiError> {
    client.ok_or_else(|| NgsiError::action(function, errno, "client not initialized"))
}

fn status_error(function: &'static str, errno: u32, res: &HttpResponse) -> NgsiError {
    NgsiError::action(
        function,
        errno,
        format!("error {} {}", res.status_line(), res.body_text()),
    )
}

fn app_path(c: &Context<'_>) -> String {
    format!("{}/{}", APPLICATIONS_PATH, c.string("aid"))
}

fn split_list(s: &str) -> Option<serde_json::Value> {
    if s.is_empty() {
        return None;
    }
    Some(serde_json::Value::Array(
        s.split(',')
            .map(|item| serde_json::Value::String(item.to_string()))
            .collect(),
    ))
}

/// Request body for create and update: `--data` as given, or an
/// application object built from the individual flags.
pub fn make_app_body(c: &Context<'_>, ngsi: &mut Ngsi) -> Result<Vec<u8>, NgsiError> {
    const FUNC: &str = "make_app_body";

    if c.is_set("data") {
        return ngsi
            .read_all(&c.string("data"))
            .map_err(|e| NgsiError::wrap(FUNC, 1, e));
    }

    let app = Application {
        application: ApplicationItems {
            name: c.string("name"),
            description: c.string("description"),
            url: c.string("url"),
            redirect_uri: c.string("redirectUri"),
            redirect_sign_out_uri: c.string("redirectSignOutUri"),
            grant_type: split_list(&c.string("grantType")),
            token_types: split_list(&c.string("tokenTypes")),
            response_type: split_list(&c.string("responseType")),
            client_type: split_list(&c.string("clientType")),
            ..Default::default()
        },
    };

    serde_json::to_vec(&app).map_err(|e| NgsiError::from_source(FUNC, 2, ErrorKind::Action, e))
}

/// `applications list`
pub struct ApplicationsList;

#[async_trait]
impl Action for ApplicationsList {
    async fn run(
        &self,
        c: &Context<'_>,
        ngsi: &mut Ngsi,
        client: Option<&Client>,
    ) -> Result<(), NgsiError> {
        const FUNC: &str = "applications_list";

        let client = require_client(FUNC, 1, client)?;
        let res = client
            .get(APPLICATIONS_PATH)
            .await
            .map_err(|e| NgsiError::wrap(FUNC, 2, e))?;
        if res.status != 200 {
            return Err(status_error(FUNC, 3, &res));
        }

        match OutputMode::from_context(c) {
            OutputMode::Summary => {
                let apps: Applications = serde_json::from_slice(&res.body)
                    .map_err(|e| NgsiError::from_source(FUNC, 4, ErrorKind::Action, e))?;
                for app in &apps.applications {
                    print_line(ngsi.stdout(), &app.id).map_err(|e| NgsiError::wrap(FUNC, 5, e))?;
                }
            }
            mode => {
                print_body(ngsi.stdout(), &res.body, mode).map_err(|e| NgsiError::wrap(FUNC, 6, e))?
            }
        }
        Ok(())
    }
}

/// `applications get`
pub struct ApplicationsGet;

#[async_trait]
impl Action for ApplicationsGet {
    async fn run(
        &self,
        c: &Context<'_>,
        ngsi: &mut Ngsi,
        client: Option<&Client>,
    ) -> Result<(), NgsiError> {
        const FUNC: &str = "applications_get";

        let client = require_client(FUNC, 1, client)?;
        let res = client
            .get(&app_path(c))
            .await
            .map_err(|e| NgsiError::wrap(FUNC, 2, e))?;
        if res.status != 200 {
            return Err(status_error(FUNC, 3, &res));
        }

        print_body(ngsi.stdout(), &res.body, OutputMode::from_context(c))
            .map_err(|e| NgsiError::wrap(FUNC, 4, e))
    }
}

/// `applications create`
pub struct ApplicationsCreate;

#[async_trait]
impl Action for ApplicationsCreate {
    async fn run(
        &self,
        c: &Context<'_>,
        ngsi: &mut Ngsi,
        client: Option<&Client>,
    ) -> Result<(), NgsiError> {
        const FUNC: &str = "applications_create";

        let body = make_app_body(c, ngsi).map_err(|e| NgsiError::wrap(FUNC, 1, e))?;
        let client = require_client(FUNC, 2, client)?;
        let res = client
            .post(APPLICATIONS_PATH, body)
            .await
            .map_err(|e| NgsiError::wrap(FUNC, 3, e))?;
        if res.status != 201 {
            return Err(status_error(FUNC, 4, &res));
        }

        match OutputMode::from_context(c) {
            OutputMode::Summary => {
                let app: Application = serde_json::from_slice(&res.body)
                    .map_err(|e| NgsiError::from_source(FUNC, 5, ErrorKind::Action, e))?;
                print_line(ngsi.stdout(), &app.application.id)
                    .map_err(|e| NgsiError::wrap(FUNC, 6, e))
            }
            mode => print_body(ngsi.stdout(), &res.body, mode).map_err(|e| NgsiError::wrap(FUNC, 7, e)),
        }
    }
}

/// `applications update`
pub struct ApplicationsUpdate;

#[async_trait]
impl Action for ApplicationsUpdate {
    async fn run(
        &self,
        c: &Context<'_>,
        ngsi: &mut Ngsi,
        client: Option<&Client>,
    ) -> Result<(), NgsiError> {
        const FUNC: &str = "applications_update";

        let body = make_app_body(c, ngsi).map_err(|e| NgsiError::wrap(FUNC, 1, e))?;
        let client = require_client(FUNC, 2, client)?;
        let res = client
            .patch(&app_path(c), body)
            .await
            .map_err(|e| NgsiError::wrap(FUNC, 3, e))?;
        if res.status != 200 {
            return Err(status_error(FUNC, 4, &res));
        }

        print_body(ngsi.stdout(), &res.body, OutputMode::from_context(c))
            .map_err(|e| NgsiError::wrap(FUNC, 5, e))
    }
}

/// `applications delete`
pub struct ApplicationsDelete;

#[async_trait]
impl Action for ApplicationsDelete {
    async fn run(
        &self,
        c: &Context<'_>,
        _ngsi: &mut Ngsi,
        client: Option<&Client>,
    ) -> Result<(), NgsiError> {
        const FUNC: &str = "applications_delete";

        let client = require_client(FUNC, 1, client)?;
        let res = client
            .delete(&app_path(c))
            .await
            .map_err(|e| NgsiError::wrap(FUNC, 2, e))?;
        if res.status != 204 {
            return Err(status_error(FUNC, 3, &res));
        }
        Ok(())
    }
}
