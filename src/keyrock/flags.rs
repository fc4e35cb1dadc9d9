//! keyrock::flags
//!
//! Flags of the Keyrock application commands.

use crate::cli::flag::FlagSpec;

pub static AID: FlagSpec = FlagSpec::string("aid")
    .aliases(&["i"])
    .usage("application id `VALUE`");

pub static DATA: FlagSpec = FlagSpec::string("data")
    .aliases(&["d"])
    .usage("application data `VALUE`");

pub static NAME: FlagSpec = FlagSpec::string("name")
    .aliases(&["n"])
    .usage("application name `VALUE`");

pub static DESCRIPTION: FlagSpec = FlagSpec::string("description")
    .aliases(&["D"])
    .usage("description `VALUE`");

pub static URL: FlagSpec = FlagSpec::string("url").aliases(&["u"]).usage("url `VALUE`");

pub static REDIRECT_URI: FlagSpec = FlagSpec::string("redirectUri")
    .aliases(&["R"])
    .usage("redirect uri `VALUE`");

pub static REDIRECT_SIGN_OUT_URI: FlagSpec = FlagSpec::string("redirectSignOutUri")
    .aliases(&["S"])
    .usage("redirect sign out uri `VALUE`");

pub static GRANT_TYPE: FlagSpec = FlagSpec::string("grantType")
    .aliases(&["g"])
    .usage("grant type, comma separated `VALUE`");

pub static TOKEN_TYPES: FlagSpec = FlagSpec::string("tokenTypes")
    .aliases(&["t"])
    .usage("token types, comma separated `VALUE`");

pub static RESPONSE_TYPE: FlagSpec = FlagSpec::string("responseType")
    .aliases(&["r"])
    .usage("response type, comma separated `VALUE`");

pub static CLIENT_TYPE: FlagSpec = FlagSpec::string("clientType")
    .aliases(&["c"])
    .usage("client type, comma separated `VALUE`");

/// Flags describing an application body, shared by create and update.
pub fn body_flags() -> Vec<&'static FlagSpec> {
    vec![
        &DATA,
        &NAME,
        &DESCRIPTION,
        &URL,
        &REDIRECT_URI,
        &REDIRECT_SIGN_OUT_URI,
        &GRANT_TYPE,
        &TOKEN_TYPES,
        &RESPONSE_TYPE,
        &CLIENT_TYPE,
    ]
}
