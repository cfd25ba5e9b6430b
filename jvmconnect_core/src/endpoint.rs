//! URL derivation for agents, default profile values and navigation.
//!
//! Everything here is pure: the console page URL is always passed in.

use url::Url;

use crate::core::errors::UrlError;
use crate::storage::profile::ConnectionProfile;

const DEFAULT_SCHEME: &str = "http";
const DEFAULT_HOST: &str = "localhost";

/// Query parameter the console reads to pick the connection to open.
pub const CONNECTION_QUERY_PARAM: &str = "con";

fn parse(raw: &str) -> Result<Url, UrlError> {
    Url::parse(raw).map_err(|source| UrlError::Parse {
        url: raw.to_string(),
        source,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Direct agent URL from `scheme://host:port/path`, applying defaults.
fn direct_url(profile: &ConnectionProfile) -> Result<Url, UrlError> {
    let scheme = non_empty(profile.scheme.as_deref()).unwrap_or(DEFAULT_SCHEME);
    let host = non_empty(profile.host.as_deref()).unwrap_or(DEFAULT_HOST);

    let raw = format!("{scheme}://{host}");
    let mut url = parse(&raw)?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(UrlError::NotABase(raw));
    }
    if let Some(port) = profile.port {
        url.set_port(Some(port))
            .map_err(|()| UrlError::NotABase(raw.clone()))?;
    }
    if let Some(path) = non_empty(profile.path.as_deref()) {
        url.set_path(path);
    }
    Ok(url)
}

/// URL a probe for `profile` is sent to.
///
/// An explicit `jolokiaUrl` wins (resolved against `page` when relative).
/// With `useProxy` the direct URL is tunnelled through the console's
/// `<context>/proxy/<scheme>/<host>/<port><path>` endpoint.
pub fn connection_url(
    profile: &ConnectionProfile,
    page: Option<&Url>,
    route: Option<&str>,
) -> Result<Url, UrlError> {
    if let Some(explicit) = non_empty(profile.jolokia_url.as_deref()) {
        return match page {
            Some(page) => page.join(explicit).map_err(|source| UrlError::Parse {
                url: explicit.to_string(),
                source,
            }),
            None => parse(explicit),
        };
    }

    let direct = direct_url(profile)?;
    if !profile.use_proxy {
        return Ok(direct);
    }

    let page = page.ok_or(UrlError::NoPageUrl)?;
    let context = context_path(page, route).unwrap_or_default();
    let host = direct
        .host_str()
        .ok_or_else(|| UrlError::NotABase(direct.to_string()))?;
    let port = direct
        .port_or_known_default()
        .ok_or_else(|| UrlError::NotABase(direct.to_string()))?;

    parse(&format!(
        "{}{}/proxy/{}/{}/{}{}",
        page.origin().ascii_serialization(),
        context,
        direct.scheme(),
        host,
        port,
        direct.path()
    ))
}

/// Part of the page path in front of the in-app `route`.
///
/// Without a route the whole page path (minus a trailing `/`) is the context.
/// `None` when the route does not occur in the page path.
pub fn context_path(page: &Url, route: Option<&str>) -> Option<String> {
    let path = page.path();
    match non_empty(route) {
        Some(route) => path.find(route).map(|idx| path[..idx].to_string()),
        None => Some(path.trim_end_matches('/').to_string()),
    }
}

/// Starting values for a "new connection" form, taken from the page URL.
///
/// Fields that cannot be derived stay `None`.
pub fn default_options(page: Option<&Url>, route: Option<&str>, suffix: &str) -> ConnectionProfile {
    let mut profile = ConnectionProfile::default();
    if let Some(page) = page {
        profile.port = page.port();
        profile.path = context_path(page, route).map(|context| format!("{context}{suffix}"));
    }
    profile
}

/// Page origin with `?con=<name>` appended; path, query and fragment dropped.
pub fn connect_url(page: &Url, name: &str) -> Url {
    let mut url = page.clone();
    url.set_path("");
    url.set_query(None);
    url.set_fragment(None);
    url.query_pairs_mut()
        .append_pair(CONNECTION_QUERY_PARAM, name);
    url
}
