use axum::http::{
    HeaderMap, HeaderValue,
    header::{self, InvalidHeaderValue},
};
use chrono::{DateTime, Utc};
use cookie::{Cookie, SameSite};
use livery_config::{
    CookieSettings, SameSitePolicy, constants::DEFAULT_COOKIE_PATH,
};
use time::OffsetDateTime;

/// Attributes of the theme cookie. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    /// Cookie name.
    pub name: String,
    /// Seconds from "now" until the cookie expires.
    pub lifetime: u64,
    /// `Path` attribute.
    pub path: String,
    /// `Domain` attribute; host-only when `None`.
    pub domain: Option<String>,
    /// Emit the `Secure` flag.
    pub secure: bool,
    /// Emit the `HttpOnly` flag.
    pub http_only: bool,
    /// `SameSite` attribute; omitted when `None`.
    pub same_site: Option<SameSite>,
}

impl CookieOptions {
    /// Options for `name` with the default attributes.
    pub fn new(name: impl Into<String>) -> Self {
        CookieSettings {
            name: name.into(),
            ..Default::default()
        }
        .into()
    }

    /// Set the lifetime in seconds.
    pub fn with_lifetime(mut self, seconds: u64) -> Self {
        self.lifetime = seconds;
        self
    }

    /// Set the `Path` attribute.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the `Domain` attribute.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Toggle the `Secure` flag.
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Toggle the `HttpOnly` flag.
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Set the `SameSite` attribute.
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    /// Value of the configured cookie across all `Cookie` headers. The first
    /// occurrence wins; malformed pairs are skipped.
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == self.name)
            .map(|cookie| cookie.value().to_string())
    }

    /// Build the cookie for `value`, expiring `lifetime` seconds after `now`.
    pub fn build(&self, value: &str, now: DateTime<Utc>) -> Cookie<'static> {
        let mut builder = Cookie::build((self.name.clone(), value.to_string()))
            .path(self.path.clone())
            .secure(self.secure)
            .http_only(self.http_only);

        if let Some(expires) = self.expires_at(now) {
            builder = builder.expires(expires);
        }
        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }
        if let Some(same_site) = self.same_site {
            builder = builder.same_site(same_site);
        }

        builder.build()
    }

    /// Set the cookie for `value` on a response.
    ///
    /// A `Set-Cookie` with the same name, path and domain is replaced.
    /// Cookies with a different name or scope are kept.
    pub fn set_in(
        &self,
        headers: &mut HeaderMap,
        value: &str,
        now: DateTime<Utc>,
    ) -> Result<(), InvalidHeaderValue> {
        let cookie = self.build(value, now);
        let header_value = HeaderValue::from_str(&cookie.to_string())?;

        let kept: Vec<HeaderValue> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter(|existing| !self.same_scope(existing))
            .cloned()
            .collect();

        headers.remove(header::SET_COOKIE);
        for existing in kept {
            headers.append(header::SET_COOKIE, existing);
        }
        headers.append(header::SET_COOKIE, header_value);
        Ok(())
    }

    /// Whether a `Set-Cookie` value targets this cookie's name, path and
    /// domain.
    fn same_scope(&self, header: &HeaderValue) -> bool {
        let Some(cookie) = header
            .to_str()
            .ok()
            .and_then(|raw| Cookie::parse(raw).ok())
        else {
            return false;
        };

        let domain = self
            .domain
            .as_deref()
            .map(|domain| domain.trim_start_matches('.'));

        cookie.name() == self.name
            && cookie.path().unwrap_or(DEFAULT_COOKIE_PATH) == self.path
            && cookie.domain() == domain
    }

    fn expires_at(&self, now: DateTime<Utc>) -> Option<OffsetDateTime> {
        let lifetime = i64::try_from(self.lifetime).ok()?;
        let timestamp = now.timestamp().checked_add(lifetime)?;
        OffsetDateTime::from_unix_timestamp(timestamp).ok()
    }
}

impl From<CookieSettings> for CookieOptions {
    fn from(settings: CookieSettings) -> Self {
        Self {
            name: settings.name,
            lifetime: settings.lifetime,
            path: settings.path,
            domain: settings.domain,
            secure: settings.secure,
            http_only: settings.http_only,
            same_site: settings.same_site.map(|policy| match policy {
                SameSitePolicy::Strict => SameSite::Strict,
                SameSitePolicy::Lax => SameSite::Lax,
                SameSitePolicy::None => SameSite::None,
            }),
        }
    }
}

impl From<&CookieSettings> for CookieOptions {
    fn from(settings: &CookieSettings) -> Self {
        settings.clone().into()
    }
}
