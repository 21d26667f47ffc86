//! Session cookie construction.
//!
//! Session cookies are readable by server-rendered pages for an auth check:
//! `Path=/`, seven-day `Max-Age`, `SameSite=Lax`. Removal writes an empty
//! value that expired at the Unix epoch.

use cookie::time::{Duration, OffsetDateTime};
use cookie::{Cookie, SameSite};

pub const SESSION_COOKIE_MAX_AGE_DAYS: i64 = 7;

/// Cookie carrying `value` for seven days.
pub fn session_cookie(name: &str, value: String) -> Cookie<'static> {
    Cookie::build((name.to_owned(), value))
        .path("/")
        .max_age(Duration::days(SESSION_COOKIE_MAX_AGE_DAYS))
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie that deletes `name` when written.
pub fn removal_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_owned(), String::new()))
        .path("/")
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Whether writing `cookie` at `now` removes it rather than storing it.
pub fn is_expired(cookie: &Cookie<'_>, now: OffsetDateTime) -> bool {
    let max_age_elapsed = cookie
        .max_age()
        .is_some_and(|age| age.is_zero() || age.is_negative());
    let expiry_passed = cookie.expires_datetime().is_some_and(|at| at <= now);
    max_age_elapsed || expiry_passed
}

/// `Set-Cookie`/`document.cookie` string with the value percent-encoded.
pub fn header_value(cookie: &Cookie<'_>) -> String {
    cookie.encoded().to_string()
}
