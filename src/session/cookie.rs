//! Cookie-backed session slots for the gateway

use super::{Session, Slot};

/// Extract the session slots from a `Cookie` header value
pub(super) fn parse(header: &str) -> Session {
    let mut token = None;
    let mut role = None;

    for pair in header.split(';') {
        let Some((name, value)) = pair.trim().split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"');
        let decoded = urlencoding::decode(value)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| value.to_string());

        // First occurrence wins
        match name.trim() {
            "token" if token.is_none() => token = Some(decoded),
            "role" if role.is_none() => role = Some(decoded),
            _ => {}
        }
    }

    Session::from_parts(token, role)
}

/// `Set-Cookie` value storing a slot
pub fn set_cookie(slot: Slot, value: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        slot.key(),
        urlencoding::encode(value)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value removing a slot from the browser
pub fn expire_cookie(slot: Slot) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        slot.key()
    )
}
