//! Cookie storage shared by every exchange of one client.
//!
//! The jar is an insertion-ordered list of `name=value` pairs. Applying a
//! `Set-Cookie` with a known name replaces that entry in place, keeping
//! its original position; a new name appends. Attributes after the first
//! `;` of a `Set-Cookie` value (`Path`, `Expires` and friends) are
//! discarded; only the pair itself is replayed on later requests.

use http::HeaderValue;
use tracing::trace;

/// An ordered collection of cookies, replayed as one `Cookie: name=value`
/// line per entry.
#[derive(Debug, Default)]
pub(crate) struct CookieJar {
    entries: Vec<(String, String)>,
}

impl CookieJar {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Applies one `Set-Cookie` header value to the jar.
    ///
    /// Values that are not visible ASCII or carry no `=` are ignored.
    pub(crate) fn apply(&mut self, raw: &HeaderValue) {
        let Ok(text) = raw.to_str() else {
            return;
        };

        let pair = text.split_once(';').map_or(text, |(pair, _attributes)| pair);
        let Some((name, value)) = pair.split_once('=') else {
            return;
        };

        self.set(name.trim(), value.trim());
    }

    /// Stores a cookie, replacing an existing entry of the same name in
    /// place or appending a new one.
    pub(crate) fn set(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(stored, _)| stored == name) {
            Some(entry) => {
                trace!(name, "replaced cookie");
                entry.1 = value.to_owned();
            }
            None => {
                trace!(name, "stored cookie");
                self.entries.push((name.to_owned(), value.to_owned()));
            }
        }
    }

    /// Renders every entry as a `Cookie` header value, in storage order.
    pub(crate) fn render(&self) -> Vec<HeaderValue> {
        self.entries
            .iter()
            .filter_map(|(name, value)| HeaderValue::try_from(format!("{name}={value}")).ok())
            .collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|(stored, _)| stored == name).map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).unwrap()
    }

    #[test]
    fn attributes_are_discarded() {
        let mut jar = CookieJar::new();
        jar.apply(&header("sid=abc123; Path=/; Expires=Wed, 21 Oct 2026 07:28:00 GMT"));

        assert_eq!(jar.get("sid"), Some("abc123"));
    }

    #[test]
    fn replacing_keeps_first_position() {
        let mut jar = CookieJar::new();
        jar.apply(&header("first=1"));
        jar.apply(&header("second=2"));
        jar.apply(&header("first=10"));

        let rendered: Vec<_> = jar.render().iter().map(|v| v.to_str().unwrap().to_owned()).collect();
        assert_eq!(rendered, vec!["first=10", "second=2"]);
    }

    #[test]
    fn applying_the_same_pair_twice_is_idempotent() {
        let mut jar = CookieJar::new();
        jar.apply(&header("sid=abc"));
        jar.apply(&header("sid=abc"));

        assert_eq!(jar.render().len(), 1);
        assert_eq!(jar.get("sid"), Some("abc"));
    }

    #[test]
    fn valueless_set_cookie_is_ignored() {
        let mut jar = CookieJar::new();
        jar.apply(&header("just-some-text"));

        assert!(jar.is_empty());
    }

    #[test]
    fn empty_value_replaces() {
        let mut jar = CookieJar::new();
        jar.apply(&header("sid=abc"));
        jar.apply(&header("sid=; Max-Age=0"));

        assert_eq!(jar.get("sid"), Some(""));
    }
}
