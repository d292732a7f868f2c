/// Library application session forwarded on behalf of a reader
///
/// The library application identifies readers by its own session cookie. The
/// widget server never interprets that cookie; it picks it out of the reader's
/// request and replays it on every backend call made for that reader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibrarySession {
    cookie: Option<String>,
}

impl LibrarySession {
    /// A reader without a library session
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session carried by the cookie `name=value`
    pub fn from_cookie(name: &str, value: &str) -> Self {
        Self {
            cookie: Some(format!("{}={}", name, value)),
        }
    }

    /// Finds the cookie called `name` among `Cookie` header values
    ///
    /// Other cookies are dropped; an empty value counts as no session.
    pub fn from_cookie_headers<'a, I>(headers: I, name: &str) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        headers
            .into_iter()
            .flat_map(|header| header.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, value)| key.trim() == name && !value.trim().is_empty())
            .map(|(_, value)| Self::from_cookie(name, value.trim()))
            .unwrap_or_default()
    }

    /// `Cookie` header value to send to the library application
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.cookie.is_some()
    }
}
