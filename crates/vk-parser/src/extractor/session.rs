use rustc_hash::FxHashMap;

/// Cookie jar of an authenticated user session.
///
/// Only age-restricted content needs one; acquiring it (the login flow) is
/// out of scope here, callers import cookies from a browser or an external
/// auth component.
#[derive(Debug, Clone, Default)]
pub struct Session {
    cookies: FxHashMap<String, String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a cookie string in the standard `name1=value1; name2=value2`
    /// format. Accepts ';' and newline separators; blank or malformed
    /// pairs are skipped.
    pub fn from_cookie_string(cookie_string: &str) -> Self {
        let mut session = Self::default();
        session.add_cookies_from_string(cookie_string);
        session
    }

    pub fn add_cookies_from_string(&mut self, cookie_string: &str) {
        for part in cookie_string.split(&[';', '\n'][..]).map(str::trim) {
            if part.is_empty() {
                continue;
            }

            let Some((name, value)) = part.split_once('=') else {
                continue;
            };
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                continue;
            }

            self.cookies.insert(name.to_owned(), value.to_owned());
        }
    }

    pub fn add_cookie<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.cookies.insert(name.into(), value.into());
    }

    pub fn get_cookie(&self, name: &str) -> Option<&String> {
        self.cookies.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Renders the jar as a `Cookie` header value, `None` when empty.
    pub fn header_value(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }

        let mut header = String::with_capacity(
            self.cookies
                .iter()
                .map(|(k, v)| k.len() + 1 + v.len() + 2)
                .sum(),
        );

        for (name, value) in &self.cookies {
            if !header.is_empty() {
                header.push_str("; ");
            }
            header.push_str(name);
            header.push('=');
            header.push_str(value);
        }

        Some(header)
    }
}
