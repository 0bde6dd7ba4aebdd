//! # URI Lexer
//!
//! A minimal, non-destructive RFC 3986 lexer. Every component is a slice of
//! the input, so a parse never allocates and the result lives exactly as long
//! as the option value it was taken from.
//!
//! ```text
//! coap://user@[2001:db8::1]:5683/sensors/temp?fresh=1
//! \__/   \__/ \___________/ \__/\___________/ \_____/
//! scheme  |       host      port     path      query
//!      userinfo
//! ```

use thiserror::Error;

/// Lexer failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UriError {
    /// Zero-length input.
    #[error("empty URI")]
    Empty,
    /// Syntax error in scheme or authority.
    #[error("malformed URI")]
    Malformed,
    /// A relative reference where an absolute URI was required.
    #[error("URI is relative")]
    Relative,
}

/// Components of a URI, borrowed from the input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParsedUri<'a> {
    /// Scheme without the trailing `:` (absent for relative references).
    pub scheme: Option<&'a str>,
    /// Userinfo without the trailing `@`.
    pub userinfo: Option<&'a str>,
    /// Host as written, including the brackets of an IPv6 literal.
    /// Present (possibly empty) whenever the URI has an authority.
    pub host: Option<&'a str>,
    /// Port digits without the leading `:`.
    pub port: Option<&'a str>,
    /// Path, including its leading `/` if any.
    pub path: &'a str,
    /// Query without the leading `?` (present, possibly empty, if `?` occurs).
    pub query: Option<&'a str>,
}

/// `true` if `uri` starts with a scheme (an ALPHA first character and a `:`
/// somewhere in the string).
pub fn is_absolute(uri: &str) -> bool {
    uri.contains(':') && uri.bytes().next().is_some_and(|b| b.is_ascii_alphabetic())
}

impl<'a> ParsedUri<'a> {
    /// Lex an absolute URI or a relative reference.
    pub fn parse(uri: &'a str) -> Result<Self, UriError> {
        if uri.is_empty() {
            return Err(UriError::Empty);
        }
        if is_absolute(uri) {
            Self::lex_absolute(uri)
        } else {
            let mut parsed = Self::default();
            parsed.lex_path(uri);
            Ok(parsed)
        }
    }

    /// Lex a URI that must be absolute.
    pub fn parse_absolute(uri: &'a str) -> Result<Self, UriError> {
        if uri.is_empty() {
            return Err(UriError::Empty);
        }
        if !is_absolute(uri) {
            return Err(UriError::Relative);
        }
        Self::lex_absolute(uri)
    }

    /// `true` if a scheme was found.
    pub fn is_absolute(&self) -> bool {
        self.scheme.is_some()
    }

    fn lex_absolute(uri: &'a str) -> Result<Self, UriError> {
        let colon = uri.find(':').ok_or(UriError::Relative)?;
        if colon == 0 {
            return Err(UriError::Malformed);
        }

        let mut parsed = Self {
            scheme: Some(&uri[..colon]),
            ..Self::default()
        };

        let rest = &uri[colon + 1..];
        let rest = match rest.strip_prefix("//") {
            Some(after_slashes) => parsed.lex_authority(after_slashes)?,
            None => rest,
        };

        parsed.lex_path(rest);
        Ok(parsed)
    }

    /// Consume the authority; returns the remainder starting at the path.
    fn lex_authority(&mut self, rest: &'a str) -> Result<&'a str, UriError> {
        let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
        let authority = &rest[..authority_end];

        let mut host = authority;
        if let Some(at) = authority.find('@') {
            self.userinfo = Some(&authority[..at]);
            host = &authority[at + 1..];
        }

        // Port search starts after the closing bracket of an IPv6 literal,
        // otherwise after the first host character.
        let search_from = if host.starts_with('[') {
            host.find(']').ok_or(UriError::Malformed)? + 1
        } else {
            host.chars().next().map_or(0, char::len_utf8)
        };

        if let Some(offset) = host[search_from..].rfind(':') {
            let colon = search_from + offset;
            let port = &host[colon + 1..];
            if port.is_empty() {
                return Err(UriError::Malformed);
            }
            self.port = Some(port);
            host = &host[..colon];
        }

        if host.is_empty() && (self.userinfo.is_some() || self.port.is_some()) {
            return Err(UriError::Malformed);
        }

        self.host = Some(host);
        Ok(&rest[authority_end..])
    }

    fn lex_path(&mut self, rest: &'a str) {
        match rest.find('?') {
            Some(q) => {
                self.path = &rest[..q];
                self.query = Some(&rest[q + 1..]);
            }
            None => self.path = rest,
        }
    }
}

#[cfg(test)]
mod tests;
