//! Classification of inbound protocol lines.
//!
//! The session core only reacts to two kinds of line. Everything else is
//! passed through untouched to the consumer.

/// One inbound protocol line, classified by its `|kind|` prefix.
///
/// Borrowing variants point into the original line, so classifying a line
/// never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerLine<'a> {
    /// `|challstr|<data>`: the login challenge for this connection.
    ///
    /// `data` is everything after the prefix. It usually contains a `|`
    /// itself (`<keyid>|<nonce>`) and must be sent back verbatim.
    Challstr(&'a str),

    /// `|updateuser|<name>|<named>|<avatar>|<settings...>`: the server
    /// telling us which identity this connection currently has.
    UpdateUser {
        /// The reported name, including its leading rank glyph.
        name: &'a str,
        /// `true` when the server considers the user logged in to a name
        /// (the `named` field is `1`).
        named: bool,
        /// Avatar identifier.
        avatar: &'a str,
        /// The remaining fields (a JSON settings blob), unparsed.
        settings: &'a str,
    },

    /// Any other line.
    Other(&'a str),
}

impl<'a> ServerLine<'a> {
    const CHALLSTR: &'static str = "|challstr|";
    const UPDATEUSER: &'static str = "|updateuser|";

    /// Classifies a single protocol line.
    ///
    /// ```rust
    /// use showdown_protocol::ServerLine;
    ///
    /// assert_eq!(
    ///     ServerLine::parse("|challstr|4|abc123"),
    ///     ServerLine::Challstr("4|abc123"),
    /// );
    /// assert!(matches!(ServerLine::parse("|c| Bot|hi"), ServerLine::Other(_)));
    /// ```
    pub fn parse(line: &'a str) -> Self {
        if let Some(rest) = line.strip_prefix(Self::CHALLSTR) {
            return Self::Challstr(rest);
        }

        if let Some(rest) = line.strip_prefix(Self::UPDATEUSER) {
            // `splitn(4, ..)` keeps any `|` inside the settings blob intact.
            let mut fields = rest.splitn(4, '|');
            let name = fields.next().unwrap_or_default();
            let named = fields.next() == Some("1");
            let avatar = fields.next().unwrap_or_default();
            let settings = fields.next().unwrap_or_default();
            return Self::UpdateUser {
                name,
                named,
                avatar,
                settings,
            };
        }

        Self::Other(line)
    }
}

/// Strips the rank glyph the server puts in front of user names.
///
/// Names in `updateuser` look like `" Bot"` or `"@Bot"`: the first
/// character is the user's group symbol. It is only removed when it can't
/// be part of a name (i.e. it is not an ASCII letter or digit).
pub(crate) fn strip_rank(name: &str) -> &str {
    match name.chars().next() {
        Some(c) if !c.is_ascii_alphanumeric() => &name[c.len_utf8()..],
        _ => name,
    }
}

impl ServerLine<'_> {
    /// For `updateuser` lines, the reported name without its rank glyph.
    pub fn bare_name(&self) -> Option<&str> {
        match self {
            Self::UpdateUser { name, .. } => Some(strip_rank(name)),
            _ => None,
        }
    }
}
