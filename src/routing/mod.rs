use std::fmt;
use std::str::FromStr;

use axum::http::Method;

use crate::errors::NotesError;

/// Page actions reachable through `/<action>/<identifier>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Edit,
    Save,
    View,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Edit => "edit",
            Action::Save => "save",
            Action::View => "view",
        }
    }

    /// HTTP method accepted for this action
    pub fn method(&self) -> Method {
        match self {
            Action::Edit | Action::View => Method::GET,
            Action::Save => Method::POST,
        }
    }

    /// Whether a request method is served by this action; HEAD follows GET
    pub fn accepts(&self, method: &Method) -> bool {
        let expected = self.method();
        *method == expected || (*method == Method::HEAD && expected == Method::GET)
    }
}

impl FromStr for Action {
    type Err = NotesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edit" => Ok(Action::Edit),
            "save" => Ok(Action::Save),
            "view" => Ok(Action::View),
            _ => Err(NotesError::NotFound),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated page identifier: ASCII letters, digits and `-`, never empty.
///
/// Anything that could name a path outside the storage directory (separators,
/// dots, percent escapes) is outside the allowed set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageId(String);

impl PageId {
    pub fn parse(raw: &str) -> Result<Self, NotesError> {
        if is_valid_identifier(raw) {
            Ok(PageId(raw.to_string()))
        } else {
            Err(NotesError::InvalidIdentifier(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn is_valid_identifier(raw: &str) -> bool {
    !raw.is_empty() && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Match `/<action>/<identifier>` exactly
pub fn parse_page_path(path: &str) -> Option<(Action, PageId)> {
    let rest = path.strip_prefix('/')?;
    let (action, id) = rest.split_once('/')?;
    let action = action.parse::<Action>().ok()?;
    let id = PageId::parse(id).ok()?;
    Some((action, id))
}

/// Resolve a request to a page action, checking the method against the route table
pub fn resolve(method: &Method, path: &str) -> Result<(Action, PageId), NotesError> {
    let (action, id) = parse_page_path(path).ok_or(NotesError::NotFound)?;
    if !action.accepts(method) {
        log::debug!("Method {} not allowed for /{}/{}", method, action, id);
        return Err(NotesError::MethodNotAllowed);
    }
    Ok((action, id))
}
