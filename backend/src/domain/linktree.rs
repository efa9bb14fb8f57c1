//! Linktree aggregate and its embedded links.
//!
//! A linktree is a single document: scalar profile fields plus an ordered
//! array of links. Links are only ever changed through the atomic primitives
//! of [`crate::domain::ports::LinktreeRepository`]; the types here carry the
//! validated inputs to those primitives.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identifiers::uuid_identifier;

uuid_identifier!(
    /// Stable linktree identifier.
    LinktreeId,
    "linktree id"
);

uuid_identifier!(
    /// Identifier of a link, unique within its linktree.
    LinkId,
    "link id"
);

/// Maximum characters accepted for a link name.
pub const LINK_NAME_MAX: usize = 128;
/// Maximum characters accepted for a link target.
pub const LINK_URL_MAX: usize = 2048;
/// Maximum characters accepted for the bio and full name.
pub const PROFILE_TEXT_MAX: usize = 1024;

/// Validation failures for linktree inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinktreeValidationError {
    /// Link name was blank once trimmed.
    #[error("link name must not be empty")]
    EmptyLinkName,
    /// Link name exceeded [`LINK_NAME_MAX`].
    #[error("link name must be at most {max} characters")]
    LinkNameTooLong {
        /// Upper bound on characters.
        max: usize,
    },
    /// Link target was blank once trimmed.
    #[error("link must not be empty")]
    EmptyLinkUrl,
    /// Link target exceeded [`LINK_URL_MAX`].
    #[error("link must be at most {max} characters")]
    LinkUrlTooLong {
        /// Upper bound on characters.
        max: usize,
    },
    /// Bio or full name exceeded [`PROFILE_TEXT_MAX`].
    #[error("{field} must be at most {max} characters")]
    ProfileTextTooLong {
        /// Offending field name.
        field: &'static str,
        /// Upper bound on characters.
        max: usize,
    },
    /// An update named neither a link id nor a link name to match.
    #[error("link update must identify a link by id or name")]
    MissingLinkSelector,
}

/// One named link inside a linktree.
///
/// Serialised as `{"id", "name", "link", "visits"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Link {
    id: LinkId,
    #[schema(example = "GitHub")]
    name: String,
    #[serde(rename = "link")]
    #[schema(example = "https://github.com/ada")]
    url: String,
    visits: u64,
}

impl Link {
    /// Materialise a draft under a freshly generated identifier.
    #[must_use]
    pub fn from_draft(draft: LinkDraft) -> Self {
        Self::with_id(LinkId::random(), draft)
    }

    /// Materialise a draft under a known identifier.
    #[must_use]
    pub fn with_id(id: LinkId, draft: LinkDraft) -> Self {
        let LinkDraft { name, url, visits } = draft;
        Self {
            id,
            name,
            url,
            visits,
        }
    }

    /// Link identifier.
    #[must_use]
    pub fn id(&self) -> LinkId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target address.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Visit counter.
    #[must_use]
    pub fn visits(&self) -> u64 {
        self.visits
    }

    /// Whether this link is selected by `selector`.
    #[must_use]
    pub fn matches(&self, selector: &LinkMatch) -> bool {
        match selector {
            LinkMatch::Id(id) => self.id == *id,
            LinkMatch::Name(name) => self.name == *name,
        }
    }

    /// Overwrite the mutable attributes, keeping the identifier.
    pub fn apply(&mut self, fields: &LinkFields) {
        self.name.clone_from(&fields.name);
        self.url.clone_from(&fields.url);
        self.visits = fields.visits;
    }
}

/// Validated attributes for a link that has no identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDraft {
    name: String,
    url: String,
    visits: u64,
}

impl LinkDraft {
    /// Validate link attributes.
    ///
    /// # Errors
    /// Returns [`LinktreeValidationError`] when the name or target is blank or
    /// too long.
    pub fn new(
        name: impl AsRef<str>,
        url: impl AsRef<str>,
        visits: u64,
    ) -> Result<Self, LinktreeValidationError> {
        Ok(Self {
            name: validate_name(name.as_ref())?,
            url: validate_url(url.as_ref())?,
            visits,
        })
    }

    /// Proposed display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Proposed target address.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Replacement attributes for an existing link.
///
/// Structurally identical to a draft; kept distinct so an update can never be
/// pushed as a new link by accident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFields {
    name: String,
    url: String,
    visits: u64,
}

impl LinkFields {
    /// Validate replacement attributes.
    ///
    /// # Errors
    /// Returns [`LinktreeValidationError`] when the name or target is blank or
    /// too long.
    pub fn new(
        name: impl AsRef<str>,
        url: impl AsRef<str>,
        visits: u64,
    ) -> Result<Self, LinktreeValidationError> {
        Ok(Self {
            name: validate_name(name.as_ref())?,
            url: validate_url(url.as_ref())?,
            visits,
        })
    }

    /// Replacement display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replacement target address.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Replacement visit counter.
    #[must_use]
    pub fn visits(&self) -> u64 {
        self.visits
    }
}

/// Selector for the link an update targets. The first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkMatch {
    /// Match on the link identifier.
    Id(LinkId),
    /// Match on the exact link name.
    Name(String),
}

impl LinkMatch {
    /// Prefer the identifier when present, otherwise fall back to the name.
    ///
    /// # Errors
    /// Returns [`LinktreeValidationError::MissingLinkSelector`] when neither
    /// is usable.
    pub fn from_parts(
        id: Option<LinkId>,
        name: Option<&str>,
    ) -> Result<Self, LinktreeValidationError> {
        match (id, name.map(str::trim)) {
            (Some(id), _) => Ok(Self::Id(id)),
            (None, Some(name)) if !name.is_empty() => Ok(Self::Name(name.to_owned())),
            _ => Err(LinktreeValidationError::MissingLinkSelector),
        }
    }
}

/// Free-text profile field (bio or full name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileText(String);

impl ProfileText {
    /// Validate a profile text value for `field`.
    ///
    /// Empty values are allowed so a field can be cleared.
    ///
    /// # Errors
    /// Returns [`LinktreeValidationError::ProfileTextTooLong`] past
    /// [`PROFILE_TEXT_MAX`] characters.
    pub fn new(field: &'static str, raw: impl Into<String>) -> Result<Self, LinktreeValidationError> {
        let raw = raw.into();
        if raw.chars().count() > PROFILE_TEXT_MAX {
            return Err(LinktreeValidationError::ProfileTextTooLong {
                field,
                max: PROFILE_TEXT_MAX,
            });
        }
        Ok(Self(raw))
    }

    /// Borrow the text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Profile document owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Linktree {
    id: LinktreeId,
    #[schema(example = "Ada Lovelace")]
    fullname: String,
    #[schema(example = "Analytical engines")]
    bio: String,
    links: Vec<Link>,
}

impl Linktree {
    /// Assemble a linktree from its parts.
    #[must_use]
    pub fn new(id: LinktreeId, fullname: String, bio: String, links: Vec<Link>) -> Self {
        Self {
            id,
            fullname,
            bio,
            links,
        }
    }

    /// Start a brand-new tree with generated identifiers for the tree and for
    /// every initial link.
    #[must_use]
    pub fn create(fullname: &ProfileText, bio: &ProfileText, drafts: Vec<LinkDraft>) -> Self {
        Self::new(
            LinktreeId::random(),
            fullname.as_str().to_owned(),
            bio.as_str().to_owned(),
            drafts.into_iter().map(Link::from_draft).collect(),
        )
    }

    /// Tree identifier.
    #[must_use]
    pub fn id(&self) -> LinktreeId {
        self.id
    }

    /// Display name of the owner.
    #[must_use]
    pub fn fullname(&self) -> &str {
        &self.fullname
    }

    /// Free-text biography.
    #[must_use]
    pub fn bio(&self) -> &str {
        &self.bio
    }

    /// Links in insertion order.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Find a link by identifier.
    #[must_use]
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.iter().find(|link| link.id == id)
    }

    /// Append a link.
    pub fn push_link(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Apply `fields` to the first link matching `selector`.
    ///
    /// Returns `false` when nothing matched.
    pub fn replace_link_fields(&mut self, selector: &LinkMatch, fields: &LinkFields) -> bool {
        match self.links.iter_mut().find(|link| link.matches(selector)) {
            Some(link) => {
                link.apply(fields);
                true
            }
            None => false,
        }
    }

    /// Remove the link with `id`. Returns `false` when it was absent.
    pub fn remove_link(&mut self, id: LinkId) -> bool {
        let before = self.links.len();
        self.links.retain(|link| link.id != id);
        self.links.len() != before
    }

    /// Replace the biography.
    pub fn set_bio(&mut self, bio: &ProfileText) {
        bio.as_str().clone_into(&mut self.bio);
    }

    /// Replace the full name.
    pub fn set_fullname(&mut self, fullname: &ProfileText) {
        fullname.as_str().clone_into(&mut self.fullname);
    }
}

fn validate_name(raw: &str) -> Result<String, LinktreeValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LinktreeValidationError::EmptyLinkName);
    }
    if trimmed.chars().count() > LINK_NAME_MAX {
        return Err(LinktreeValidationError::LinkNameTooLong { max: LINK_NAME_MAX });
    }
    Ok(trimmed.to_owned())
}

fn validate_url(raw: &str) -> Result<String, LinktreeValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LinktreeValidationError::EmptyLinkUrl);
    }
    if trimmed.chars().count() > LINK_URL_MAX {
        return Err(LinktreeValidationError::LinkUrlTooLong { max: LINK_URL_MAX });
    }
    Ok(trimmed.to_owned())
}
