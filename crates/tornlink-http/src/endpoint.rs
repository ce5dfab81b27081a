use std::fmt;
use std::time::Duration;

use url::Url;

use tornlink_core::{ApiError, Result};

/// Upstream schema family
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApiVersion {
    /// Query-string style: `/user/?selections=a,b&key=K`
    V1,
    /// Path style: `/v2/user?selections=a,b&key=K`
    V2,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }
}

/// Top-level upstream entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Entity {
    User,
    Faction,
    Torn,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::User => "user",
            Entity::Faction => "faction",
            Entity::Torn => "torn",
        }
    }
}

/// One outbound request: which entity, which selections, how long to wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub version: ApiVersion,
    pub entity: Entity,
    /// Target id, the credential's own entity when `None`
    pub id: Option<u64>,
    pub selections: Vec<String>,
    pub timeout: Duration,
}

impl Endpoint {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(version: ApiVersion, entity: Entity) -> Self {
        Self {
            version,
            entity,
            id: None,
            selections: Vec::new(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Add a selection, ignoring duplicates
    pub fn select(mut self, selection: impl Into<String>) -> Self {
        self.push_selection(selection);
        self
    }

    pub fn push_selection(&mut self, selection: impl Into<String>) {
        let selection = selection.into();
        if !self.selections.contains(&selection) {
            self.selections.push(selection);
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Path relative to the API base
    pub fn path(&self) -> String {
        let entity = self.entity.as_str();
        match (self.version, self.id) {
            (ApiVersion::V1, None) => format!("{entity}/"),
            (ApiVersion::V1, Some(id)) => format!("{entity}/{id}"),
            (ApiVersion::V2, None) => format!("v2/{entity}"),
            (ApiVersion::V2, Some(id)) => format!("v2/{entity}/{id}"),
        }
    }

    /// Full request URL including the credential
    ///
    /// The returned URL carries the key; log [`Endpoint::describe`] instead.
    pub fn url(&self, base: &Url, credential: &str, comment: Option<&str>) -> Result<Url> {
        let mut url = base
            .join(&self.path())
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;

        let mut query = format!(
            "selections={}&key={}",
            self.selections.join(","),
            encode(credential)
        );
        if let Some(comment) = comment {
            query.push_str("&comment=");
            query.push_str(&encode(comment));
        }
        url.set_query(Some(&query));
        Ok(url)
    }

    /// Credential-free description, safe for logs and metrics labels
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.version.as_str(), self.entity.as_str())?;
        if let Some(id) = self.id {
            write!(f, "/{id}")?;
        }
        write!(f, " [{}]", self.selections.join(","))
    }
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
