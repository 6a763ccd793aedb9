// Filtering and ordering for project listings

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::{Project, parse_date_ms};

/// Caller-supplied criteria narrowing or ordering a list operation
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Keep only projects whose favorite flag equals this value
    pub favorited: Option<bool>,
    /// Sort key; no ordering applied when absent
    pub order_by: Option<OrderBy>,
    /// Sort direction, ascending when absent
    pub order_direction: Option<OrderDirection>,
    /// Case-insensitive name substring; an empty string applies no search
    pub name: Option<String>,
}

impl ProjectFilter {
    /// The search term this filter will apply (and which the store records
    /// into search history), if any. An empty name counts as no search.
    pub fn search_term(&self) -> Option<&str> {
        self.name.as_deref().filter(|term| !term.is_empty())
    }

    /// Run the pipeline in its fixed order: favorite-equality filter, then
    /// ordering, then name search.
    pub fn apply(&self, mut projects: Vec<Project>) -> Vec<Project> {
        if let Some(wanted) = self.favorited {
            projects.retain(|p| p.favorited == wanted);
        }
        if let Some(key) = self.order_by {
            let direction = self.order_direction.unwrap_or_default();
            // Stable sort: ties keep their original relative order
            projects.sort_by(|a, b| direction.apply(key.compare(a, b)));
        }
        if let Some(term) = self.search_term() {
            let needle = term.to_lowercase();
            projects.retain(|p| p.name.to_lowercase().contains(&needle));
        }
        projects
    }
}

/// Sort key for project listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    Name,
    StartDate,
    EndDate,
}

impl OrderBy {
    /// Three-way comparison of two projects under this key, ascending.
    ///
    /// Names compare case-folded. Dates compare as parsed timestamps;
    /// unparseable dates act as absent and group before parseable ones.
    pub fn compare(self, a: &Project, b: &Project) -> Ordering {
        match self {
            OrderBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            OrderBy::StartDate => parse_date_ms(&a.start_date).cmp(&parse_date_ms(&b.start_date)),
            OrderBy::EndDate => parse_date_ms(&a.end_date).cmp(&parse_date_ms(&b.end_date)),
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBy::Name => write!(f, "name"),
            OrderBy::StartDate => write!(f, "startDate"),
            OrderBy::EndDate => write!(f, "endDate"),
        }
    }
}

impl FromStr for OrderBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(OrderBy::Name),
            "startDate" | "start-date" => Ok(OrderBy::StartDate),
            "endDate" | "end-date" => Ok(OrderBy::EndDate),
            other => Err(format!(
                "unknown sort key: {} (expected name, startDate or endDate)",
                other
            )),
        }
    }
}

/// Sort direction for an ordered listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    /// Orient an ascending comparison result to this direction
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            OrderDirection::Asc => ordering,
            OrderDirection::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "asc"),
            OrderDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for OrderDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(OrderDirection::Asc),
            "desc" => Ok(OrderDirection::Desc),
            other => Err(format!("unknown sort direction: {} (expected asc or desc)", other)),
        }
    }
}
