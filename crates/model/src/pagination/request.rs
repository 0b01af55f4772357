use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("Unknown sort direction: {other}")),
        }
    }
}

/// A request-level sort instruction, e.g. `name,desc`.
///
/// `property` is the public name of a field, not a column; repositories
/// resolve it through an allow-list before it reaches a statement.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub property: String,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn asc(property: impl Into<String>) -> Self {
        SortOrder {
            property: property.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        SortOrder {
            property: property.into(),
            direction: SortDirection::Desc,
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    /// Parses `property` or `property,direction`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ',');
        let property = parts.next().unwrap_or_default().trim();
        if property.is_empty() {
            return Err(format!("Empty sort property in '{s}'"));
        }
        let direction = match parts.next() {
            Some(dir) => dir.trim().parse()?,
            None => SortDirection::Asc,
        };
        Ok(SortOrder {
            property: property.to_string(),
            direction,
        })
    }
}

/// The pageable descriptor a service receives: `{index, size, sort}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub index: u64,
    pub size: u64,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u64 = 20;

    pub fn new(index: u64, size: u64) -> Self {
        PageRequest {
            index,
            size,
            sort: Vec::new(),
        }
    }

    pub fn first(size: u64) -> Self {
        Self::new(0, size)
    }

    pub fn with_sort(mut self, order: SortOrder) -> Self {
        self.sort.push(order);
        self
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_order() {
        assert_eq!("name".parse::<SortOrder>().unwrap(), SortOrder::asc("name"));
        assert_eq!(
            "created_on, DESC".parse::<SortOrder>().unwrap(),
            SortOrder::desc("created_on")
        );
        assert!("name,sideways".parse::<SortOrder>().is_err());
        assert!(",asc".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_builder() {
        let req = PageRequest::new(2, 10).with_sort(SortOrder::desc("name"));
        assert_eq!(req.index, 2);
        assert_eq!(req.sort.len(), 1);
        assert_eq!(PageRequest::default().size, PageRequest::DEFAULT_SIZE);
    }
}
