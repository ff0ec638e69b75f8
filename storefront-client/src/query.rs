//! List query strings
//!
//! List endpoints take `?current=<page>&pageSize=<size>`, an optional
//! `&sort=<±field>` and field filters appended as raw fragments:
//!
//! - regex match: `&name=/<text>/i`
//! - range: `&price>=<min>&price<=<max>`
//! - equality: `&brand=apple,samsung`

use std::fmt;
use std::str::FromStr;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Sort key, rendered `field` or `-field`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.order {
            SortOrder::Ascending => write!(f, "{}", self.field),
            SortOrder::Descending => write!(f, "-{}", self.field),
        }
    }
}

impl FromStr for Sort {
    type Err = String;

    /// Parse `field`, `+field` or `-field`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (order, field) = match s.strip_prefix('-') {
            Some(field) => (SortOrder::Descending, field),
            None => (SortOrder::Ascending, s.strip_prefix('+').unwrap_or(s)),
        };
        if field.is_empty() {
            return Err(format!("invalid sort key: {:?}", s));
        }
        Ok(Self {
            field: field.to_string(),
            order,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Filter {
    Regex { field: String, pattern: String },
    Range { field: String, min: Option<f64>, max: Option<f64> },
    Equals { field: String, values: Vec<String> },
}

/// Builder for list endpoint query strings
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    current: u32,
    page_size: u32,
    sort: Option<Sort>,
    filters: Vec<Filter>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::page(1, 10)
    }
}

impl ListQuery {
    /// Page `current` (1-based) of `page_size` items; both clamp to at least 1
    pub fn page(current: u32, page_size: u32) -> Self {
        Self {
            current: current.max(1),
            page_size: page_size.max(1),
            sort: None,
            filters: Vec::new(),
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Case-insensitive regex match, `&field=/text/i`
    ///
    /// Blank text adds nothing.
    pub fn matching(mut self, field: impl Into<String>, text: impl AsRef<str>) -> Self {
        let text = text.as_ref().trim();
        if !text.is_empty() {
            self.filters.push(Filter::Regex {
                field: field.into(),
                pattern: text.to_string(),
            });
        }
        self
    }

    /// Inclusive range, `&field>=min&field<=max`; either bound may be open
    pub fn range(mut self, field: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        if min.is_some() || max.is_some() {
            self.filters.push(Filter::Range {
                field: field.into(),
                min,
                max,
            });
        }
        self
    }

    /// Equality on one or more values, comma-joined
    pub fn equals<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values
            .into_iter()
            .map(Into::into)
            .filter(|v: &String| !v.is_empty())
            .collect();
        if !values.is_empty() {
            self.filters.push(Filter::Equals {
                field: field.into(),
                values,
            });
        }
        self
    }

    /// Rendered query string, starting with `?`
    pub fn to_query_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ListQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?current={}&pageSize={}", self.current, self.page_size)?;

        if let Some(ref sort) = self.sort {
            write!(f, "&sort={}", sort)?;
        }

        for filter in &self.filters {
            match filter {
                Filter::Regex { field, pattern } => {
                    write!(f, "&{}=/{}/i", field, urlencoding::encode(pattern))?;
                }
                Filter::Range { field, min, max } => {
                    if let Some(min) = min {
                        write!(f, "&{}>={}", field, min)?;
                    }
                    if let Some(max) = max {
                        write!(f, "&{}<={}", field, max)?;
                    }
                }
                Filter::Equals { field, values } => {
                    let encoded: Vec<_> = values.iter().map(|v| urlencoding::encode(v)).collect();
                    write!(f, "&{}={}", field, encoded.join(","))?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_only() {
        assert_eq!(ListQuery::page(2, 16).to_query_string(), "?current=2&pageSize=16");
    }

    #[test]
    fn test_page_clamped() {
        let query = ListQuery::page(0, 0);
        assert_eq!(query.current(), 1);
        assert_eq!(query.page_size(), 1);
    }

    #[test]
    fn test_search_page_query() {
        let query = ListQuery::page(1, 16)
            .sort(Sort::desc("sold"))
            .range("price", Some(0.0), Some(40_000_000.0))
            .equals("brand", ["apple", "samsung"])
            .matching("name", "iphone 15");

        assert_eq!(
            query.to_query_string(),
            "?current=1&pageSize=16&sort=-sold&price>=0&price<=40000000&brand=apple,samsung&name=/iphone%2015/i"
        );
    }

    #[test]
    fn test_blank_filters_are_skipped() {
        let query = ListQuery::page(1, 10)
            .matching("email", "   ")
            .range("price", None, None)
            .equals("brand", Vec::<String>::new());
        assert_eq!(query.to_query_string(), "?current=1&pageSize=10");
    }

    #[test]
    fn test_open_range() {
        let query = ListQuery::page(1, 10).range("price", Some(1.5), None);
        assert_eq!(query.to_query_string(), "?current=1&pageSize=10&price>=1.5");
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("-createdAt".parse::<Sort>().unwrap(), Sort::desc("createdAt"));
        assert_eq!("amount".parse::<Sort>().unwrap(), Sort::asc("amount"));
        assert_eq!("+amount".parse::<Sort>().unwrap(), Sort::asc("amount"));
        assert!("-".parse::<Sort>().is_err());
        assert_eq!(Sort::desc("sold").to_string(), "-sold");
    }
}
