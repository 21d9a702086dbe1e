//! Pagination expressions

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// One-based page number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageNumber(NonZeroU32);

impl PageNumber {
    pub const ONE: PageNumber = PageNumber(NonZeroU32::MIN);

    /// Returns `None` for zero
    pub fn new(number: u32) -> Option<Self> {
        NonZeroU32::new(number).map(Self)
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::ONE
    }
}

/// Maximum number of resources per page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PageSizeRepr", into = "PageSizeRepr")]
pub enum PageSize {
    Bounded(NonZeroU32),
    Unbounded,
}

impl PageSize {
    /// Returns `None` for zero
    pub fn bounded(size: u32) -> Option<Self> {
        NonZeroU32::new(size).map(PageSize::Bounded)
    }

    /// The size limit, or `None` when unbounded
    pub fn limit(&self) -> Option<NonZeroU32> {
        match self {
            PageSize::Bounded(size) => Some(*size),
            PageSize::Unbounded => None,
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::Bounded(size) => write!(f, "{}", size),
            PageSize::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Wire form: a positive integer or the keyword `"unbounded"`
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PageSizeRepr {
    Count(u32),
    Keyword(String),
}

impl TryFrom<PageSizeRepr> for PageSize {
    type Error = String;

    fn try_from(repr: PageSizeRepr) -> Result<Self, Self::Error> {
        match repr {
            PageSizeRepr::Count(size) => {
                PageSize::bounded(size).ok_or_else(|| "page size must be positive".to_string())
            }
            PageSizeRepr::Keyword(keyword) if keyword == "unbounded" => Ok(PageSize::Unbounded),
            PageSizeRepr::Keyword(keyword) => Err(format!(
                "page size must be a positive integer or \"unbounded\", got \"{}\"",
                keyword
            )),
        }
    }
}

impl From<PageSize> for PageSizeRepr {
    fn from(size: PageSize) -> Self {
        match size {
            PageSize::Bounded(size) => PageSizeRepr::Count(size.get()),
            PageSize::Unbounded => PageSizeRepr::Keyword("unbounded".to_string()),
        }
    }
}

/// Page window over a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationExpression {
    #[serde(default)]
    pub page_number: PageNumber,
    pub page_size: PageSize,
}

impl PaginationExpression {
    pub fn new(page_number: PageNumber, page_size: PageSize) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// First page with the given size
    pub fn first_page(page_size: PageSize) -> Self {
        Self::new(PageNumber::ONE, page_size)
    }
}

impl fmt::Display for PaginationExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page[number]={},page[size]={}", self.page_number.get(), self.page_size)
    }
}
