//! Search terms and paging.

use smallvec::SmallVec;
use thiserror::Error;

use crate::listings::MAX_PRICE;

/// Default number of results per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page a caller may ask for.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Search input errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The query used `OR`.
    #[error("OR is not supported")]
    OrNotSupported,

    /// A quoted phrase was never closed.
    #[error("unterminated quoted phrase")]
    UnterminatedPhrase,

    /// Page size outside `1..=MAX_PAGE_SIZE`.
    #[error("page size must be between 1 and {MAX_PAGE_SIZE}")]
    PageSize,

    /// Minimum price above maximum price.
    #[error("minimum price must not exceed maximum price")]
    PriceRange,

    /// A price bound above [`MAX_PRICE`].
    #[error("price bounds must be at most {MAX_PRICE}")]
    PriceTooHigh,
}

/// Tokens of a free-text query. Every token must match some field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerms {
    tokens: SmallVec<[String; 4]>,
}

impl SearchTerms {
    /// Split a query into tokens.
    ///
    /// Whitespace separates tokens, double-quoted phrases form a single token
    /// and a bare `AND` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::OrNotSupported`] for a bare `OR` and
    /// [`SearchError::UnterminatedPhrase`] for an unbalanced quote.
    pub fn parse(query: &str) -> Result<Self, SearchError> {
        let mut tokens = SmallVec::new();
        let mut current = String::new();
        let mut quoted = false;

        for ch in query.chars() {
            match ch {
                '"' if quoted => {
                    push_phrase(&mut tokens, &mut current);
                    quoted = false;
                }
                '"' => {
                    push_word(&mut tokens, &mut current)?;
                    quoted = true;
                }
                ch if ch.is_whitespace() && !quoted => push_word(&mut tokens, &mut current)?,
                ch => current.push(ch),
            }
        }

        if quoted {
            return Err(SearchError::UnterminatedPhrase);
        }

        push_word(&mut tokens, &mut current)?;

        Ok(Self { tokens })
    }

    /// The tokens, in query order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

fn push_word(tokens: &mut SmallVec<[String; 4]>, current: &mut String) -> Result<(), SearchError> {
    let word = std::mem::take(current);

    match word.as_str() {
        "" | "AND" => Ok(()),
        "OR" => Err(SearchError::OrNotSupported),
        _ => {
            tokens.push(word);
            Ok(())
        }
    }
}

fn push_phrase(tokens: &mut SmallVec<[String; 4]>, current: &mut String) {
    let phrase = std::mem::take(current);
    let phrase = phrase.trim();

    if !phrase.is_empty() {
        tokens.push(phrase.to_owned());
    }
}

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page index, starting at zero.
    pub page: u32,

    /// Results per page.
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a page request, applying defaults for missing values.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::PageSize`] when the size is outside
    /// `1..=MAX_PAGE_SIZE`.
    pub fn new(page: Option<u32>, size: Option<u32>) -> Result<Self, SearchError> {
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE);

        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(SearchError::PageSize);
        }

        Ok(Self {
            page: page.unwrap_or_default(),
            size,
        })
    }

    /// Rows to skip.
    #[must_use]
    pub fn offset(self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Rows to return.
    #[must_use]
    pub fn limit(self) -> i64 {
        i64::from(self.size)
    }
}

/// Inclusive price bounds in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceRange {
    /// Lower bound.
    pub min: Option<u64>,

    /// Upper bound.
    pub max: Option<u64>,
}

impl PriceRange {
    /// Build a range.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::PriceTooHigh`] when a bound exceeds
    /// [`MAX_PRICE`] and [`SearchError::PriceRange`] when `min > max`.
    pub fn new(min: Option<u64>, max: Option<u64>) -> Result<Self, SearchError> {
        if min.max(max).is_some_and(|bound| bound > MAX_PRICE) {
            return Err(SearchError::PriceTooHigh);
        }

        if let (Some(min), Some(max)) = (min, max)
            && min > max
        {
            return Err(SearchError::PriceRange);
        }

        Ok(Self { min, max })
    }
}
