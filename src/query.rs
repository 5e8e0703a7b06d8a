//! Tour query predicates, sorting and aggregation pipelines
//!
//! Secret-tour exclusion is an ordinary predicate here. The repository adds
//! it to every find-style read and prepends it to every aggregation unless
//! the caller passes [`Visibility::IncludeSecret`].

use std::cmp::Ordering;

use crate::model::{Difficulty, Tour};

/// Whether secret tours are visible to a read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    /// Secret tours are filtered out
    #[default]
    Public,
    /// Explicit override: secret tours are returned too
    IncludeSecret,
}

impl Visibility {
    pub fn admits(self, tour: &Tour) -> bool {
        match self {
            Visibility::Public => !tour.secret_tour,
            Visibility::IncludeSecret => true,
        }
    }
}

/// Conjunction of optional conditions on a tour
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TourFilter {
    pub difficulty: Option<Difficulty>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub max_duration: Option<f64>,
    pub exclude_secret: bool,
}

impl TourFilter {
    /// The filter that hides secret tours
    pub fn public() -> Self {
        Self {
            exclude_secret: true,
            ..Self::default()
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        if visibility == Visibility::Public {
            self.exclude_secret = true;
        }
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn min_price(mut self, price: f64) -> Self {
        self.min_price = Some(price);
        self
    }

    pub fn max_price(mut self, price: f64) -> Self {
        self.max_price = Some(price);
        self
    }

    pub fn min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    pub fn max_duration(mut self, days: f64) -> Self {
        self.max_duration = Some(days);
        self
    }

    pub fn matches(&self, tour: &Tour) -> bool {
        if self.exclude_secret && tour.secret_tour {
            return false;
        }
        if self.difficulty.is_some() && tour.difficulty != self.difficulty {
            return false;
        }
        if let Some(min) = self.min_price {
            if !tour.price.is_some_and(|price| price >= min) {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if !tour.price.is_some_and(|price| price <= max) {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if tour.ratings_average < min {
                return false;
            }
        }
        if let Some(max) = self.max_duration {
            if !tour.duration.is_some_and(|days| days <= max) {
                return false;
            }
        }
        true
    }
}

/// Field a tour list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Price,
    RatingsAverage,
    Duration,
    CreatedAt,
}

/// One sort criterion, e.g. `-price` for price descending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    /// Parses a comma-separated sort list such as `-ratingsAverage,price`
    ///
    /// Returns the unknown field name on failure.
    pub fn parse_list(list: &str) -> Result<Vec<SortKey>, String> {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| {
                let (descending, name) = match item.strip_prefix('-') {
                    Some(rest) => (true, rest),
                    None => (false, item),
                };
                let field = match name {
                    "name" => SortField::Name,
                    "price" => SortField::Price,
                    "ratingsAverage" => SortField::RatingsAverage,
                    "duration" => SortField::Duration,
                    "createdAt" => SortField::CreatedAt,
                    other => return Err(other.to_string()),
                };
                Ok(SortKey { field, descending })
            })
            .collect()
    }

    fn compare(&self, a: &Tour, b: &Tour) -> Ordering {
        let ordering = match self.field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Price => compare_optional(a.price, b.price),
            SortField::RatingsAverage => a.ratings_average.total_cmp(&b.ratings_average),
            SortField::Duration => compare_optional(a.duration, b.duration),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// Missing values sort before any present value
fn compare_optional(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Orders tours by each key in turn
pub fn sort_tours(tours: &mut [Tour], keys: &[SortKey]) {
    tours.sort_by(|a, b| {
        keys.iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}

/// Parameters of a find-style query
#[derive(Debug, Clone, PartialEq)]
pub struct TourQuery {
    pub filter: TourFilter,
    pub sort: Vec<SortKey>,
    /// Page number, starting from 1
    pub page: usize,
    pub limit: usize,
}

impl TourQuery {
    pub const DEFAULT_LIMIT: usize = 100;
    pub const MAX_LIMIT: usize = 100;

    pub fn new(filter: TourFilter) -> Self {
        Self {
            filter,
            sort: vec![SortKey::desc(SortField::CreatedAt)],
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    pub fn sort(mut self, keys: Vec<SortKey>) -> Self {
        if !keys.is_empty() {
            self.sort = keys;
        }
        self
    }

    pub fn page(mut self, page: usize, limit: usize) -> Self {
        self.page = page.max(1);
        self.limit = limit.clamp(1, Self::MAX_LIMIT);
        self
    }

    /// Number of matches skipped before this page; saturates for huge pages
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for TourQuery {
    fn default() -> Self {
        Self::new(TourFilter::default())
    }
}

/// A single aggregation stage
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(TourFilter),
    Sort(Vec<SortKey>),
    Limit(usize),
}

/// Ordered list of stages applied to the tour collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: TourFilter) -> Self {
        self.stages.push(Stage::Match(filter));
        self
    }

    pub fn sort(mut self, keys: Vec<SortKey>) -> Self {
        self.stages.push(Stage::Sort(keys));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.stages.push(Stage::Limit(n));
        self
    }

    /// Inserts `stage` ahead of every existing stage
    pub fn unshift(mut self, stage: Stage) -> Self {
        self.stages.insert(0, stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn run(&self, mut tours: Vec<Tour>) -> Vec<Tour> {
        for stage in &self.stages {
            match stage {
                Stage::Match(filter) => tours.retain(|tour| filter.matches(tour)),
                Stage::Sort(keys) => sort_tours(&mut tours, keys),
                Stage::Limit(n) => tours.truncate(*n),
            }
        }
        tours
    }
}
