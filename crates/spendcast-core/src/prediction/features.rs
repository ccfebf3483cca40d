//! Dummy-variable encoding of transactions
//!
//! Column layout is fixed for a given encoder:
//!
//! ```text
//! [ Mon Tue Wed Thu Fri Sat | Jan Feb ... Nov | cat_1 cat_2 ... ]
//! ```
//!
//! Sunday, December and the reference category have no column; their effect
//! lands in the intercept. Axes can be switched off, in which case their block
//! disappears and the remaining blocks shift left.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};

use crate::models::TransactionRecord;

/// Day-of-week dummies (Mon=1..Sat=6, Sunday is the reference)
pub const DAY_DUMMY_COUNT: usize = 6;

/// Month dummies (Jan=1..Nov=11, December is the reference)
pub const MONTH_DUMMY_COUNT: usize = 11;

/// Which dummy blocks an encoder emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureAxes {
    pub day_of_week: bool,
    pub month: bool,
    pub category: bool,
}

impl FeatureAxes {
    /// Day-of-week, month and category dummies
    pub const FULL: Self = Self {
        day_of_week: true,
        month: true,
        category: true,
    };

    /// Day-of-week dummies only
    pub const DAY_OF_WEEK: Self = Self {
        day_of_week: true,
        month: false,
        category: false,
    };
}

/// Pick the reference category: the most frequent id, lowest id on ties
pub fn reference_category(transactions: &[TransactionRecord]) -> Option<i64> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for id in transactions.iter().filter_map(|t| t.category_id()) {
        *counts.entry(id).or_default() += 1;
    }

    let mut best: Option<(i64, usize)> = None;
    for (id, count) in counts {
        // BTreeMap iterates ascending, so only a strictly larger count displaces
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((id, count));
        }
    }
    best.map(|(id, _)| id)
}

/// Maps non-reference category ids to dummy columns, in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryIndex {
    reference: Option<i64>,
    order: Vec<i64>,
    columns: HashMap<i64, usize>,
}

impl CategoryIndex {
    /// Index every category in `transactions` except `reference`
    pub fn build(transactions: &[TransactionRecord], reference: Option<i64>) -> Self {
        let mut index = Self {
            reference,
            ..Default::default()
        };
        for id in transactions.iter().filter_map(|t| t.category_id()) {
            if Some(id) == reference || index.columns.contains_key(&id) {
                continue;
            }
            index.columns.insert(id, index.order.len());
            index.order.push(id);
        }
        index
    }

    pub fn reference(&self) -> Option<i64> {
        self.reference
    }

    /// Category ids that own a column, in column order
    pub fn categories(&self) -> &[i64] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Column offset within the category block; `None` for the reference,
    /// unseen ids, and uncategorized rows
    pub fn column_of(&self, category_id: Option<i64>) -> Option<usize> {
        category_id.and_then(|id| self.columns.get(&id).copied())
    }
}

/// Ordered feature rows, all of the same width
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    columns: usize,
    rows: Vec<Vec<f64>>,
}

impl DesignMatrix {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row; panics if its width differs from the matrix
    pub fn push_row(&mut self, row: Vec<f64>) {
        assert_eq!(row.len(), self.columns, "feature row width mismatch");
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.rows[row][column]
    }
}

/// Encodes dates (and optionally categories) into dummy rows
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    axes: FeatureAxes,
    categories: CategoryIndex,
}

impl FeatureEncoder {
    pub fn new(axes: FeatureAxes, categories: CategoryIndex) -> Self {
        Self { axes, categories }
    }

    /// Build an encoder for `transactions`, choosing the reference category
    /// and category columns when the category axis is enabled
    pub fn for_transactions(axes: FeatureAxes, transactions: &[TransactionRecord]) -> Self {
        let categories = if axes.category {
            CategoryIndex::build(transactions, reference_category(transactions))
        } else {
            CategoryIndex::default()
        };
        Self::new(axes, categories)
    }

    /// Day-of-week encoder used by the daily forecasts
    pub fn day_of_week() -> Self {
        Self::new(FeatureAxes::DAY_OF_WEEK, CategoryIndex::default())
    }

    pub fn axes(&self) -> FeatureAxes {
        self.axes
    }

    pub fn categories(&self) -> &CategoryIndex {
        &self.categories
    }

    fn month_offset(&self) -> usize {
        if self.axes.day_of_week {
            DAY_DUMMY_COUNT
        } else {
            0
        }
    }

    fn category_offset(&self) -> usize {
        self.month_offset() + if self.axes.month { MONTH_DUMMY_COUNT } else { 0 }
    }

    /// Width of every encoded row
    pub fn column_count(&self) -> usize {
        self.category_offset()
            + if self.axes.category {
                self.categories.len()
            } else {
                0
            }
    }

    /// Encode one point; categories without a column leave the block at zero
    pub fn encode_point(&self, date: NaiveDate, category_id: Option<i64>) -> Vec<f64> {
        let mut row = vec![0.0; self.column_count()];

        if self.axes.day_of_week {
            let dow = date.weekday().number_from_monday() as usize;
            if dow <= DAY_DUMMY_COUNT {
                row[dow - 1] = 1.0;
            }
        }

        if self.axes.month {
            let month = date.month() as usize;
            if month <= MONTH_DUMMY_COUNT {
                row[self.month_offset() + month - 1] = 1.0;
            }
        }

        if self.axes.category {
            if let Some(column) = self.categories.column_of(category_id) {
                row[self.category_offset() + column] = 1.0;
            }
        }

        row
    }

    /// Encode (date, category, amount) samples into a design matrix and target
    pub fn encode_samples<I>(&self, samples: I) -> (DesignMatrix, Vec<f64>)
    where
        I: IntoIterator<Item = (NaiveDate, Option<i64>, f64)>,
    {
        let mut matrix = DesignMatrix::new(self.column_count());
        let mut target = Vec::new();
        for (date, category_id, amount) in samples {
            matrix.push_row(self.encode_point(date, category_id));
            target.push(amount);
        }
        (matrix, target)
    }

    /// Encode transactions, one row per record
    pub fn encode(&self, transactions: &[TransactionRecord]) -> (DesignMatrix, Vec<f64>) {
        self.encode_samples(
            transactions
                .iter()
                .map(|t| (t.date, t.category_id(), t.amount)),
        )
    }
}
