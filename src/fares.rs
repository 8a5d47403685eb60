//! This module contains the data model shared by the ingestor, the solver and the report:
//! the `FareMatrix` of one itinerary, the `Fare` amounts inside it and the `Route` the
//! solver returns.

use std::{fmt, iter::Sum};

use itertools::Itertools;
use ndarray::Array2;
use tracing::warn;

use crate::error::AnalysisError;

/// A non-negative amount of money, in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fare(pub u64);

impl Fare {
    pub const ZERO: Fare = Fare(0);

    /// Converts an amount in whole currency units to a fare, rounding to the nearest cent.
    /// Negative and non-finite amounts are not fares.
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return None;
        }
        let cents = (amount * 100.0).round();
        if cents >= u64::MAX as f64 {
            return None;
        }
        Some(Self(cents as u64))
    }

    pub fn cents(self) -> u64 {
        self.0
    }

    /// `None` when the total no longer fits
    pub fn checked_add(self, other: Fare) -> Option<Fare> {
        self.0.checked_add(other.0).map(Fare)
    }

    pub fn checked_sub(self, other: Fare) -> Option<Fare> {
        self.0.checked_sub(other.0).map(Fare)
    }

    /// Formats the fare with two decimals and the given decimal separator, e.g. `12,34`
    pub fn display_with(self, separator: char) -> String {
        format!("{}{}{:02}", self.0 / 100, separator, self.0 % 100)
    }
}

/// Totals a list of fares, `None` on overflow
impl Sum<Fare> for Option<Fare> {
    fn sum<I: Iterator<Item = Fare>>(mut iter: I) -> Self {
        iter.try_fold(Fare::ZERO, Fare::checked_add)
    }
}

impl fmt::Display for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_with(','))
    }
}

/// A purchasable ticket between two stations of the itinerary, always in travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Segment {
    pub from: usize,
    pub to: usize,
}

impl Segment {
    pub fn new(from: usize, to: usize) -> Self {
        debug_assert!(from < to, "a segment runs forward along the itinerary");
        Self { from, to }
    }

    /// The segment spanning an itinerary of `n` stations
    pub fn direct(n: usize) -> Self {
        Self::new(0, n - 1)
    }
}

/// The fares scraped for one itinerary
#[derive(Debug, Clone, PartialEq)]
pub struct FareMatrix {
    /// Travel date, as written by the scraper (may be empty)
    pub date: String,
    /// Train label, as written by the scraper (may be empty)
    pub train: String,
    /// Time at each station, index-aligned with `stations`; descriptive only
    pub times: Vec<String>,
    /// Station names in itinerary order
    pub stations: Vec<String>,
    /// `prices[[i, j]]` is the fare from station `i` to station `j`.
    /// Only the upper triangle is meaningful; `None` means no fare is known.
    pub prices: Array2<Option<Fare>>,
}

impl FareMatrix {
    /// Builds a matrix, checking that it describes a usable itinerary
    pub fn new(
        date: String,
        train: String,
        times: Vec<String>,
        stations: Vec<String>,
        prices: Array2<Option<Fare>>,
    ) -> Result<Self, AnalysisError> {
        let n = stations.len();
        if n < 2 {
            return Err(AnalysisError::MalformedInput(format!(
                "an itinerary needs at least two stations, found {n}"
            )));
        }
        if prices.dim() != (n, n) {
            return Err(AnalysisError::MalformedInput(format!(
                "fare matrix is {:?} but there are {n} stations",
                prices.dim()
            )));
        }
        if times.len() != n {
            warn!("{} times given for {} stations", times.len(), n);
        }
        let duplicates = stations.iter().duplicates().collect_vec();
        if !duplicates.is_empty() {
            warn!("Stations appear more than once in the itinerary: {:?}", duplicates);
        }
        Ok(Self { date, train, times, stations, prices })
    }

    /// The number of stations
    pub fn n(&self) -> usize {
        self.stations.len()
    }

    /// The fare of a segment, if known. Cells outside the upper triangle never hold a fare.
    pub fn fare(&self, segment: Segment) -> Option<Fare> {
        if segment.from >= segment.to || segment.to >= self.n() {
            return None;
        }
        self.prices[[segment.from, segment.to]]
    }

    /// The fare from the first to the last station
    pub fn direct_fare(&self) -> Option<Fare> {
        self.fare(Segment::direct(self.n()))
    }

    pub fn station(&self, i: usize) -> &str {
        &self.stations[i]
    }

    pub fn first_station(&self) -> &str {
        self.station(0)
    }

    pub fn last_station(&self) -> &str {
        self.station(self.n() - 1)
    }

    /// Every segment with a known fare, in row-major order
    pub fn segments(&self) -> impl Iterator<Item = (Segment, Fare)> + '_ {
        (0..self.n())
            .tuple_combinations()
            .filter_map(|(from, to)| {
                let segment = Segment::new(from, to);
                self.fare(segment).map(|fare| (segment, fare))
            })
    }
}

/// A chain of segments from the first to the last station
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// The total price of all segments
    pub cost: Fare,
    /// Segments in travel order; each starts where the previous one ends
    pub segments: Vec<Segment>,
    /// The fare of each segment, index-aligned with `segments`
    pub fares: Vec<Fare>,
}

impl Route {
    /// Whether this route is the single ticket over an itinerary of `n` stations
    pub fn is_direct(&self, n: usize) -> bool {
        n >= 2 && self.segments == [Segment::direct(n)]
    }
}
