//! Builds the human-readable summary for one artifact: what the direct ticket costs,
//! what the cheapest combination costs, and which tickets to buy.

use std::fmt;

use itertools::Itertools;

use crate::{
    config::Config,
    fares::{Fare, FareMatrix, Route, Segment},
};

const RULE_WIDTH: usize = 80;

/// The analysis of one artifact
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Where the artifact came from
    pub source: String,
    pub date: String,
    pub train: String,
    pub stations: Vec<String>,
    pub direct_fare: Option<Fare>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No chain of known fares reaches the last station
    NoRoute,
    Found {
        cost: Fare,
        savings: Savings,
        tickets: Tickets,
    },
}

/// The cheapest combination compared to the direct ticket
#[derive(Debug, Clone, PartialEq)]
pub enum Savings {
    NoDirectFare,
    Saved { amount: Fare, percent: f64 },
    Same,
    MoreExpensive { amount: Fare },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tickets {
    /// The direct ticket is already the cheapest
    SingleDirect,
    Split(Vec<Ticket>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub segment: Segment,
    pub from: String,
    pub to: String,
    pub fare: Fare,
}

impl Savings {
    fn compare(direct: Option<Fare>, cost: Fare, tolerance: u64) -> Self {
        let Some(direct) = direct else {
            return Savings::NoDirectFare;
        };
        match direct.checked_sub(cost) {
            Some(amount) if amount.cents() > tolerance => Savings::Saved {
                amount,
                percent: amount.cents() as f64 / direct.cents() as f64 * 100.0,
            },
            Some(_) => Savings::Same,
            None => {
                let amount = Fare(cost.cents() - direct.cents());
                if amount.cents() > tolerance {
                    Savings::MoreExpensive { amount }
                } else {
                    Savings::Same
                }
            }
        }
    }
}

impl Report {
    /// Summarises the solver's answer for a matrix
    pub fn new(source: impl Into<String>, matrix: &FareMatrix, route: Option<&Route>, config: &Config) -> Self {
        let direct_fare = matrix.direct_fare();
        let outcome = match route {
            None => Outcome::NoRoute,
            Some(route) => {
                debug_assert_eq!(route.segments.len(), route.fares.len(), "every segment has a fare");
                let tickets = if route.is_direct(matrix.n()) {
                    Tickets::SingleDirect
                } else {
                    Tickets::Split(
                        route
                            .segments
                            .iter()
                            .zip(&route.fares)
                            .map(|(&segment, &fare)| Ticket {
                                segment,
                                from: matrix.station(segment.from).to_owned(),
                                to: matrix.station(segment.to).to_owned(),
                                fare,
                            })
                            .collect(),
                    )
                };
                Outcome::Found {
                    cost: route.cost,
                    savings: Savings::compare(direct_fare, route.cost, config.savings_tolerance),
                    tickets,
                }
            }
        };
        Self {
            source: source.into(),
            date: matrix.date.clone(),
            train: matrix.train.clone(),
            stations: matrix.stations.clone(),
            direct_fare,
            outcome,
        }
    }

    /// Renders the report as text, using the configured currency and separator
    pub fn display<'a>(&'a self, config: &'a Config) -> ReportDisplay<'a> {
        ReportDisplay { report: self, config }
    }
}

/// Text rendering of a `Report`
pub struct ReportDisplay<'a> {
    report: &'a Report,
    config: &'a Config,
}

impl ReportDisplay<'_> {
    fn money(&self, fare: Fare) -> String {
        format!("{} {}", fare.display_with(self.config.decimal_separator), self.config.currency)
    }
}

impl fmt::Display for ReportDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "\n{rule}")?;
        writeln!(f, "Analyzing: {}", report.source)?;
        writeln!(f, "{rule}\n")?;

        if !report.date.is_empty() || !report.train.is_empty() {
            writeln!(f, "Date: {}  Train: {}", report.date, report.train)?;
        }
        // The ingestor guarantees at least two stations
        let first = report.stations.first().map_or("", String::as_str);
        let last = report.stations.last().map_or("", String::as_str);
        writeln!(f, "Route: {first} → {last}")?;
        writeln!(f, "Number of stations: {}", report.stations.len())?;
        writeln!(f, "\nStations: {}\n", report.stations.iter().join(" → "))?;

        match report.direct_fare {
            Some(direct) => writeln!(f, "Direct ticket price: {}", self.money(direct))?,
            None => writeln!(f, "Warning: No direct ticket available from start to end!")?,
        }

        let (cost, savings, tickets) = match &report.outcome {
            Outcome::NoRoute => return writeln!(f, "\nNo valid route found!"),
            Outcome::Found { cost, savings, tickets } => (cost, savings, tickets),
        };
        writeln!(f, "Cheapest combination: {}", self.money(*cost))?;

        if *savings != Savings::NoDirectFare {
            writeln!(f, "\n{rule}")?;
            match savings {
                Savings::Saved { amount, percent } => {
                    writeln!(f, "SAVINGS: {} ({:.1}%)", self.money(*amount), percent)?
                }
                Savings::MoreExpensive { amount } => writeln!(
                    f,
                    "Warning: Combination is more expensive by {}",
                    self.money(*amount)
                )?,
                Savings::Same | Savings::NoDirectFare => writeln!(f, "Same price as direct ticket")?,
            }
            writeln!(f, "{rule}\n")?;
        }

        match tickets {
            Tickets::SingleDirect => writeln!(f, "Buy a single direct ticket (no savings from splitting)"),
            Tickets::Split(tickets) => {
                writeln!(f, "Tickets to buy:")?;
                for (i, ticket) in tickets.iter().enumerate() {
                    writeln!(f, "  {}. {} → {}: {}", i + 1, ticket.from, ticket.to, self.money(ticket.fare))?;
                }
                Ok(())
            }
        }
    }
}
