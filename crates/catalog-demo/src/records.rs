//! Fashion dashboard records and their embedded sample data.
//!
//! Each JSON file lists records newest first, so the `newest` sort is
//! simply the file order.

use anyhow::{Context, Result};
use catalog_macros::Catalog;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One-line rendering of a record for the plain listing.
pub trait Listing {
    fn line(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Catalog)]
pub struct Venue {
    #[catalog(String)]
    pub id: String,
    #[catalog(String)]
    pub name: String,
    #[catalog(String)]
    pub location: String,
    #[catalog(String)]
    pub category: String,
    #[catalog(Number)]
    pub capacity: u32,
    /// Hire price per day, EUR.
    #[catalog(Number)]
    pub price: u32,
    #[catalog(Number, optional)]
    pub rating: Option<f64>,
    #[catalog(Bool)]
    pub featured: bool,
    #[catalog(String)]
    pub description: String,
}

impl Listing for Venue {
    fn line(&self) -> String {
        let rating = self
            .rating
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{:<24} {:<10} {:<9} cap {:>5}  EUR {:>6}/day  rating {}",
            self.name, self.location, self.category, self.capacity, self.price, rating
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Catalog)]
pub struct Event {
    #[catalog(String)]
    pub id: String,
    #[catalog(String)]
    pub title: String,
    #[catalog(String)]
    pub kind: String,
    #[catalog(String)]
    pub status: String,
    #[catalog(String)]
    pub venue: String,
    #[catalog(String)]
    pub city: String,
    /// ISO date; sorts chronologically as text.
    #[catalog(String)]
    pub date: String,
    #[catalog(Number)]
    pub attendees: u32,
    #[catalog(Number, optional, rename = "ticketPrice")]
    pub ticket_price: Option<f64>,
}

impl Listing for Event {
    fn line(&self) -> String {
        format!(
            "{} {:<32} {:<12} {:<9} {:<8} {:>5} guests",
            self.date, self.title, self.kind, self.status, self.city, self.attendees
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Catalog)]
pub struct Sponsor {
    #[catalog(String)]
    pub id: String,
    #[catalog(String)]
    pub name: String,
    #[catalog(String)]
    pub industry: String,
    #[catalog(String)]
    pub tier: String,
    #[catalog(Number)]
    pub contribution: u64,
    #[catalog(Number, rename = "eventsSponsored")]
    pub events_sponsored: u32,
    #[catalog(Bool)]
    pub active: bool,
    pub contact: Option<String>,
}

impl Listing for Sponsor {
    fn line(&self) -> String {
        format!(
            "{:<20} {:<10} {:<8} EUR {:>7}  {} events{}",
            self.name,
            self.industry,
            self.tier,
            self.contribution,
            self.events_sponsored,
            if self.active { "" } else { "  (inactive)" }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Catalog)]
pub struct Transaction {
    #[catalog(String)]
    pub id: String,
    #[catalog(String)]
    pub reference: String,
    #[catalog(String)]
    pub counterparty: String,
    #[catalog(String)]
    pub kind: String,
    #[catalog(String)]
    pub category: String,
    #[catalog(Number)]
    pub amount: f64,
    #[catalog(String)]
    pub status: String,
    #[catalog(String)]
    pub date: String,
}

impl Listing for Transaction {
    fn line(&self) -> String {
        let sign = if self.kind == "expense" { '-' } else { '+' };
        format!(
            "{} {:<14} {:<22} {:<11} {}{:>10.2}  {}",
            self.date, self.reference, self.counterparty, self.category, sign, self.amount, self.status
        )
    }
}

const VENUES: &str = include_str!("../data/venues.json");
const EVENTS: &str = include_str!("../data/events.json");
const SPONSORS: &str = include_str!("../data/sponsors.json");
const TRANSACTIONS: &str = include_str!("../data/transactions.json");

fn load<T: DeserializeOwned>(name: &str, json: &str) -> Result<Vec<T>> {
    serde_json::from_str(json).with_context(|| format!("failed to parse embedded {} data", name))
}

pub fn venues() -> Result<Vec<Venue>> {
    load("venue", VENUES)
}

pub fn events() -> Result<Vec<Event>> {
    load("event", EVENTS)
}

pub fn sponsors() -> Result<Vec<Sponsor>> {
    load("sponsor", SPONSORS)
}

pub fn transactions() -> Result<Vec<Transaction>> {
    load("transaction", TRANSACTIONS)
}
