//! Petrol station finder server.
//!
//! A web application that answers: "Where is the cheapest fuel near me?"
//! Stations are pulled from a hosted table, classified into Melbourne
//! regions, and served filtered, sorted and paginated.

pub mod cache;
pub mod config;
pub mod domain;
pub mod feed;
pub mod geo;
pub mod prefs;
pub mod pricing;
pub mod query;
pub mod regions;
pub mod web;
