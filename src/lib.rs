//! optocrawl: crawls a single-vendor building-materials catalog, extracts
//! product records from product pages, and reconciles them into a
//! Postgres-backed document store.

pub mod config;
pub mod crawler;
pub mod discovery;
pub mod entities;
pub mod extractor;
pub mod fetcher;
pub mod repositories;
