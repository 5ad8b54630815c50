//! # Navify
//!
//! A local-first knowledge search aggregator. One free-text query fans out
//! to every answer source an organization keeps, and the results come back
//! as a single merged, typed list.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌─────────────────────────────────────────┐
//! │   query    │──▶│              Aggregator                  │
//! └────────────┘   │  classify → fan out → merge → decide     │
//!                  └──────┬───────┬───────┬───────┬──────────┘
//!                         ▼       ▼       ▼       ▼
//!                     QnA svc  entries  experts  doc index
//!                     (HTTP)   (SQLite) (SQLite) (SQLite seed)
//! ```
//!
//! Sources contribute typed results (solutions, experts, documentation)
//! with fixed provenance-derived relevance scores; the merge order is a
//! contract, not a ranking. A lone solution short-circuits straight to its
//! detail view.
//!
//! ## Quick Start
//!
//! ```bash
//! navify init                          # create + seed the store
//! navify search "docker build cache"   # run the pipeline
//! navify get k1                        # open an entry
//! navify rate k1 --helpful             # record feedback
//! navify history                       # recent searches
//! navify experts kubernetes docker     # query the expert index
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types and the tagged result union |
//! | [`classifier`] | Keyword-density query classification |
//! | [`store`] | Knowledge store port + in-memory implementation |
//! | [`sqlite_store`] | SQLite-backed store |
//! | [`qna`] | QnA service client and response mapping |
//! | [`aggregate`] | Fan-out, merge, and navigation decision |
//! | [`seed`] | Demo data and first-run seeding |

pub mod aggregate;
pub mod classifier;
pub mod config;
pub mod db;
pub mod entry;
pub mod experts;
pub mod history;
pub mod migrate;
pub mod models;
pub mod qna;
pub mod search;
pub mod seed;
pub mod sqlite_store;
pub mod store;
