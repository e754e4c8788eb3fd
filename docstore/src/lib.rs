//! # docstore - embedded in-memory document store
//!
//! Schemaless documents grouped in named collections, each collection keeping
//! a set of secondary indexes exactly in step with its documents.
//!
//! ## Key Features
//!
//! - **Documents**: ordered maps with dotted-path access into embedded
//!   documents and arrays, built with the [`doc!`] macro
//! - **Compound and multikey indexes**: an index over `arr.val` holds one
//!   entry per array element; compound keys cross every field's values
//! - **Unique indexes**: a write that would duplicate a key is rejected and
//!   leaves no trace in the store or in any index
//! - **Planned finds**: equality filters are served by the most specific
//!   matching index and always confirmed by the filter matcher; every find
//!   reports the index it used and how long it took
//! - **Bulk loading** through `Collection::set_data` with optional checks
//!
//! ## Quick Start
//!
//! ```rust
//! use docstore::collection::FindOptions;
//! use docstore::docstore::DocStore;
//! use docstore::doc;
//! use docstore::index::non_unique_index;
//!
//! let store = DocStore::builder().open().unwrap();
//! let users = store.collection("users");
//! users.ensure_index(&doc! { orgId: 1, arr: { val: 1 } }, &non_unique_index().name("byOrgAndVal"));
//!
//! users.insert(doc! { "_id": "4", orgId: "3", arr: [{ val: 1 }, { val: 5 }] }).unwrap();
//! users.insert(doc! { "_id": "5", orgId: "3", arr: [{ val: 5 }, { val: 7 }] }).unwrap();
//!
//! let found = users.find(&doc! { orgId: "3", arr: { val: 5 } }, &FindOptions::default()).unwrap();
//! assert_eq!(found.ids(), vec!["4", "5"]);
//! assert_eq!(found.info().index_used().unwrap().name(), "byOrgAndVal");
//! ```
//!
//! ## Design Pattern
//!
//! Public handles ([`docstore::DocStore`], [`collection::Collection`],
//! [`index::Index`]) follow the PIMPL pattern: a thin `Clone` wrapper around an
//! `Arc` of the implementation. Clones share state and are `Send + Sync`.
//!
//! ## Module Organization
//!
//! - [`collection`] - Documents, collections, find options and results
//! - [`common`] - Values, the comparator, sort order and lock helpers
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - Filter matching and fluent filter helpers
//! - [`index`] - Key specs, multikey realization and indexes
//! - [`docstore`] - The store handle
//! - [`docstore_builder`] - Store builder
//! - [`docstore_config`] - Store configuration

pub mod collection;
pub mod common;
pub mod docstore;
pub mod docstore_builder;
pub mod docstore_config;
pub mod errors;
pub mod filter;
pub mod index;
