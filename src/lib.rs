//! Voice Transfer - voice-driven money transfer client
//!
//! This crate turns a transcribed Korean utterance such as
//! "김철수에게 5만원 보내줘" into a transfer draft, asks for confirmation,
//! and submits it with the voice recording to a banking API.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Extraction, transfer state machine, accounts, session token
//! - **Application**: Transfer orchestration, account cache, port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (REST banking API, TOML config)
//! - **CLI**: Command-line interface, argument parsing, and logging setup

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
