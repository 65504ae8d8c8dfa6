//! Integration test harness
//!
//! - `crawl_tests`: the orchestrator against a scripted in-memory engine
//! - `http_engine_tests`: the HTTP engine end to end against wiremock servers

mod http_engine_tests;
mod support;
