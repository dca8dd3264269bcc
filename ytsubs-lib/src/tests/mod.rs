//! Integration testing module
//!
//! Drives the whole pipeline through a stub fetcher:
//! - Watch pages shaped like the real thing
//! - Track selection and fallback
//! - Upstream failures collapsing to absent outcomes
