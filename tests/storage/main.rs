//! Integration tests for Layer 1: Storage
//!
//! Tests for entity storage, deferred submission, and filter indices.

mod entities;
