//! Cross-module tests for the reconciliation engine.

mod reconcile_flow;
