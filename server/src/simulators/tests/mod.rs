//! Unit tests for the failure simulators
