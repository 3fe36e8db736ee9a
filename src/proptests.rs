//! Property-based tests for the arithmetic, the root solver and the history format.
