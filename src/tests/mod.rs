//! Colocated integration-style tests (teacher's `src/tests/` convention).

mod properties;
