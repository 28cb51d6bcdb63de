//! Model-level scenarios.
//!
//! These exercise the hierarchy as a whole: construction, naming, references and
//! serialisation, and deactivating and checking the reference model by time.

#[cfg(test)]
mod basic;
#[cfg(test)]
mod scenarios;
