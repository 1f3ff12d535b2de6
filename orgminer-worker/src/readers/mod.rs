//! Result readers
//!
//! Three independent, side-effect-free parsers for the tool's output
//! formats: the delimited pattern file, the JSON metrics document, and the
//! GEXF graph fragments. Each is tolerant of missing or malformed input and
//! never returns a partial success.

pub mod graphs;
pub mod metrics;
pub mod patterns;
