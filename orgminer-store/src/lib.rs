//! Orgminer Store
//!
//! Durable backend shared by the orchestrator and worker: a job queue with
//! status tracking plus a small key-value metadata store, both over
//! PostgreSQL. The rest of the system treats this crate as the external
//! queue/status and key-value collaborators; nothing outside it touches SQL.

pub mod db;
pub mod jobs;
pub mod meta;
