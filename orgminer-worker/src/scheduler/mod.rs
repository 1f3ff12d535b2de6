//! Job scheduling

mod poller;

pub use poller::JobPoller;
