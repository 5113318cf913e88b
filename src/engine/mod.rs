pub mod lifecycle;
pub mod queries;
pub mod stats;
pub mod tracking;
pub mod transitions;
