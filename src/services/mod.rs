pub mod availability;
pub mod candidates;
pub mod history;
pub mod pipeline;
pub mod profile;
pub mod providers;
pub mod resolver;
