pub mod config;
pub mod consts;
pub mod eo;
pub mod error;
pub mod janitor;
pub mod messages;
pub mod paths;
pub mod pipeline;
pub mod present;
pub mod remote;
pub mod stats;
pub mod tools;
