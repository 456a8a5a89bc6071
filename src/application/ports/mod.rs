//! Ports - Interfaces between the workflow core and its host environment

pub mod outbound;
