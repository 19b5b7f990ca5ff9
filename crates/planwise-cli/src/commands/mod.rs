pub mod income;
pub mod mortgage;
pub mod project;
pub mod scenarios;
