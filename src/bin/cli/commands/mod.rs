pub mod cards;
pub mod dashboard;
pub mod plan;
pub mod profile;
pub mod resource;
