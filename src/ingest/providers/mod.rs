pub mod fixture;
pub mod location;
