pub mod endpoints;
pub mod upstream;
