pub mod controller;
pub(crate) mod resources;
pub(crate) mod worker;
