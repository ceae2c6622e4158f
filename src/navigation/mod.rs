pub mod address;
pub mod controller;
pub mod display;
pub mod queue;
