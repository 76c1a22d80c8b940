pub mod adapter;
pub mod gateway;
pub mod inkbird;
pub mod manifest;
