extern crate self as symhd_core;

pub mod log;
