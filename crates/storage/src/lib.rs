#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod dto;
pub mod gateway;
pub mod memory;
pub mod rest;
