//! Data Transfer Objects for REST request/response serialization.

pub mod employee_dto;

pub use employee_dto::*;
