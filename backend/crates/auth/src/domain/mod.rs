//! Domain Layer
//!
//! Business entities, value objects, the permission matrix and
//! repository traits. No I/O happens here.

pub mod entity;
pub mod permission;
pub mod repository;
pub mod value_object;
