//! Resource endpoints, one module per REST resource.

mod contacts;
mod devices;
mod ephemerals;
mod pushes;
mod uploads;
mod users;

pub use uploads::FilePush;
