// Domain route groups, each mounted on the app router with no prefix.
pub mod auth;
pub mod collaboration;
pub mod events;
pub mod organizer;
pub mod participant;
pub mod virtual_event;
