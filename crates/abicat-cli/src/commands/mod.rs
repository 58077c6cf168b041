pub mod header;
pub mod layout;
pub mod selftest;
pub mod symbols;
