pub mod gui;
pub mod layout;
