pub mod display;
pub mod instrument;
pub mod menu;

pub use menu::Session;
