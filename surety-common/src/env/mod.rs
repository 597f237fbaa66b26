pub mod events;
pub mod flight;
pub mod operating;
pub mod value;
