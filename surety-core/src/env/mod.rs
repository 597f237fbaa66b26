pub mod bus;
pub mod flights;
pub mod insurance;
