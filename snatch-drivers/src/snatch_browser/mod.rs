pub mod downloads;
pub mod driver;
pub mod page;
pub mod session;
