pub mod admin;
pub mod dealer;
pub mod products;
pub mod session;
pub mod vendor;
