pub mod access;
pub mod dashboard;
pub mod order;
pub mod order_form;
pub mod product;
pub mod profile;
