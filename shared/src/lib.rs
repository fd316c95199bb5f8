// Library shared untuk semua services: identity claims, JWT, dan helper validasi
pub mod models;
pub mod utils;
