// Re-export semua utility modules untuk kemudahan akses
pub mod jwt;
pub mod token_extraction;
pub mod validation;
