pub mod armor;
pub mod index_parser;
pub mod key_lookup;
