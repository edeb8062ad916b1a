pub mod armored_key;
pub mod identity;
pub mod key_identifier;
pub mod lookup_context;
pub mod parsed_key;
