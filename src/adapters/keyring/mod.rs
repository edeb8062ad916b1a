pub mod pgp_keyring;
