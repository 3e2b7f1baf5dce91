//! Member authentication.
//!
//! Password hashing and policy, registration, credential checks and email
//! masking for logs.

mod login;
mod masking;
mod password;
mod registration;
pub mod validation;

pub use login::{authenticate, change_status};
pub use masking::mask_email;
pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use registration::{register, register_with_role, RegistrationError, RegistrationRequest};
pub use validation::ValidationError;
