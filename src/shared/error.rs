//! Shared Error Types
//!
//! Validation failures raised synchronously, before any request is issued.
//! The `Display` text of each variant is the user-facing message shown by the
//! desktop app, so it stays in the interface language.
//!
//! # Usage
//!
//! ```rust
//! use wachat::shared::error::ValidationError;
//!
//! let error = ValidationError::EmptyBody;
//! assert_eq!(error.to_string(), "Veuillez saisir un message");
//! ```
use thiserror::Error;

/// Input rejected before reaching the backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Veuillez saisir un message")]
    EmptyBody,

    #[error("Veuillez sélectionner un contact")]
    NoActiveContact,

    #[error("Utilisateur non connecté")]
    NotAuthenticated,

    /// Login form with a blank field
    #[error("Merci de remplir tous les champs.")]
    MissingCredentials,

    /// Registration form with a blank field
    #[error("Veuillez remplir tous les champs.")]
    MissingRegistrationFields,

    #[error("Le nom d'utilisateur doit contenir au moins 3 caractères.")]
    UsernameTooShort,

    #[error("Le nom d'utilisateur ne peut contenir que des lettres, chiffres et _.")]
    UsernameInvalidChars,

    #[error("Format de téléphone invalide (ex: 771234567).")]
    InvalidPhone,

    #[error("Ce nom d'utilisateur existe déjà.")]
    UsernameTaken,

    #[error("Ce numéro de téléphone est déjà utilisé.")]
    PhoneTaken,

    #[error("Nom et numéro obligatoires !")]
    ContactFieldsRequired,

    #[error("Aucun contact courant !")]
    NoCurrentContact,

    #[error("Le nom du groupe est obligatoire.")]
    GroupNameRequired,

    #[error("Le groupe doit contenir au moins 2 membres (admin inclus).")]
    GroupTooSmall,

    #[error("Impossible de retirer l'admin.")]
    CannotRemoveAdmin,

    #[error("Groupe introuvable.")]
    GroupNotFound,

    /// Resend requested for a message that is not in the `failed` state
    #[error("Seuls les messages en échec peuvent être renvoyés.")]
    NotResendable,
}

/// Minimum number of characters in a username
pub const USERNAME_MIN_LEN: usize = 3;

/// Check a username: at least three ASCII letters, digits or underscores
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.chars().count() < USERNAME_MIN_LEN {
        return Err(ValidationError::UsernameTooShort);
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ValidationError::UsernameInvalidChars);
    }
    Ok(())
}

/// Check a Senegalese mobile number: `7` followed by eight digits
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let mut chars = phone.chars();
    let valid = chars.next() == Some('7')
        && phone.len() == 9
        && chars.all(|c| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone)
    }
}
