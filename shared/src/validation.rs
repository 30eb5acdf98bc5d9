use crate::models::PartyDraft;

pub const MAX_NAME_LENGTH: usize = 60;
pub const MAX_SYMBOL_LENGTH: usize = 30;
pub const MAX_SLOGAN_LENGTH: usize = 120;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_LOGO_URL_LENGTH: usize = 500;

pub const DEFAULT_COLOR: &str = "#3B82F6";
pub const DEFAULT_SYMBOL: &str = "sol";
pub const PARTY_SYMBOLS: [&str; 6] = ["sol", "agua", "tierra", "aire", "fuego", "estrella"];

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Party name is required")]
    NameRequired,
    #[error("Party name exceeds maximum length of {MAX_NAME_LENGTH}")]
    NameTooLong,
    #[error("Color must be a hex code like #FF0000, got {0:?}")]
    InvalidColor(String),
    #[error("Symbol exceeds maximum length of {MAX_SYMBOL_LENGTH}")]
    SymbolTooLong,
    #[error("Slogan exceeds maximum length of {MAX_SLOGAN_LENGTH}")]
    SloganTooLong,
    #[error("Description exceeds maximum length of {MAX_DESCRIPTION_LENGTH}")]
    DescriptionTooLong,
    #[error("Logo URL exceeds maximum length of {MAX_LOGO_URL_LENGTH}")]
    LogoUrlTooLong,
    #[error("Logo URL must start with http:// or https://")]
    InvalidLogoUrl,
}

/// `#RRGGBB`, either case.
pub fn is_valid_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn too_long(value: &Option<String>, max: usize) -> bool {
    value.as_deref().map_or(false, |v| v.chars().count() > max)
}

pub fn validate_party_draft(draft: &PartyDraft) -> Result<(), ValidationError> {
    let name = draft.name.trim();
    if name.is_empty() { return Err(ValidationError::NameRequired); }
    if name.chars().count() > MAX_NAME_LENGTH { return Err(ValidationError::NameTooLong); }
    if !is_valid_color(draft.color.trim()) {
        return Err(ValidationError::InvalidColor(draft.color.clone()));
    }
    if too_long(&draft.symbol, MAX_SYMBOL_LENGTH) { return Err(ValidationError::SymbolTooLong); }
    if too_long(&draft.slogan, MAX_SLOGAN_LENGTH) { return Err(ValidationError::SloganTooLong); }
    if too_long(&draft.description, MAX_DESCRIPTION_LENGTH) { return Err(ValidationError::DescriptionTooLong); }
    if too_long(&draft.logo_url, MAX_LOGO_URL_LENGTH) { return Err(ValidationError::LogoUrlTooLong); }

    if let Some(url) = draft.logo_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ValidationError::InvalidLogoUrl);
        }
    }

    Ok(())
}
