//! Document security policy.
//!
//! The record is kept alongside the document and exposes the permission word
//! of the standard security handler (ISO 32000-1 Table 22). Nothing here is
//! written to the file: encryption is not supported.

use bitflags::bitflags;

bitflags! {
    /// User access permission bits (bit positions are 1-based in the
    /// standard, hence the shifts).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u32 {
        const PRINT = 1 << 2;
        const MODIFY_CONTENTS = 1 << 3;
        const COPY = 1 << 4;
        const MODIFY_ANNOTATIONS = 1 << 5;
        const FILL_FORMS = 1 << 8;
        const EXTRACT_FOR_ACCESSIBILITY = 1 << 9;
        const ASSEMBLE = 1 << 10;
        const PRINT_HIGH_QUALITY = 1 << 11;
    }
}

impl Permissions {
    /// Bits 1-2 must be 0, bits 7-8 are reserved (1) and bits 13-32 must be 1.
    pub const RESERVED: u32 = 0xFFFF_F0C0;

    /// The 32-bit `/P` value for these permissions.
    pub fn to_p_value(self) -> u32 {
        Self::RESERVED | self.bits()
    }
}

/// Passwords and permission flags for a document. Everything is allowed by
/// default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSecurity {
    pub user_password: Option<String>,
    pub owner_password: Option<String>,
    pub allow_printing: bool,
    pub allow_modify_contents: bool,
    pub allow_copy: bool,
    pub allow_modify_annotations: bool,
    pub allow_fill_forms: bool,
    pub allow_accessibility: bool,
    pub allow_assembly: bool,
    pub allow_high_quality_printing: bool,
}

impl Default for DocumentSecurity {
    fn default() -> Self {
        Self {
            user_password: None,
            owner_password: None,
            allow_printing: true,
            allow_modify_contents: true,
            allow_copy: true,
            allow_modify_annotations: true,
            allow_fill_forms: true,
            allow_accessibility: true,
            allow_assembly: true,
            allow_high_quality_printing: true,
        }
    }
}

impl DocumentSecurity {
    /// True when either password is set.
    pub fn is_protected(&self) -> bool {
        self.user_password.is_some() || self.owner_password.is_some()
    }

    pub fn permissions(&self) -> Permissions {
        let mut perms = Permissions::empty();
        perms.set(Permissions::PRINT, self.allow_printing);
        perms.set(Permissions::MODIFY_CONTENTS, self.allow_modify_contents);
        perms.set(Permissions::COPY, self.allow_copy);
        perms.set(Permissions::MODIFY_ANNOTATIONS, self.allow_modify_annotations);
        perms.set(Permissions::FILL_FORMS, self.allow_fill_forms);
        perms.set(
            Permissions::EXTRACT_FOR_ACCESSIBILITY,
            self.allow_accessibility,
        );
        perms.set(Permissions::ASSEMBLE, self.allow_assembly);
        perms.set(
            Permissions::PRINT_HIGH_QUALITY,
            self.allow_high_quality_printing,
        );
        perms
    }

    /// The permission word as the standard security handler would store it.
    pub fn permission_bits(&self) -> u32 {
        self.permissions().to_p_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_everything() {
        let security = DocumentSecurity::default();
        assert!(!security.is_protected());
        assert_eq!(security.permissions(), Permissions::all());
        assert_eq!(security.permission_bits(), 0xFFFF_FFFC);
    }

    #[test]
    fn test_nothing_allowed_keeps_reserved_bits() {
        let security = DocumentSecurity {
            allow_printing: false,
            allow_modify_contents: false,
            allow_copy: false,
            allow_modify_annotations: false,
            allow_fill_forms: false,
            allow_accessibility: false,
            allow_assembly: false,
            allow_high_quality_printing: false,
            ..Default::default()
        };
        assert_eq!(security.permission_bits(), 0xFFFF_F0C0);
    }

    #[test]
    fn test_individual_bits() {
        let security = DocumentSecurity {
            allow_copy: false,
            allow_high_quality_printing: false,
            ..Default::default()
        };
        let perms = security.permissions();
        assert!(perms.contains(Permissions::PRINT));
        assert!(!perms.contains(Permissions::COPY));
        assert!(!perms.contains(Permissions::PRINT_HIGH_QUALITY));
        assert_eq!(security.permission_bits() & (1 << 4), 0);
        assert_eq!(security.permission_bits() & (1 << 11), 0);
    }

    #[test]
    fn test_is_protected() {
        let security = DocumentSecurity {
            owner_password: Some("owner".to_string()),
            ..Default::default()
        };
        assert!(security.is_protected());
    }
}
