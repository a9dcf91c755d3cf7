use std::collections::HashSet;

use crate::error::RegistryError;

/// The fixed set of themes a request may resolve to, plus the theme every
/// request starts from. Built once and shared by all requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeRegistry {
    themes: Vec<String>,
    default_theme: String,
}

impl ThemeRegistry {
    /// Validate and build a registry.
    pub fn new<I, S>(
        themes: I,
        default_theme: impl Into<String>,
    ) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let themes: Vec<String> = themes.into_iter().map(Into::into).collect();
        if themes.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::with_capacity(themes.len());
        for theme in &themes {
            if theme.trim().is_empty() {
                return Err(RegistryError::BlankName);
            }
            if !seen.insert(theme.as_str()) {
                return Err(RegistryError::Duplicate {
                    name: theme.clone(),
                });
            }
        }

        let default_theme = default_theme.into();
        if !themes.contains(&default_theme) {
            return Err(RegistryError::UnknownDefault {
                name: default_theme,
            });
        }

        Ok(Self {
            themes,
            default_theme,
        })
    }

    /// Registry whose default is the first listed theme.
    pub fn with_first_as_default<I, S>(themes: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let themes: Vec<String> = themes.into_iter().map(Into::into).collect();
        let default_theme =
            themes.first().cloned().ok_or(RegistryError::Empty)?;
        Self::new(themes, default_theme)
    }

    /// Whether `name` is a known theme.
    pub fn contains(&self, name: &str) -> bool {
        self.themes.iter().any(|theme| theme == name)
    }

    /// Known themes in declaration order.
    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    /// Theme every request starts from.
    pub fn default_theme(&self) -> &str {
        &self.default_theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_declaration_order() {
        let registry =
            ThemeRegistry::new(["light", "dark", "contrast"], "dark").unwrap();
        assert_eq!(registry.themes(), ["light", "dark", "contrast"]);
        assert_eq!(registry.default_theme(), "dark");
        assert!(registry.contains("contrast"));
        assert!(!registry.contains("Contrast"));
    }

    #[test]
    fn rejects_invalid_definitions() {
        assert_eq!(
            ThemeRegistry::new(Vec::<String>::new(), "x"),
            Err(RegistryError::Empty)
        );
        assert_eq!(
            ThemeRegistry::new(["a", "a"], "a"),
            Err(RegistryError::Duplicate { name: "a".into() })
        );
        assert_eq!(
            ThemeRegistry::new(["a", ""], "a"),
            Err(RegistryError::BlankName)
        );
        assert_eq!(
            ThemeRegistry::new(["a"], "b"),
            Err(RegistryError::UnknownDefault { name: "b".into() })
        );
    }

    #[test]
    fn first_theme_is_default() {
        let registry =
            ThemeRegistry::with_first_as_default(["desktop", "phone"]).unwrap();
        assert_eq!(registry.default_theme(), "desktop");
    }
}
