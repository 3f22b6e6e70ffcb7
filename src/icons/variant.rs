//! The two icon universes served by this crate

/// Icon set variant.
///
/// Each variant is an independent npm package with its own storage location
/// and its own fallback version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// `@mdi/svg`, referenced as `mdi-<name>`
    Regular,
    /// `@mdi/light-svg`, referenced as `mdil-<name>`
    Light,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Regular, Variant::Light];

    pub fn from_light(light: bool) -> Self {
        if light { Variant::Light } else { Variant::Regular }
    }

    /// Returns the string representation of the variant, also used as its
    /// storage sub-directory
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Regular => "regular",
            Variant::Light => "light",
        }
    }

    /// npm package the variant is published as
    pub fn package_name(&self) -> &'static str {
        match self {
            Variant::Regular => "@mdi/svg",
            Variant::Light => "@mdi/light-svg",
        }
    }

    /// Version used when "latest" is requested but no remote latest is known
    pub fn fallback_version(&self) -> &'static str {
        match self {
            Variant::Regular => "6.4.95",
            Variant::Light => "0.2.63",
        }
    }

    /// Token prefix in source text (`mdi-account`, `mdil:bell`)
    pub fn prefix(&self) -> &'static str {
        match self {
            Variant::Regular => "mdi",
            Variant::Light => "mdil",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
