//! Serializer configuration.

/// Default value of the `info.software` tag.
pub const DEFAULT_SOFTWARE: &str = "Blender Houdini Geometry Exporter";

/// Options controlling single-unit and packed serialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Emit the legacy trailing `index` section and set `hasindex`.
    pub write_index: bool,
    /// Value of the `info.software` tag.
    pub software: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            write_index: false,
            software: DEFAULT_SOFTWARE.to_string(),
        }
    }
}

impl WriteOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the trailing index section.
    pub fn with_index(mut self, enabled: bool) -> Self {
        self.write_index = enabled;
        self
    }

    /// Override the `info.software` tag.
    pub fn with_software(mut self, software: impl Into<String>) -> Self {
        self.software = software.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = WriteOptions::new();
        assert!(!opts.write_index);
        assert_eq!(opts.software, DEFAULT_SOFTWARE);
    }

    #[test]
    fn test_builder() {
        let opts = WriteOptions::new().with_index(true).with_software("tool");
        assert!(opts.write_index);
        assert_eq!(opts.software, "tool");
    }
}
